use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};

use crate::constants::{
    INSUFFICIENT_KNOWLEDGE_MESSAGE, RECALL_STATUS_DIRECT, RECALL_STATUS_FALLBACK,
    RECALL_STATUS_HEADER, RECALL_STATUS_MISS, RECALL_STATUS_SYNTHESIZED,
    SYNTHESIS_FAILURE_MESSAGE,
};
use crate::embedding::EmbeddingClient;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    AskRequest, AskResponse, PruneRequest, PruneResponse, StatsResponse, chunk_message,
    render_answer,
};
use crate::gateway::state::AppState;
use crate::policy::AnswerOutcome;
use crate::synthesis::Synthesizer;

#[instrument(skip(state, request), fields(question_len = request.question.len()))]
pub async fn ask_handler<E, S>(
    State(state): State<AppState<E, S>>,
    Json(request): Json<AskRequest>,
) -> Result<Response, GatewayError>
where
    E: EmbeddingClient + Send + Sync + 'static,
    S: Synthesizer + Send + Sync + 'static,
{
    if request.question.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "question must not be blank".to_string(),
        ));
    }

    let body = match state.engine.answer(&request.question).await {
        Ok(AnswerOutcome::Direct {
            answer,
            reference,
            provenance,
            relevance,
        }) => {
            info!(relevance, "Serving stored answer");
            AskResponse {
                status: RECALL_STATUS_DIRECT,
                provenance: Some(provenance.as_str()),
                relevance: Some(relevance),
                chunks: chunk_message(&render_answer(&answer, &reference)),
            }
        }
        Ok(AnswerOutcome::Synthesized { answer, reference }) => AskResponse {
            status: RECALL_STATUS_SYNTHESIZED,
            provenance: Some("generated"),
            relevance: None,
            chunks: chunk_message(&render_answer(&answer, &reference)),
        },
        Ok(AnswerOutcome::Miss) => AskResponse {
            status: RECALL_STATUS_MISS,
            provenance: None,
            relevance: None,
            chunks: chunk_message(INSUFFICIENT_KNOWLEDGE_MESSAGE),
        },
        Err(e) if e.is_collaborator_failure() => {
            warn!(error = %e, "Collaborator failure; serving fixed apology");
            AskResponse {
                status: RECALL_STATUS_FALLBACK,
                provenance: None,
                relevance: None,
                chunks: chunk_message(SYNTHESIS_FAILURE_MESSAGE),
            }
        }
        Err(e) => {
            error!(error = %e, "Answer pipeline failed");
            return Err(GatewayError::IndexError(e.to_string()));
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        RECALL_STATUS_HEADER,
        HeaderValue::from_str(body.status).unwrap_or(HeaderValue::from_static("error")),
    );

    Ok((StatusCode::OK, headers, Json(body)).into_response())
}

#[instrument(skip(state))]
pub async fn stats_handler<E, S>(State(state): State<AppState<E, S>>) -> Json<StatsResponse>
where
    E: EmbeddingClient + Send + Sync + 'static,
    S: Synthesizer + Send + Sync + 'static,
{
    Json(state.admin.stats().await.into())
}

#[instrument(skip(state, request))]
pub async fn prune_handler<E, S>(
    State(state): State<AppState<E, S>>,
    Json(request): Json<PruneRequest>,
) -> Result<Json<PruneResponse>, GatewayError>
where
    E: EmbeddingClient + Send + Sync + 'static,
    S: Synthesizer + Send + Sync + 'static,
{
    let outcome = state
        .admin
        .prune_generated(request.confirm_empty)
        .await
        .map_err(|e| GatewayError::IndexError(e.to_string()))?;

    Ok(Json(outcome.into()))
}
