//! HTTP gateway (Axum) for asking questions and administering the index.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handler::{ask_handler, prune_handler, stats_handler};
pub use state::AppState;

use crate::constants::{RECALL_STATUS_HEADER, RECALL_STATUS_HEALTHY};
use crate::embedding::EmbeddingClient;
use crate::synthesis::Synthesizer;

pub fn create_router_with_state<E, S>(state: AppState<E, S>) -> Router
where
    E: EmbeddingClient + Send + Sync + 'static,
    S: Synthesizer + Send + Sync + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/v1/ask", post(ask_handler))
        .route("/v1/admin/stats", get(stats_handler))
        .route("/v1/admin/prune", post(prune_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        RECALL_STATUS_HEADER,
        HeaderValue::from_static(RECALL_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}
