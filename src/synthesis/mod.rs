//! Answer synthesizer: bounded ranked context + query in, structured
//! `{answer, reference}` out.
//!
//! The collaborator runs under a strict "use only supplied context" contract.
//! Its reply is parsed with explicit schema validation; any violation is a
//! synthesis failure, never a best-effort parse.

pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::{SynthesisError, SynthesisResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSynthesizer;

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::retrieval::ContextFragment;

/// Structured synthesizer output. `reference` carries only the URIs of
/// fragments whose content was actually used, de-duplicated, one per line,
/// copied verbatim from the supplied fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisOutput {
    pub answer: String,
    pub reference: String,
}

impl SynthesisOutput {
    /// Validates the contract's shape constraints.
    pub fn validate(&self) -> SynthesisResult<()> {
        if self.answer.trim().is_empty() {
            return Err(SynthesisError::MalformedOutput {
                message: "answer is empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Parses the collaborator's raw reply into a validated [`SynthesisOutput`].
pub fn parse_output(raw: &str) -> SynthesisResult<SynthesisOutput> {
    let output: SynthesisOutput =
        serde_json::from_str(raw).map_err(|e| SynthesisError::MalformedOutput {
            message: format!("expected a JSON object with string fields `answer` and `reference`: {e}"),
        })?;
    output.validate()?;
    Ok(output)
}

/// Async interface used by the answer engine.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Produces a structured answer from ranked curated fragments.
    /// `fragments` must be non-empty and already ordered by relevance.
    async fn synthesize(
        &self,
        query: &str,
        fragments: &[ContextFragment],
    ) -> SynthesisResult<SynthesisOutput>;
}

const SYSTEM_PROMPT: &str = "You are a specialized question answering system. \
Answer the user's question using ONLY the information in the numbered \
fragments provided.\n\
\n\
Reply with a single JSON object with exactly two string fields:\n\
  \"answer\": a thorough answer built strictly from the fragments, including \
all important details, figures and facts that are relevant to the question. \
If the fragments do not contain the information, say so in the answer.\n\
  \"reference\": the URLs of the fragments whose content you actually used, \
one per line, separated by newline characters. Copy each URL exactly as \
given, without numbering, bullets or formatting. List each unique URL only \
once. If you used no fragment, use an empty string.\n\
\n\
You will be penalized for using information that is not in the fragments, \
for deviating from the JSON format, and for including URLs of fragments you \
did not use.";

/// Assembles the ordered fragments into the bounded context block fed to the
/// generation collaborator.
pub(crate) fn build_context_block(fragments: &[ContextFragment]) -> String {
    let mut block = String::new();
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            block.push_str("\n\n");
        }
        let _ = write!(
            block,
            "FRAGMENT #{n}\nQUESTION:\n{question}\nCONTEXT:\n{answer}\nURL:\n{reference}",
            n = i + 1,
            question = fragment.question,
            answer = fragment.answer,
            reference = fragment.reference,
        );
    }
    block
}

pub(crate) fn build_user_prompt(query: &str, fragments: &[ContextFragment]) -> String {
    format!(
        "CONTEXT:\n{block}\n\nQUESTION:\n{query}\n\nRespond with the JSON object only.",
        block = build_context_block(fragments),
    )
}

/// Client for an OpenAI-compatible chat completions endpoint, requesting a
/// JSON object response.
pub struct HttpSynthesizer {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_completion_tokens: u32,
}

impl HttpSynthesizer {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_completion_tokens: u32,
        timeout: Duration,
    ) -> SynthesisResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SynthesisError::Unavailable {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            max_completion_tokens,
        })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    #[instrument(skip(self, query, fragments), fields(model = %self.model, fragments = fragments.len()))]
    async fn synthesize(
        &self,
        query: &str,
        fragments: &[ContextFragment],
    ) -> SynthesisResult<SynthesisOutput> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_user_prompt(query, fragments) },
            ],
            "temperature": self.temperature,
            "max_completion_tokens": self.max_completion_tokens,
            "response_format": { "type": "json_object" },
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SynthesisError::Unavailable {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Unavailable {
                message: format!("status {status}: {body}"),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| SynthesisError::MalformedOutput {
                    message: e.to_string(),
                })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SynthesisError::MalformedOutput {
                message: "response contained no message content".to_string(),
            })?;

        let output = parse_output(&content)?;
        debug!(
            answer_len = output.answer.len(),
            reference_len = output.reference.len(),
            "Synthesis complete"
        );
        Ok(output)
    }
}
