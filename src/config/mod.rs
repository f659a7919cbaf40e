//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `RECALL_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_DIRECT_ANSWER_RELEVANCE, DEFAULT_MAX_INPUT_CHARS, DEFAULT_MIN_RELEVANCE, DEFAULT_TOP_K,
};
use crate::policy::RelevanceThresholds;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RECALL_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Path of the index snapshot file. Default: `./.data/index.json`.
    pub index_path: PathBuf,

    /// Base URL of the OpenAI-compatible API serving embeddings and chat
    /// completions. Default: `https://api.openai.com/v1`.
    pub api_base_url: String,

    /// API key for the model endpoint. Required by `serve` and `load`.
    pub api_key: Option<String>,

    /// Embedding model identifier. Default: `text-embedding-3-small`.
    pub embedding_model: String,

    /// Generation model identifier. Default: `gpt-4o-mini`.
    pub generation_model: String,

    /// Relevance floor for using an entry at all. Default: `0.7`.
    pub min_relevance: f32,

    /// Relevance floor for serving a stored answer verbatim. Default: `0.98`.
    pub direct_answer_relevance: f32,

    /// Nearest neighbors fetched per query. Default: `5`.
    pub top_k: usize,

    /// Query truncation length in characters. Default: `4000`.
    pub max_input_chars: usize,

    /// Sampling temperature for synthesis. Default: `0.0`.
    pub temperature: f32,

    /// Completion token cap for synthesis. Default: `1024`.
    pub max_completion_tokens: u32,

    /// Per-request timeout for collaborator HTTP calls, in seconds.
    /// Default: `30`.
    pub request_timeout_secs: u64,
}

/// Default API base URL used when `RECALL_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            index_path: PathBuf::from("./.data/index.json"),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            embedding_model: "text-embedding-3-small".to_string(),
            generation_model: "gpt-4o-mini".to_string(),
            min_relevance: DEFAULT_MIN_RELEVANCE,
            direct_answer_relevance: DEFAULT_DIRECT_ANSWER_RELEVANCE,
            top_k: DEFAULT_TOP_K,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            temperature: 0.0,
            max_completion_tokens: 1024,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RECALL_PORT";
    const ENV_BIND_ADDR: &'static str = "RECALL_BIND_ADDR";
    const ENV_INDEX_PATH: &'static str = "RECALL_INDEX_PATH";
    const ENV_API_BASE_URL: &'static str = "RECALL_API_BASE_URL";
    const ENV_API_KEY: &'static str = "RECALL_API_KEY";
    const ENV_EMBEDDING_MODEL: &'static str = "RECALL_EMBEDDING_MODEL";
    const ENV_GENERATION_MODEL: &'static str = "RECALL_GENERATION_MODEL";
    const ENV_MIN_RELEVANCE: &'static str = "RECALL_MIN_RELEVANCE";
    const ENV_DIRECT_ANSWER_RELEVANCE: &'static str = "RECALL_DIRECT_ANSWER_RELEVANCE";
    const ENV_TOP_K: &'static str = "RECALL_TOP_K";
    const ENV_MAX_INPUT_CHARS: &'static str = "RECALL_MAX_INPUT_CHARS";
    const ENV_TEMPERATURE: &'static str = "RECALL_TEMPERATURE";
    const ENV_MAX_COMPLETION_TOKENS: &'static str = "RECALL_MAX_COMPLETION_TOKENS";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "RECALL_REQUEST_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let index_path = Self::parse_path_from_env(Self::ENV_INDEX_PATH, defaults.index_path);
        let api_base_url =
            Self::parse_string_from_env(Self::ENV_API_BASE_URL, defaults.api_base_url);
        let api_key = Self::parse_optional_string_from_env(Self::ENV_API_KEY);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let generation_model =
            Self::parse_string_from_env(Self::ENV_GENERATION_MODEL, defaults.generation_model);
        let min_relevance =
            Self::parse_f32_from_env(Self::ENV_MIN_RELEVANCE, defaults.min_relevance)?;
        let direct_answer_relevance = Self::parse_f32_from_env(
            Self::ENV_DIRECT_ANSWER_RELEVANCE,
            defaults.direct_answer_relevance,
        )?;
        let top_k = Self::parse_usize_from_env(Self::ENV_TOP_K, defaults.top_k)?;
        let max_input_chars =
            Self::parse_usize_from_env(Self::ENV_MAX_INPUT_CHARS, defaults.max_input_chars)?;
        let temperature = Self::parse_f32_from_env(Self::ENV_TEMPERATURE, defaults.temperature)?;
        let max_completion_tokens = Self::parse_u32_from_env(
            Self::ENV_MAX_COMPLETION_TOKENS,
            defaults.max_completion_tokens,
        )?;
        let request_timeout_secs = Self::parse_u64_from_env(
            Self::ENV_REQUEST_TIMEOUT_SECS,
            defaults.request_timeout_secs,
        )?;

        Ok(Self {
            port,
            bind_addr,
            index_path,
            api_base_url,
            api_key,
            embedding_model,
            generation_model,
            min_relevance,
            direct_answer_relevance,
            top_k,
            max_input_chars,
            temperature,
            max_completion_tokens,
            request_timeout_secs,
        })
    }

    /// Validates value ranges and invariants (does not touch the filesystem).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds()?;

        if self.top_k == 0 {
            return Err(ConfigError::MustBePositive {
                name: Self::ENV_TOP_K,
            });
        }
        if self.max_input_chars == 0 {
            return Err(ConfigError::MustBePositive {
                name: Self::ENV_MAX_INPUT_CHARS,
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::MustBePositive {
                name: Self::ENV_REQUEST_TIMEOUT_SECS,
            });
        }

        Ok(())
    }

    /// The validated threshold pair.
    pub fn thresholds(&self) -> Result<RelevanceThresholds, ConfigError> {
        Ok(RelevanceThresholds::new(
            self.min_relevance,
            self.direct_answer_relevance,
        )?)
    }

    /// The API key, required for anything that talks to the model endpoint.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_API_KEY,
            })
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_f32_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: var_name,
                value,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: var_name,
                value,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u32_from_env(var_name: &'static str, default: u32) -> Result<u32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: var_name,
                value,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: var_name,
                value,
            }),
            Err(_) => Ok(default),
        }
    }
}
