//! Thin client for a llama.cpp-style `/completion` endpoint.
//!
//! One call, one `POST {endpoint}` with a JSON body, one JSON answer. There
//! is no retry and no internal timeout: a caller that wants one passes a
//! pre-configured [`reqwest::Client`] to [`CompletionService::with_client`].
//!
//! # Examples
//!
//! ```no_run
//! use ai_improver_service::config::improver_config::ImproverConfig;
//! use ai_improver_service::services::completion_service::{CompletionService, GenerationRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ImproverConfig::default();
//! let svc = CompletionService::new(&cfg)?;
//!
//! let req = GenerationRequest::from_cfg(&cfg, "Write a haiku about Rust.".into());
//! let text = svc.complete(&req).await?.into_completion();
//! println!("Generated:\n{}", text);
//! # Ok(()) }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::config::improver_config::ImproverConfig;
use crate::error_handler::ImproveError;

/// Nucleus sampling cutoff sent with every request.
pub const TOP_P: f32 = 0.9;

/// Stop sequences sent with every request: a code fence and the closing tag.
pub const STOP_SEQUENCES: [&str; 2] = ["```", "</html>"];

/// Reusable HTTP client bound to one completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionService {
    client: reqwest::Client,
    url: String,
}

impl CompletionService {
    /// Creates a service for `cfg.endpoint_url` with a default HTTP client.
    ///
    /// # Errors
    /// Returns [`reqwest::Error`] if the HTTP client cannot be built.
    pub fn new(cfg: &ImproverConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(cfg, client))
    }

    /// Creates a service that sends through the given client (timeouts,
    /// proxies and TLS are whatever the caller configured on it).
    pub fn with_client(cfg: &ImproverConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            url: cfg.endpoint_url.clone(),
        }
    }

    /// Target URL of every request.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends a single non-streaming completion request.
    ///
    /// # Errors
    /// - [`ImproveError::Server`] for non-2xx responses (body is not read)
    /// - [`ImproveError::Transport`] for network failures or a body that is
    ///   not valid JSON
    #[instrument(skip_all, fields(url = %self.url, n_predict = req.n_predict))]
    pub async fn complete(&self, req: &GenerationRequest) -> Result<GenerationResponse, ImproveError> {
        debug!(prompt_len = req.prompt.len(), "POST {}", self.url);

        let resp = self
            .client
            .post(&self.url)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "completion request failed");
                ImproveError::from(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            error!(%status, "LLM server returned non-success status");
            return Err(ImproveError::Server {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| {
            error!(error = %e, "failed to read completion body");
            ImproveError::from(e)
        })?;

        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            error!(error = %e, body_len = body.len(), "completion body is not valid JSON");
            ImproveError::from(e)
        })?;

        let out = GenerationResponse::from_value(value);
        debug!(
            has_content = out.content.is_some(),
            has_response = out.response.is_some(),
            "completion received"
        );
        Ok(out)
    }
}

/* ==========================
HTTP payloads
========================== */

/// Request body for the completion endpoint.
///
/// Built fresh per call; `top_p` and `stop` are fixed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub top_p: f32,
    pub n_predict: u32,
    pub stop: Vec<String>,
}

impl GenerationRequest {
    /// Builds a request from config and prompt.
    pub fn from_cfg(cfg: &ImproverConfig, prompt: String) -> Self {
        Self {
            prompt,
            temperature: cfg.temperature,
            top_p: TOP_P,
            n_predict: cfg.max_tokens,
            stop: STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Recognized fields of a completion response.
///
/// llama.cpp answers with `content`; Ollama-style servers with `response`.
/// Non-string values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl GenerationResponse {
    /// Reads the two recognized fields out of any JSON value.
    ///
    /// Anything but an object yields an empty response.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                let field = |k: &str| map.get(k).and_then(Value::as_str).map(str::to_string);
                Self {
                    content: field("content"),
                    response: field("response"),
                }
            }
            _ => Self::default(),
        }
    }

    /// Completion text: non-empty `content`, else non-empty `response`,
    /// else the empty string.
    pub fn into_completion(self) -> String {
        self.content
            .filter(|s| !s.is_empty())
            .or(self.response.filter(|s| !s.is_empty()))
            .unwrap_or_default()
    }
}
