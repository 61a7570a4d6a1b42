use serde::Deserialize;

use crate::error_handler::ConfigError;

/// Default completion endpoint of a local llama.cpp server.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/completion";
/// Model the prompt is tuned for.
pub const DEFAULT_MODEL: &str = "qwen2-7b-instruct";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_GPU_LAYERS: u32 = 45;
/// Script resource re-attached to every replacement document.
pub const DEFAULT_SCRIPT_REF: &str = "ai-improve-api.js";

/// Configuration of one improver client.
///
/// Built once and owned by a single [`AiImprover`](crate::AiImprover); the
/// client never mutates it.
///
/// # Fields
///
/// - `endpoint_url`: Completion endpoint the prompt is POSTed to.
/// - `model_id`: Identifier of the model the server is expected to run.
/// - `temperature`: Sampling temperature, sent as-is (no range check).
/// - `max_tokens`: Token budget, sent as `n_predict`.
/// - `gpu_layers`: GPU offload hint for the server operator.
///
/// `model_id` and `gpu_layers` describe the expected server setup; they are
/// not part of the completion request body.
///
/// # Examples
///
/// ```
/// use ai_improver_service::config::improver_config::{ImproverConfig, ImproverOptions};
///
/// let cfg = ImproverConfig::from_options(ImproverOptions {
///     temperature: Some(1.1),
///     ..ImproverOptions::default()
/// });
/// assert_eq!(cfg.temperature, 1.1);
/// assert_eq!(cfg.max_tokens, 2048);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImproverConfig {
    pub endpoint_url: String,
    pub model_id: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub gpu_layers: u32,
}

impl Default for ImproverConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_API_URL.to_string(),
            model_id: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            gpu_layers: DEFAULT_GPU_LAYERS,
        }
    }
}

impl ImproverConfig {
    /// Builds a config from an options object, filling every absent field
    /// with its default. Present values are taken unchanged.
    pub fn from_options(opts: ImproverOptions) -> Self {
        let d = Self::default();
        Self {
            endpoint_url: opts.api_url.unwrap_or(d.endpoint_url),
            model_id: opts.model.unwrap_or(d.model_id),
            temperature: opts.temperature.unwrap_or(d.temperature),
            max_tokens: opts.max_tokens.unwrap_or(d.max_tokens),
            gpu_layers: opts.gpu_layers.unwrap_or(d.gpu_layers),
        }
    }
}

/// Optional configuration object, as passed by an embedding page.
///
/// Keys are camelCase so the same JSON object a page hands to the script can
/// be deserialized directly:
///
/// ```
/// use ai_improver_service::config::improver_config::ImproverOptions;
///
/// let opts = ImproverOptions::from_json(r#"{ "apiUrl": "http://10.0.0.2:8080/completion", "maxTokens": 512 }"#).unwrap();
/// assert_eq!(opts.max_tokens, Some(512));
/// assert!(opts.model.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImproverOptions {
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub gpu_layers: Option<u32>,
    /// Path of the client's own script, re-attached after each replacement.
    pub script_ref: Option<String>,
}

impl ImproverOptions {
    /// Parses an options object from JSON. Unknown keys are ignored.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidOptions`] if the text is not a JSON
    /// object of the expected shape.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_yield_documented_defaults() {
        let cfg = ImproverConfig::from_options(ImproverOptions::default());
        assert_eq!(cfg.endpoint_url, "http://localhost:8080/completion");
        assert_eq!(cfg.model_id, "qwen2-7b-instruct");
        assert_eq!(cfg.temperature, 0.7);
        assert_eq!(cfg.max_tokens, 2048);
        assert_eq!(cfg.gpu_layers, 45);
        assert_eq!(cfg, ImproverConfig::default());
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let cfg = ImproverConfig::from_options(ImproverOptions {
            temperature: Some(7.5),
            max_tokens: Some(0),
            gpu_layers: Some(0),
            ..Default::default()
        });
        assert_eq!(cfg.temperature, 7.5);
        assert_eq!(cfg.max_tokens, 0);
        assert_eq!(cfg.gpu_layers, 0);
    }

    #[test]
    fn options_json_uses_camel_case_keys() {
        let opts = ImproverOptions::from_json(
            r#"{"model":"llama3","gpuLayers":20,"scriptRef":"/js/improver.js","extra":true}"#,
        )
        .unwrap();
        assert_eq!(opts.model.as_deref(), Some("llama3"));
        assert_eq!(opts.gpu_layers, Some(20));
        assert_eq!(opts.script_ref.as_deref(), Some("/js/improver.js"));
    }

    #[test]
    fn options_json_rejects_wrong_types() {
        let err = ImproverOptions::from_json(r#"{"maxTokens":"lots"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOptions(_)));
    }
}
