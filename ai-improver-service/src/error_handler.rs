//! Unified error handling for `ai-improver-service`.
//!
//! The improve cycle itself only ever fails with [`ImproveError`]: every
//! failure inside the transport is caught at its boundary and mapped to one of
//! its two kinds, so callers never see heterogeneous error shapes. Config
//! loading and file-backed documents have their own small enums, and
//! [`AiImproverError`] groups everything for hosts that want a single type.
//!
//! All messages carry the `[AI Improver]` prefix to simplify attribution in logs.

use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiImproverError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-improver-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiImproverError {
    /// Configuration loading errors (env / options).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failure of an improve cycle (server status or transport).
    #[error(transparent)]
    Improve(#[from] ImproveError),

    /// The document could not be replaced.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The HTTP client could not be constructed.
    #[error("[AI Improver] failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/* ------------------------------------------------------------------------- */
/* Improve-cycle errors                                                      */
/* ------------------------------------------------------------------------- */

/// Error of a single improve cycle.
///
/// Degenerate completions (empty text, missing tags) are never errors; the
/// normalizer repairs them.
#[derive(Debug, Error)]
pub enum ImproveError {
    /// The inference server answered with a non-success HTTP status.
    ///
    /// The body of the error response is never read.
    #[error("[AI Improver] LLM server error: {status}")]
    Server {
        /// Numeric HTTP status code.
        status: u16,
    },

    /// Network failure, undecodable body, or any other failure during the
    /// request/response exchange. Carries the original failure's message.
    #[error("[AI Improver] failed to improve page: {0}")]
    Transport(String),

    /// Another guarded call is still in flight (only from `improve_exclusive`).
    #[error("[AI Improver] an improvement request is already in flight")]
    Busy,
}

impl ImproveError {
    /// Status code carried by [`ImproveError::Server`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ImproveError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ImproveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(format!("invalid JSON in response body: {err}"))
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/options-driven setup.
///
/// There are no range errors here: out-of-range generation parameters are
/// handed to the server unchanged.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (temperature, token budget, GPU layers).
    #[error("[AI Improver] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `IMPROVER_MAX_TOKENS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI Improver] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `IMPROVER_API_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// The options object was not valid JSON for [`ImproverOptions`].
    ///
    /// [`ImproverOptions`]: crate::config::improver_config::ImproverOptions
    #[error("[AI Improver] invalid options object: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

/* ------------------------------------------------------------------------- */
/* Document errors                                                           */
/* ------------------------------------------------------------------------- */

/// Errors of document sinks that can actually fail (file-backed ones).
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Reading or writing the page file failed.
    #[error("[AI Improver] failed to write document {path}: {source}")]
    Io {
        /// Target file path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/* ------------------------------------------------------------------------- */
/* Env helpers                                                               */
/* ------------------------------------------------------------------------- */

/// Parses an optional `u32` from a lookup (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a valid `u32`.
pub fn opt_u32(
    name: &'static str,
    value: Option<String>,
) -> std::result::Result<Option<u32>, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().parse::<u32>().map(Some).map_err(|_| {
            ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            }
        }),
        _ => Ok(None),
    }
}

/// Parses an optional finite `f32` from a lookup (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a finite number.
pub fn opt_f32(
    name: &'static str,
    value: Option<String>,
) -> std::result::Result<Option<f32>, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => match v.trim().parse::<f32>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(ConfigError::InvalidNumber {
                var: name,
                reason: "expected a finite number",
            }),
        },
        _ => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(
    var: &'static str,
    value: &str,
) -> std::result::Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        })
    }
}
