//! Improver options loaded from environment variables.
//!
//! Every variable is optional; anything unset or empty keeps the built-in
//! default. Values are not range-checked, only parsed.
//!
//! # Environment variables
//!
//! - `IMPROVER_API_URL`     = completion endpoint (must be http/https)
//! - `IMPROVER_MODEL`       = expected model id
//! - `IMPROVER_TEMPERATURE` = sampling temperature (f32)
//! - `IMPROVER_MAX_TOKENS`  = token budget (u32)
//! - `IMPROVER_GPU_LAYERS`  = GPU offload hint (u32)
//! - `IMPROVER_SCRIPT_REF`  = script path re-attached after replacement

use crate::{
    config::improver_config::ImproverOptions,
    error_handler::{ConfigError, opt_f32, opt_u32, validate_http_endpoint},
};

/// Reads [`ImproverOptions`] from the process environment.
///
/// # Errors
///
/// - [`ConfigError::InvalidNumber`] if a numeric variable does not parse
/// - [`ConfigError::InvalidFormat`] if `IMPROVER_API_URL` has no http(s) scheme
pub fn options_from_env() -> Result<ImproverOptions, ConfigError> {
    options_from_lookup(|name| std::env::var(name).ok())
}

/// Same as [`options_from_env`] but reads values through `lookup`.
pub fn options_from_lookup<F>(lookup: F) -> Result<ImproverOptions, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    let text = |name: &'static str| lookup(name).filter(|v: &String| !v.trim().is_empty());

    let api_url = text("IMPROVER_API_URL");
    if let Some(url) = api_url.as_deref() {
        validate_http_endpoint("IMPROVER_API_URL", url)?;
    }

    Ok(ImproverOptions {
        api_url,
        model: text("IMPROVER_MODEL"),
        temperature: opt_f32("IMPROVER_TEMPERATURE", lookup("IMPROVER_TEMPERATURE"))?,
        max_tokens: opt_u32("IMPROVER_MAX_TOKENS", lookup("IMPROVER_MAX_TOKENS"))?,
        gpu_layers: opt_u32("IMPROVER_GPU_LAYERS", lookup("IMPROVER_GPU_LAYERS"))?,
        script_ref: text("IMPROVER_SCRIPT_REF"),
    })
}
