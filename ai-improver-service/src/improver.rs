//! The improve cycle: prompt → completion request → normalize → (apply).
//!
//! [`AiImprover::improve`] is the plain, unguarded operation: overlapping
//! calls race against the server independently and whoever drives the page
//! decides what to do with interleaved results. [`AiImprover::improve_exclusive`]
//! is an opt-in single-slot guard for hosts that want at most one request in
//! flight.
//!
//! # Example
//! ```no_run
//! use ai_improver_service::{AiImprover, MemoryDocument};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let improver = AiImprover::with_defaults()?;
//! let mut page = MemoryDocument::new("<!DOCTYPE html><html><body>v1</body></html>");
//!
//! let current = page.html().to_string();
//! improver.run_cycle(&current, &mut page).await?;
//! println!("{}", page.html());
//! # Ok(()) }
//! ```

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::config::improver_config::{DEFAULT_SCRIPT_REF, ImproverConfig, ImproverOptions};
use crate::document::{DocumentSink, apply_improved_html};
use crate::error_handler::{AiImproverError, ImproveError};
use crate::normalizer::normalize_html;
use crate::prompt::build_prompt;
use crate::services::completion_service::{CompletionService, GenerationRequest};

/// Failure of a full cycle (improve + apply).
///
/// When `Improve` is returned the document was not touched.
#[derive(Debug, Error)]
pub enum CycleError<E> {
    #[error(transparent)]
    Improve(#[from] ImproveError),

    #[error("[AI Improver] document replacement failed: {0:?}")]
    Document(E),
}

/// Client that asks a local inference server to rewrite a page.
///
/// Holds an immutable [`ImproverConfig`], the script path it re-attaches to
/// each new document, and a reusable HTTP client.
#[derive(Debug)]
pub struct AiImprover {
    cfg: ImproverConfig,
    script_ref: String,
    service: CompletionService,
    in_flight: Mutex<()>,
}

impl AiImprover {
    /// Creates a client for `cfg` with a default HTTP client.
    ///
    /// # Errors
    /// Returns [`AiImproverError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(cfg: ImproverConfig) -> Result<Self, AiImproverError> {
        let service = CompletionService::new(&cfg)?;
        Ok(Self::from_parts(cfg, service))
    }

    /// Creates a client with every setting at its default.
    pub fn with_defaults() -> Result<Self, AiImproverError> {
        Self::new(ImproverConfig::default())
    }

    /// Creates a client from an options object; absent fields take defaults.
    pub fn from_options(opts: ImproverOptions) -> Result<Self, AiImproverError> {
        let script_ref = opts.script_ref.clone();
        let improver = Self::new(ImproverConfig::from_options(opts))?;
        Ok(match script_ref {
            Some(s) => improver.with_script_ref(s),
            None => improver,
        })
    }

    /// Creates a client that sends through a caller-configured HTTP client
    /// (e.g. one with a timeout).
    pub fn with_client(cfg: ImproverConfig, client: reqwest::Client) -> Self {
        let service = CompletionService::with_client(&cfg, client);
        Self::from_parts(cfg, service)
    }

    fn from_parts(cfg: ImproverConfig, service: CompletionService) -> Self {
        Self {
            cfg,
            script_ref: DEFAULT_SCRIPT_REF.to_string(),
            service,
            in_flight: Mutex::new(()),
        }
    }

    /// Overrides the script path re-attached after each replacement.
    pub fn with_script_ref(mut self, script_ref: impl Into<String>) -> Self {
        self.script_ref = script_ref.into();
        self
    }

    pub fn config(&self) -> &ImproverConfig {
        &self.cfg
    }

    pub fn script_ref(&self) -> &str {
        &self.script_ref
    }

    /// Asks the server to improve `html` and returns the normalized result.
    ///
    /// Exactly one request is sent. The result always starts with a doctype
    /// and contains `</html>`; nothing else about it is checked.
    ///
    /// # Errors
    /// - [`ImproveError::Server`] if the server answers with a non-2xx status
    /// - [`ImproveError::Transport`] for network failures and undecodable bodies
    #[instrument(skip_all, fields(model = %self.cfg.model_id, html_len = html.len()))]
    pub async fn improve(&self, html: &str) -> Result<String, ImproveError> {
        let req = GenerationRequest::from_cfg(&self.cfg, build_prompt(html));
        let completion = self.service.complete(&req).await?.into_completion();
        if completion.is_empty() {
            warn!("server returned no completion text");
        }

        let improved = normalize_html(&completion);
        info!(improved_len = improved.len(), "page improved");
        Ok(improved)
    }

    /// Like [`improve`](Self::improve), but fails fast with
    /// [`ImproveError::Busy`] instead of sending a second request while a
    /// previous guarded call is still outstanding.
    ///
    /// Calls to plain `improve` are not counted.
    pub async fn improve_exclusive(&self, html: &str) -> Result<String, ImproveError> {
        let _slot = self.in_flight.try_lock().map_err(|_| {
            warn!("improvement already in flight; rejecting");
            ImproveError::Busy
        })?;
        self.improve(html).await
    }

    /// Replaces the document behind `sink` with `html` and re-attaches this
    /// client's script.
    pub fn apply_improved_html<S>(&self, sink: &mut S, html: &str) -> Result<(), S::Error>
    where
        S: DocumentSink + ?Sized,
    {
        apply_improved_html(sink, html, &self.script_ref)
    }

    /// Full cycle: improve `html`, then install the result through `sink`.
    ///
    /// On an improve failure the sink is never touched. Returns the HTML that
    /// was installed.
    pub async fn run_cycle<S>(&self, html: &str, sink: &mut S) -> Result<String, CycleError<S::Error>>
    where
        S: DocumentSink + ?Sized,
    {
        let improved = self.improve(html).await?;
        self.apply_improved_html(sink, &improved)
            .map_err(CycleError::Document)?;
        Ok(improved)
    }
}
