//! Self-improving page client for a local llama.cpp-style inference server.
//!
//! One cycle: build a prompt around the current page source, POST it to the
//! completion endpoint, repair the answer into an HTML document, and install
//! that document in place of the current one, re-attaching the client script
//! so the next cycle can run.
//!
//! Public API:
//! - [`AiImprover::improve`] / [`AiImprover::run_cycle`]
//! - [`prompt::build_prompt`] and [`normalizer::normalize_html`] as pure steps
//! - [`DocumentSink`] and the shipped sinks for installing the result
//!
//! See [`telemetry`] for a library-scoped logging layer.

pub mod config;
pub mod document;
pub mod error_handler;
pub mod improver;
pub mod normalizer;
pub mod prompt;
pub mod services;
pub mod telemetry;

pub use config::improver_config::{ImproverConfig, ImproverOptions};
pub use document::{DocumentSink, FileDocument, MemoryDocument, apply_improved_html};
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use document::BrowserDocument;
pub use error_handler::{AiImproverError, ConfigError, DocumentError, ImproveError};
pub use improver::{AiImprover, CycleError};
