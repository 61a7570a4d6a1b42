//! Document replacement: the one environment-bound side effect of the cycle.
//!
//! The host document is reached only through [`DocumentSink`], so the rest of
//! the crate stays pure and testable. Sinks shipped here:
//!
//! - [`MemoryDocument`]: in-process document, used by tests and embedders.
//! - [`FileDocument`]: a page file on disk, used by the native host binary.
//! - `BrowserDocument` (feature `web`, wasm32 only): the live DOM.

mod file;
mod memory;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

pub use file::FileDocument;
pub use memory::MemoryDocument;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::BrowserDocument;

use tracing::info;

/// Capability to install a whole new document and re-attach a script to it.
pub trait DocumentSink {
    /// Error of the underlying host. Use [`std::convert::Infallible`] when
    /// writes cannot fail.
    type Error;

    /// Discard the current document entirely and install `html` as the new one.
    fn replace(&mut self, html: &str) -> Result<(), Self::Error>;

    /// Attach a `<script src=script_ref>` to the current document.
    fn reinject_self(&mut self, script_ref: &str) -> Result<(), Self::Error>;
}

/// Replace the document behind `sink` with `html`, then re-attach
/// `script_ref` so another improvement cycle can run on the new page.
///
/// No validation and no rollback: the previous document is gone once this
/// returns `Ok`.
pub fn apply_improved_html<S>(sink: &mut S, html: &str, script_ref: &str) -> Result<(), S::Error>
where
    S: DocumentSink + ?Sized,
{
    sink.replace(html)?;
    sink.reinject_self(script_ref)?;
    info!(html_len = html.len(), script_ref, "document replaced");
    Ok(())
}
