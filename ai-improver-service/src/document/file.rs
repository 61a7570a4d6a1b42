use std::path::{Path, PathBuf};

use tracing::debug;

use super::DocumentSink;
use crate::error_handler::DocumentError;

/// A page file on disk standing in for the live document.
///
/// `replace` overwrites the file; `reinject_self` splices a script tag into
/// it, before `</head>` when present, else before the last `</html>`, else at
/// the end.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current page.
    pub fn read(&self) -> Result<String, DocumentError> {
        std::fs::read_to_string(&self.path).map_err(|e| self.io_err(e))
    }

    fn write(&self, html: &str) -> Result<(), DocumentError> {
        std::fs::write(&self.path, html).map_err(|e| self.io_err(e))
    }

    fn io_err(&self, source: std::io::Error) -> DocumentError {
        DocumentError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl DocumentSink for FileDocument {
    type Error = DocumentError;

    fn replace(&mut self, html: &str) -> Result<(), DocumentError> {
        debug!(path = %self.path.display(), len = html.len(), "writing replacement page");
        self.write(html)
    }

    fn reinject_self(&mut self, script_ref: &str) -> Result<(), DocumentError> {
        let html = self.read()?;
        self.write(&insert_script_tag(&html, script_ref))
    }
}

/// Splices `<script src="{script_ref}"></script>` into `html`.
fn insert_script_tag(html: &str, script_ref: &str) -> String {
    let tag = format!("<script src=\"{}\"></script>", escape_attr(script_ref));
    let at = html
        .find("</head>")
        .or_else(|| html.rfind("</html>"))
        .unwrap_or(html.len());

    let mut out = String::with_capacity(html.len() + tag.len());
    out.push_str(&html[..at]);
    out.push_str(&tag);
    out.push_str(&html[at..]);
    out
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}
