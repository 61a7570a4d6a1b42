use std::convert::Infallible;

use super::DocumentSink;

/// In-process document: current markup plus the scripts attached since the
/// last replacement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDocument {
    html: String,
    scripts: Vec<String>,
    replacements: usize,
}

impl MemoryDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Self::default()
        }
    }

    /// Current document markup.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Scripts attached to the current document, in injection order.
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// How many times the document was replaced.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl DocumentSink for MemoryDocument {
    type Error = Infallible;

    fn replace(&mut self, html: &str) -> Result<(), Infallible> {
        self.html = html.to_string();
        // scripts belonged to the old document
        self.scripts.clear();
        self.replacements += 1;
        Ok(())
    }

    fn reinject_self(&mut self, script_ref: &str) -> Result<(), Infallible> {
        self.scripts.push(script_ref.to_string());
        Ok(())
    }
}
