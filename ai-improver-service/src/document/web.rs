use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlScriptElement};

use super::DocumentSink;

/// The live DOM document of the page the client runs in.
#[derive(Debug, Clone)]
pub struct BrowserDocument {
    document: Document,
}

impl BrowserDocument {
    /// The document of the global `window`, if there is one.
    pub fn current() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    pub fn from_document(document: Document) -> Self {
        Self { document }
    }
}

impl DocumentSink for BrowserDocument {
    type Error = JsValue;

    /// `document.open()`, `document.write(html)`, `document.close()`.
    ///
    /// Listeners and timers of the old document are dropped by the browser.
    fn replace(&mut self, html: &str) -> Result<(), JsValue> {
        self.document.open()?;
        self.document.write(&Array::of1(&JsValue::from_str(html)))?;
        self.document.close()
    }

    fn reinject_self(&mut self, script_ref: &str) -> Result<(), JsValue> {
        let script: HtmlScriptElement = self
            .document
            .create_element("script")?
            .dyn_into()
            .map_err(JsValue::from)?;
        script.set_src(script_ref);

        match self.document.head() {
            Some(head) => head.append_child(&script)?,
            None => match self.document.document_element() {
                Some(root) => root.append_child(&script)?,
                None => self.document.append_child(&script)?,
            },
        };
        Ok(())
    }
}
