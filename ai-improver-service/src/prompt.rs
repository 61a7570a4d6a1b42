//! Prompt builder: fixed improvement instructions + the verbatim page source.

/// Instruction block placed before the page source.
///
/// Ends with the `Original code:` delimiter; the page follows on the next line.
pub const IMPROVE_INSTRUCTIONS: &str = "\
You are an expert full-stack AI engineer. Improve this HTML page by:
1. Fixing any broken WebAssembly or JavaScript logic
2. Adding self-learning behavior (e.g., neuron adapts firing probability based on history)
3. Enhancing UI with real-time stats, charts, or animations
4. Ensuring all code remains in a single HTML file
5. Making it more interactive and educational

Return ONLY the complete, valid HTML code. No explanations. Start with <!DOCTYPE html>.

Original code:
";

/// Build the improvement prompt for `html`.
///
/// The page is appended as-is: no escaping, trimming or truncation, and no
/// size limit.
///
/// # Example
/// ```
/// # use ai_improver_service::prompt::build_prompt;
/// let prompt = build_prompt("<p>hello</p>");
/// assert!(prompt.ends_with("Original code:\n<p>hello</p>"));
/// ```
pub fn build_prompt(html: &str) -> String {
    let mut out = String::with_capacity(IMPROVE_INSTRUCTIONS.len() + html.len());
    out.push_str(IMPROVE_INSTRUCTIONS);
    out.push_str(html);
    out
}
