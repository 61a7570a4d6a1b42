//! Minimal repair of a raw completion into an HTML document.
//!
//! Only two things are guaranteed afterwards: the text (ignoring leading
//! whitespace) starts with a doctype, and it contains `</html>`. Everything in
//! between is passed through untouched.

pub const DOCTYPE_MARKER: &str = "<!DOCTYPE";
pub const DOCTYPE_PREFIX: &str = "<!DOCTYPE html>\n";
pub const CLOSING_HTML: &str = "</html>";

/// Normalize a raw completion.
///
/// - Doctype check is case-sensitive and runs on the trimmed text, but the
///   prefix is prepended to the untrimmed text.
/// - `\n</html>` is appended when `</html>` appears nowhere.
///
/// Both repairs are independent and the function is idempotent.
///
/// ```
/// # use ai_improver_service::normalizer::normalize_html;
/// assert_eq!(normalize_html("<p>hi</p>"), "<!DOCTYPE html>\n<p>hi</p>\n</html>");
/// ```
pub fn normalize_html(raw: &str) -> String {
    let needs_doctype = !raw.trim().starts_with(DOCTYPE_MARKER);
    let needs_closing = !raw.contains(CLOSING_HTML);

    let mut out = String::with_capacity(raw.len() + DOCTYPE_PREFIX.len() + CLOSING_HTML.len() + 1);
    if needs_doctype {
        out.push_str(DOCTYPE_PREFIX);
    }
    out.push_str(raw);
    if needs_closing {
        out.push('\n');
        out.push_str(CLOSING_HTML);
    }
    out
}
