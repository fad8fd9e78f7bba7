//! Script-literal escaping for document text.

use std::fmt::Write;

/// Encode `text` for splicing into a double-quoted JavaScript string literal
/// inside an inline `<script>` element.
///
/// Everything except `[A-Za-z0-9_]` becomes a `\uXXXX` escape of its UTF-16
/// code units, so the output can neither close the literal nor be parsed as
/// markup. Apply once; the output is not meant to be escaped again.
pub fn escape_for_embedding(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut units = [0u16; 2];

    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            escaped.push(c);
            continue;
        }
        for unit in c.encode_utf16(&mut units) {
            // Writing to a String cannot fail
            let _ = write!(escaped, "\\u{:04x}", unit);
        }
    }

    escaped
}
