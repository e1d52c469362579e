//! Balanced-brace JSON span extraction.
//!
//! Model responses wrap their JSON in prose or markdown fences often enough
//! that the parsers cannot feed the raw text to serde directly. This module
//! locates the first balanced `{...}` span with an explicit depth scanner;
//! braces inside string literals and escaped quotes are ignored. A scanner is
//! used instead of a regex so adversarial input cannot trigger pathological
//! backtracking.

/// Return the first balanced `{...}` span in `text`, if any
///
/// Returns `None` when no opening brace exists or the braces never balance.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
