//! Logging utilities for keeping player-supplied strings (display names,
//! item ids) single-line and bounded when they appear in log output.

/// Flatten a string for single-line logging: whitespace control characters
/// become plain spaces, other control characters become `?`, and anything
/// past the preview cap is dropped behind an ellipsis.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 120;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW));
    let mut truncated = false;
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            truncated = true;
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => out.push(' '),
            c if c.is_control() => out.push('?'),
            c => out.push(c),
        }
    }
    if truncated {
        out.push('…');
    }
    out
}
