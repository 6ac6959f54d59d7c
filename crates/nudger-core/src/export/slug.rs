//! Filename-safe slugs

/// Maximum slug length in characters
pub const MAX_SLUG_LEN: usize = 60;

/// Fallback for inputs with no usable characters
pub const EMPTY_SLUG: &str = "untitled";

/// Turn arbitrary text into a lowercase `[a-z0-9-]` token.
///
/// Runs of any other characters collapse into a single hyphen, hyphens never
/// lead or trail, and the result is at most [`MAX_SLUG_LEN`] characters.
/// Absent or empty input, or input with no ASCII alphanumerics, yields
/// [`EMPTY_SLUG`].
pub fn slug<'a>(input: impl Into<Option<&'a str>>) -> String {
    let lowered = input.into().unwrap_or_default().to_lowercase();

    let mut out = String::with_capacity(lowered.len().min(MAX_SLUG_LEN));
    let mut pending_dash = false;
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            out.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
        if out.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    // ASCII only, so byte truncation is char truncation
    out.truncate(MAX_SLUG_LEN);
    let trimmed = out.trim_end_matches('-');

    if trimmed.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}
