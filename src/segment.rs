//! Fixed-size text segmentation.
//!
//! Downstream consumers accept text in bounded chunks, so the extracted
//! blob is cut into consecutive character windows before delivery.

use crate::error::PipelineError;

/// Default window size in characters.
pub const DEFAULT_SEGMENT_CHARS: usize = 8000;

/// Split `text` into consecutive non-overlapping windows of at most
/// `max_chars` characters, preserving order. CRLF line endings are
/// normalized to LF first; concatenating the result reconstructs the
/// normalized input exactly. The final window may be shorter.
///
/// Pure and deterministic; an empty input yields no segments.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfiguration`] when `max_chars` is zero.
pub fn segment(text: &str, max_chars: usize) -> Result<Vec<String>, PipelineError> {
    if max_chars == 0 {
        return Err(PipelineError::InvalidConfiguration(
            "segment length must be positive",
        ));
    }

    let normalized = text.replace("\r\n", "\n");

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;
    for ch in normalized.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            segments.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    Ok(segments)
}
