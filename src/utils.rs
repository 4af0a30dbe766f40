use crate::constants::PREVIEW_ELLIPSIS;

/// Keeps the first `max_chars` characters of `text`, appending an ellipsis when anything
/// was cut. Counts Unicode scalar values, so multi-byte text is never split mid-character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], PREVIEW_ELLIPSIS),
        None => text.to_string(),
    }
}
