//! Character-based token estimation and text splitting.

/// Estimate token count as ceil(chars / 4).
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Split `text` into contiguous slices that each fit under `limit`
/// estimated tokens.
///
/// A text within the limit comes back whole. Otherwise the text is cut
/// into ceil(estimate / limit) slices of ceil(chars / slices) characters
/// each. Splitting is purely character-based and may cut mid-word; the
/// concatenation of the slices always reproduces the input exactly.
#[must_use]
pub fn split_by_token_limit(text: &str, limit: usize) -> Vec<String> {
    let estimated = estimate_tokens(text);
    if limit == 0 || estimated <= limit {
        return vec![text.to_string()];
    }

    let char_count = text.chars().count();
    let slices = estimated.div_ceil(limit);
    let slice_len = char_count.div_ceil(slices);

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(slice_len)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
