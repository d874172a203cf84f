//! Shared token normalization: lowercase, strip non-alphanumerics, drop
//! empties. A pure function of its input, applied identically to all three
//! corpora. Spanish deliberately gets no language-specific rules; the models
//! only stay comparable if every corpus goes through the same policy.

/// Split one line into normalized tokens.
pub fn tokenize_line(line: &str) -> Vec<String> {
    line.split_whitespace().filter_map(normalize_token).collect()
}

fn normalize_token(raw: &str) -> Option<String> {
    let token: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
