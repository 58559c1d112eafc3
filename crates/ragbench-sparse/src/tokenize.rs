//! The shared tokenization rule for sparse scoring.
//!
//! Lowercase, split on any run of characters outside `[a-z0-9]`, drop empty
//! tokens. Applied identically to indexed chunks and to queries; changing it
//! changes scoring semantics, so keep both sides in sync.

/// Tokenize `text` for BM25 scoring.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_lowercase() && !c.is_ascii_digit())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
