/// Tokenizer trait and shared token normalization.
///
/// The same tokenizer instance must be used to build an index and to query
/// it, otherwise query terms will not line up with the vocabulary.
pub mod jieba;
pub mod mock;

use thiserror::Error;

/// Errors that can occur while setting up a tokenizer.
#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("dictionary not found: {0}")]
    DictionaryNotFound(String),

    #[error("dictionary load failed: {0}")]
    DictionaryLoadFailed(String),
}

/// Trait for text segmentation implementations.
///
/// All implementations must be `Send + Sync` to allow shared use
/// behind `Arc`.
pub trait Tokenizer: Send + Sync {
    /// Segment `text` into an ordered sequence of normalized tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}

/// Normalize a raw segment: lowercase it, and drop it entirely when it
/// carries no lexical content (whitespace or punctuation only).
pub fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed
        .chars()
        .all(|c| c.is_whitespace() || is_punctuation(c))
    {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Normalize a sequence of raw segments into tokens.
///
/// Punctuation-only segments are dropped, except when nothing else is
/// left: text made only of punctuation keeps those segments (trimmed and
/// lowercased) so it can still be indexed and matched by the same text.
pub fn normalize_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut fallback = Vec::new();

    for raw in segments {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        match normalize_token(trimmed) {
            Some(token) => tokens.push(token),
            None if tokens.is_empty() => fallback.push(trimmed.to_lowercase()),
            None => {}
        }
    }

    if tokens.is_empty() { fallback } else { tokens }
}

/// ASCII punctuation plus the CJK and full-width punctuation blocks.
pub fn is_punctuation(c: char) -> bool {
    if c.is_ascii_punctuation() {
        return true;
    }
    let u = c as u32;
    // CJK Symbols and Punctuation
    (0x3000..=0x303F).contains(&u)
        // Halfwidth and Fullwidth Forms (punctuation subset)
        || (0xFF01..=0xFF0F).contains(&u)
        || (0xFF1A..=0xFF20).contains(&u)
        || (0xFF3B..=0xFF40).contains(&u)
        || (0xFF5B..=0xFF65).contains(&u)
        // General Punctuation (…, “”, ‘’, —)
        || (0x2000..=0x206F).contains(&u)
}

/// Basic Han ideograph check.
pub fn is_han(c: char) -> bool {
    let u = c as u32;
    (0x4E00..=0x9FFF).contains(&u) || (0x3400..=0x4DBF).contains(&u)
}
