/// Mock tokenizer for testing purposes.
///
/// Needs no dictionary: Latin text splits on whitespace and punctuation,
/// and every Han character becomes a token of its own.
use super::{Tokenizer, is_han, normalize_segments};

/// A deterministic tokenizer that works without any segmentation dictionary.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockTokenizer;

impl MockTokenizer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for MockTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut segments: Vec<String> = Vec::new();
        let mut current = String::new();

        for c in text.chars() {
            if (c.is_alphanumeric() && !is_han(c)) || c == '_' {
                current.push(c);
                continue;
            }
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            if !c.is_whitespace() {
                segments.push(c.to_string());
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        normalize_segments(segments.iter().map(String::as_str))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_latin_words() {
        let t = MockTokenizer::new();
        assert_eq!(
            t.tokenize("Hello, World! snake_case"),
            vec!["hello", "world", "snake_case"]
        );
    }

    #[test]
    fn test_mock_han_characters() {
        let t = MockTokenizer::new();
        assert_eq!(t.tokenize("一天24小时。"), vec!["一", "天", "24", "小", "时"]);
    }

    #[test]
    fn test_mock_deterministic() {
        let t = MockTokenizer::new();
        let a = t.tokenize("水的沸点 boiling point");
        let b = t.tokenize("水的沸点 boiling point");
        assert_eq!(a, b, "same input should produce same output");
    }

    #[test]
    fn test_mock_empty_and_whitespace() {
        let t = MockTokenizer::new();
        assert!(t.tokenize("").is_empty());
        assert!(t.tokenize("  \n\t ").is_empty());
    }

    #[test]
    fn test_mock_punctuation_only_text() {
        let t = MockTokenizer::new();
        assert_eq!(t.tokenize("，。！"), vec!["，", "。", "！"]);
        assert_eq!(t.tokenize("Hi!"), vec!["hi"]);
    }
}
