/// Dictionary-based word segmentation on top of the `jieba-rs` crate.
///
/// Uses the bundled jieba dictionary, optionally extended with a user
/// dictionary file in the usual `word [freq] [tag]` line format.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use jieba_rs::Jieba;
use tracing::info;

use super::{Tokenizer, TokenizerError, normalize_segments};

/// Wrapper around [`Jieba`] producing normalized word tokens.
pub struct JiebaTokenizer {
    inner: Jieba,
    hmm: bool,
}

impl JiebaTokenizer {
    /// Create a tokenizer with the bundled dictionary and HMM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Jieba::new(),
            hmm: true,
        }
    }

    /// Toggle HMM discovery of words missing from the dictionary.
    #[must_use]
    pub fn with_hmm(mut self, hmm: bool) -> Self {
        self.hmm = hmm;
        self
    }

    /// Extend the dictionary with entries from a user dictionary file.
    pub fn with_user_dict(mut self, path: &Path) -> Result<Self, TokenizerError> {
        if !path.exists() {
            return Err(TokenizerError::DictionaryNotFound(
                path.display().to_string(),
            ));
        }

        let file = File::open(path)
            .map_err(|e| TokenizerError::DictionaryLoadFailed(format!("{}: {e}", path.display())))?;
        let mut reader = BufReader::new(file);
        self.inner
            .load_dict(&mut reader)
            .map_err(|e| TokenizerError::DictionaryLoadFailed(format!("{}: {e}", path.display())))?;

        info!("Loaded user dictionary: {}", path.display());
        Ok(self)
    }
}

impl Default for JiebaTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for JiebaTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        normalize_segments(self.inner.cut(text, self.hmm))
    }

    fn name(&self) -> &str {
        "jieba"
    }
}
