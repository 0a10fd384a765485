//! TF-IDF vector index over evidence texts.
//!
//! Every build is a full rebuild from a [`KnowledgeBase`] snapshot. Rows are
//! L2-normalized sparse vectors, so cosine similarity against a projected
//! query is a plain dot product.
use std::collections::HashMap;

use tracing::debug;

use crate::kb::{CompositeId, KnowledgeBase};
use crate::tokenizer::Tokenizer;

pub mod search;

/// `(column, weight)` pairs sorted by column.
pub type SparseVector = Vec<(usize, f64)>;

/// Term-weighted vector space built from a knowledge base.
///
/// The empty index (zero rows) is the only "nothing indexed" state; a
/// default-constructed index and one built from an empty corpus are equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    ids: Vec<CompositeId>,
    rows: Vec<SparseVector>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl Index {
    /// Build the index for every evidence with non-empty text.
    pub fn build(kb: &KnowledgeBase, tokenizer: &dyn Tokenizer) -> Self {
        let mut ids = Vec::new();
        let mut term_counts: Vec<HashMap<usize, usize>> = Vec::new();
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut df: Vec<usize> = Vec::new();

        for question in kb.questions() {
            for evidence in &question.evidences {
                if evidence.text.is_empty() {
                    continue;
                }

                let mut counts: HashMap<usize, usize> = HashMap::new();
                for token in tokenizer.tokenize(&evidence.text) {
                    let next = vocabulary.len();
                    let column = *vocabulary.entry(token).or_insert(next);
                    if column == df.len() {
                        df.push(0);
                    }
                    *counts.entry(column).or_insert(0) += 1;
                }
                for &column in counts.keys() {
                    df[column] += 1;
                }

                ids.push(CompositeId::new(&question.id, &evidence.id));
                term_counts.push(counts);
            }
        }

        if ids.is_empty() {
            return Self::default();
        }

        let n_docs = ids.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n_docs) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let rows = term_counts
            .into_iter()
            .map(|counts| {
                let mut row: SparseVector = counts
                    .into_iter()
                    .map(|(column, tf)| (column, tf as f64 * idf[column]))
                    .collect();
                row.sort_unstable_by_key(|&(column, _)| column);
                l2_normalize(&mut row);
                row
            })
            .collect();

        debug!(
            "Built index: {} rows, {} terms, tokenizer={}",
            ids.len(),
            vocabulary.len(),
            tokenizer.name()
        );

        Self {
            ids,
            rows,
            vocabulary,
            idf,
        }
    }

    /// Project already-tokenized text into the frozen vocabulary.
    ///
    /// Unknown terms are ignored. Returns `None` when nothing in `tokens`
    /// is part of the vocabulary.
    pub fn project<S: AsRef<str>>(&self, tokens: &[S]) -> Option<SparseVector> {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for token in tokens {
            if let Some(&column) = self.vocabulary.get(token.as_ref()) {
                *counts.entry(column).or_insert(0) += 1;
            }
        }
        if counts.is_empty() {
            return None;
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(column, tf)| (column, tf as f64 * self.idf[column]))
            .collect();
        vector.sort_unstable_by_key(|&(column, _)| column);
        l2_normalize(&mut vector);
        Some(vector)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[must_use]
    pub fn id(&self, row: usize) -> Option<&CompositeId> {
        self.ids.get(row)
    }

    pub(crate) fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Smoothed inverse document frequency of `term`, if indexed.
    #[must_use]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&column| self.idf[column])
    }
}

fn l2_normalize(vector: &mut SparseVector) {
    let norm_sq: f64 = vector.iter().map(|(_, w)| w * w).sum();
    if norm_sq > 0.0 {
        let inv = 1.0 / norm_sq.sqrt();
        for (_, w) in vector.iter_mut() {
            *w *= inv;
        }
    }
}
