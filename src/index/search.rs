use serde::Serialize;

use super::Index;
use crate::kb::KnowledgeBase;
use crate::tokenizer::Tokenizer;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Composite `<QuestionID>#<EvidenceKey>` row key.
    pub id: String,
    pub question_id: String,
    pub evidence_id: String,
    pub question: String,
    pub evidence: String,
    pub answers: Vec<String>,
    /// Cosine similarity in (0, 1].
    pub score: f64,
}

/// Rank indexed evidences against `query`.
///
/// Returns at most `top_n` results with strictly positive similarity,
/// highest first; equal scores keep index insertion order. An empty index,
/// a blank query, or a query sharing no terms with the vocabulary all give
/// an empty result.
pub fn search(
    kb: &KnowledgeBase,
    index: &Index,
    tokenizer: &dyn Tokenizer,
    query: &str,
    top_n: usize,
) -> Vec<SearchResult> {
    if index.is_empty() || query.trim().is_empty() || top_n == 0 {
        return Vec::new();
    }

    let tokens = tokenizer.tokenize(query);
    let Some(query_vector) = index.project(&tokens) else {
        return Vec::new();
    };

    // Dense query lookup keeps each row's dot product linear in its length.
    let mut dense = vec![0.0f64; index.vocabulary_size()];
    for &(column, weight) in &query_vector {
        dense[column] = weight;
    }

    let mut scored: Vec<(usize, f64)> = index
        .rows()
        .iter()
        .enumerate()
        .map(|(row, vector)| {
            let dot: f64 = vector.iter().map(|&(column, w)| w * dense[column]).sum();
            (row, dot.min(1.0))
        })
        .filter(|&(_, score)| score > 0.0)
        .collect();

    // Stable sort: ties stay in row order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_n);

    scored
        .into_iter()
        .filter_map(|(row, score)| {
            let id = index.id(row)?;
            let (question, evidence) = kb.resolve(id)?;
            Some(SearchResult {
                id: id.to_string(),
                question_id: question.id.clone(),
                evidence_id: evidence.id.clone(),
                question: question.text.clone(),
                evidence: evidence.text.clone(),
                answers: evidence.answers.clone(),
                score,
            })
        })
        .collect()
}
