//! Answer synthesis from ranked search results.
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::index::search::SearchResult;
use crate::kb::is_no_answer;

/// Returned when retrieval finds nothing.
pub const NOT_FOUND_MESSAGE: &str = "抱歉，没有找到相关信息。";

/// Returned when the best match is marked `no_answer`.
pub const NO_ANSWER_MESSAGE: &str = "抱歉，没有找到相关答案。";

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));

/// Provenance for an answer: the matched question and evidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    pub question: String,
    pub evidence: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub answer: String,
    pub references: Vec<Reference>,
}

impl Answer {
    /// Whether retrieval produced a match at all.
    #[must_use]
    pub fn is_found(&self) -> bool {
        !self.references.is_empty()
    }
}

/// Turn ranked results into an answer. Only the top result is consulted.
pub fn synthesize(results: &[SearchResult]) -> Answer {
    let Some(best) = results.first() else {
        return Answer {
            answer: NOT_FOUND_MESSAGE.to_string(),
            references: Vec::new(),
        };
    };

    let answer = if is_no_answer(&best.answers) {
        NO_ANSWER_MESSAGE.to_string()
    } else if let Some(first) = best.answers.first() {
        first.clone()
    } else {
        first_paragraph(&best.evidence).to_string()
    };

    Answer {
        answer,
        references: vec![Reference {
            question: best.question.clone(),
            evidence: best.evidence.clone(),
            score: best.score,
        }],
    }
}

/// First non-blank paragraph of `text`; the trimmed text when it has no
/// blank-line boundary.
pub fn first_paragraph(text: &str) -> &str {
    let trimmed = text.trim();
    PARAGRAPH_BREAK
        .split(trimmed)
        .find(|p| !p.trim().is_empty())
        .unwrap_or(trimmed)
}
