//! Knowledge base data model: questions, their evidences, and composite IDs.
use std::collections::HashMap;

use serde::Serialize;

pub mod loader;
pub mod renumber;
pub mod sample;

pub use loader::LoadError;

/// Separator between the question part and the evidence part of an ID.
pub const ID_SEPARATOR: char = '#';

/// Reserved answer value marking evidence that intentionally has no answer.
pub const NO_ANSWER: &str = "no_answer";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    pub id: String,
    pub text: String,
    pub answers: Vec<String>,
}

/// Whether an answer list contains the `no_answer` sentinel.
#[must_use]
pub fn is_no_answer(answers: &[String]) -> bool {
    answers.iter().any(|a| a == NO_ANSWER)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// Evidences in document order.
    pub evidences: Vec<Evidence>,
}

impl Question {
    #[must_use]
    pub fn evidence(&self, evidence_id: &str) -> Option<&Evidence> {
        self.evidences.iter().find(|e| e.id == evidence_id)
    }
}

/// Row key of the index: `<QuestionID>#<EvidenceKey>`.
///
/// Question IDs never contain `#`, so splitting on the first `#` always
/// recovers both parts even when the evidence key contains `#` itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeId(String);

impl CompositeId {
    #[must_use]
    pub fn new(question_id: &str, evidence_id: &str) -> Self {
        Self(format!("{question_id}{ID_SEPARATOR}{evidence_id}"))
    }

    /// Split into `(question_id, evidence_id)` on the first separator.
    #[must_use]
    pub fn split(&self) -> (&str, &str) {
        self.0
            .split_once(ID_SEPARATOR)
            .unwrap_or((self.0.as_str(), ""))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompositeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only corpus statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Number of top-level question entries.
    pub questions: usize,
    /// Evidence entries summed across all questions.
    pub evidences: usize,
    /// Rows in the index (evidences with non-empty text).
    pub indexed: usize,
}

/// The full corpus, in document order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    questions: Vec<Question>,
    by_id: HashMap<String, usize>,
}

impl KnowledgeBase {
    /// Build from questions in order. A repeated ID keeps the last entry.
    pub fn from_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let mut kb = Self::default();
        for q in questions {
            if let Some(&idx) = kb.by_id.get(&q.id) {
                kb.questions[idx] = q;
            } else {
                kb.by_id.insert(q.id.clone(), kb.questions.len());
                kb.questions.push(q);
            }
        }
        kb
    }

    #[must_use]
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.by_id.get(id).map(|&idx| &self.questions[idx])
    }

    /// Resolve a composite ID back to its owning question and evidence.
    #[must_use]
    pub fn resolve(&self, id: &CompositeId) -> Option<(&Question, &Evidence)> {
        let (question_id, evidence_id) = id.split();
        let question = self.question(question_id)?;
        let evidence = question.evidence(evidence_id)?;
        Some((question, evidence))
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn evidence_count(&self) -> usize {
        self.questions.iter().map(|q| q.evidences.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence(id: &str, text: &str, answers: &[&str]) -> Evidence {
        Evidence {
            id: id.to_string(),
            text: text.to_string(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_composite_id_splits_on_first_separator() {
        let id = CompositeId::new("Q_DAY_001", "Q_DAY_001#00");
        assert_eq!(id.as_str(), "Q_DAY_001#Q_DAY_001#00");
        assert_eq!(id.split(), ("Q_DAY_001", "Q_DAY_001#00"));
    }

    #[test]
    fn test_composite_id_plain_suffix() {
        let id = CompositeId::new("Q1", "00");
        assert_eq!(id.split(), ("Q1", "00"));
    }

    #[test]
    fn test_resolve() {
        let kb = KnowledgeBase::from_questions([Question {
            id: "Q1".to_string(),
            text: "question one".to_string(),
            evidences: vec![evidence("Q1#00", "text", &["a"])],
        }]);

        let (q, e) = kb.resolve(&CompositeId::new("Q1", "Q1#00")).unwrap();
        assert_eq!(q.text, "question one");
        assert_eq!(e.answers, vec!["a"]);

        assert!(kb.resolve(&CompositeId::new("Q2", "Q1#00")).is_none());
        assert!(kb.resolve(&CompositeId::new("Q1", "Q1#01")).is_none());
    }

    #[test]
    fn test_duplicate_question_keeps_last_in_place() {
        let kb = KnowledgeBase::from_questions([
            Question {
                id: "A".to_string(),
                text: "first".to_string(),
                evidences: vec![],
            },
            Question {
                id: "B".to_string(),
                text: "b".to_string(),
                evidences: vec![],
            },
            Question {
                id: "A".to_string(),
                text: "second".to_string(),
                evidences: vec![],
            },
        ]);
        assert_eq!(kb.question_count(), 2);
        assert_eq!(kb.question("A").unwrap().text, "second");
        let order: Vec<&str> = kb.questions().map(|q| q.id.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn test_counts_and_sentinel() {
        let kb = KnowledgeBase::from_questions([Question {
            id: "Q1".to_string(),
            text: "q".to_string(),
            evidences: vec![
                evidence("Q1#00", "x", &[NO_ANSWER]),
                evidence("Q1#01", "", &[]),
            ],
        }]);
        assert_eq!(kb.question_count(), 1);
        assert_eq!(kb.evidence_count(), 2);
        assert!(is_no_answer(&kb.question("Q1").unwrap().evidences[0].answers));
        assert!(!is_no_answer(&kb.question("Q1").unwrap().evidences[1].answers));
    }
}
