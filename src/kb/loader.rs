//! Knowledge file parsing and validation.
//!
//! The on-disk document is a JSON object keyed by question ID:
//!
//! ```json
//! { "Q_DAY_001": { "question": "...",
//!                  "evidences": { "Q_DAY_001#00": { "answer": ["..."], "evidence": "..." } } } }
//! ```
//!
//! Shapes are checked here so retrieval never sees a malformed record.
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use super::{Evidence, ID_SEPARATOR, KnowledgeBase, Question};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("knowledge source not found: {0}")]
    SourceNotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid knowledge base at {path}: {reason}")]
    Invalid { path: String, reason: String },
}

/// Where a knowledge base comes from.
#[derive(Debug, Clone)]
pub enum KnowledgeSource {
    /// A JSON document on disk.
    File(PathBuf),
    /// An already-parsed JSON document.
    Value(Value),
}

impl From<&Path> for KnowledgeSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<PathBuf> for KnowledgeSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<Value> for KnowledgeSource {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Parse and validate a knowledge base from any source.
pub fn load(source: &KnowledgeSource) -> Result<KnowledgeBase, LoadError> {
    match source {
        KnowledgeSource::File(path) => from_value(&read_document(path)?),
        KnowledgeSource::Value(value) => from_value(value),
    }
}

/// Read a JSON document from disk without shape validation.
pub fn read_document(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::SourceNotFound(path.display().to_string()));
    }
    let data = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&data)?)
}

/// Validate a parsed document and convert it into the typed model.
pub fn from_value(value: &Value) -> Result<KnowledgeBase, LoadError> {
    let root = as_object(value, "$")?;

    let mut questions = Vec::with_capacity(root.len());
    for (question_id, question_value) in root {
        let path = format!("$.{question_id}");
        if question_id.contains(ID_SEPARATOR) {
            return Err(invalid(&path, "question ID must not contain '#'"));
        }
        questions.push(parse_question(question_id, question_value, &path)?);
    }

    Ok(KnowledgeBase::from_questions(questions))
}

fn parse_question(id: &str, value: &Value, path: &str) -> Result<Question, LoadError> {
    let obj = as_object(value, path)?;

    let text = match obj.get("question") {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(invalid(&format!("{path}.question"), "expected a string")),
        None => return Err(invalid(path, "missing \"question\" field")),
    };

    let evidences_path = format!("{path}.evidences");
    let evidences_obj = match obj.get("evidences") {
        Some(v) => as_object(v, &evidences_path)?,
        None => return Err(invalid(path, "missing \"evidences\" field")),
    };

    let mut evidences = Vec::with_capacity(evidences_obj.len());
    for (evidence_id, evidence_value) in evidences_obj {
        let evidence_path = format!("{evidences_path}.{evidence_id}");
        evidences.push(parse_evidence(evidence_id, evidence_value, &evidence_path)?);
    }

    Ok(Question {
        id: id.to_string(),
        text,
        evidences,
    })
}

fn parse_evidence(id: &str, value: &Value, path: &str) -> Result<Evidence, LoadError> {
    let obj = as_object(value, path)?;

    let text = match obj.get("evidence") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(_) => return Err(invalid(&format!("{path}.evidence"), "expected a string")),
    };

    let answers = match obj.get("answer") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(invalid(&format!("{path}.answer[{i}]"), "expected a string")),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(Value::Null) | None => Vec::new(),
        Some(_) => return Err(invalid(&format!("{path}.answer"), "expected a list of strings")),
    };

    Ok(Evidence {
        id: id.to_string(),
        text,
        answers,
    })
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, LoadError> {
    value
        .as_object()
        .ok_or_else(|| invalid(path, "expected an object"))
}

fn invalid(path: &str, reason: &str) -> LoadError {
    LoadError::Invalid {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_document() {
        let doc: Value = serde_json::from_str(
            r#"{
                "Q2": {"question": "second", "evidences": {
                    "Q2#00": {"answer": ["x"], "evidence": "ev"},
                    "Q2#01": {"answer": [], "evidence": ""}
                }},
                "Q1": {"question": "first", "evidences": {}}
            }"#,
        )
        .unwrap();
        let kb = from_value(&doc).unwrap();

        assert_eq!(kb.question_count(), 2);
        assert_eq!(kb.evidence_count(), 2);

        // Document order is kept, not sorted.
        let order: Vec<&str> = kb.questions().map(|q| q.id.as_str()).collect();
        assert_eq!(order, vec!["Q2", "Q1"]);

        let q2 = kb.question("Q2").unwrap();
        assert_eq!(q2.evidences[0].answers, vec!["x"]);
        assert_eq!(q2.evidences[1].text, "");
    }

    #[test]
    fn test_missing_answer_and_evidence_default_to_empty() {
        let kb = from_value(&json!({
            "Q1": {"question": "q", "evidences": {"Q1#00": {}}}
        }))
        .unwrap();
        let e = &kb.question("Q1").unwrap().evidences[0];
        assert!(e.answers.is_empty());
        assert!(e.text.is_empty());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let kb = from_value(&json!({
            "Q1": {"question": "q", "category": "misc",
                   "evidences": {"Q1#00": {"evidence": "e", "source": "book"}}}
        }))
        .unwrap();
        assert_eq!(kb.evidence_count(), 1);
    }

    #[test]
    fn test_top_level_must_be_object() {
        let err = from_value(&json!(["Q1"])).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { ref path, .. } if path == "$"));
    }

    #[test]
    fn test_missing_question_field() {
        let err = from_value(&json!({"Q1": {"evidences": {}}})).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { ref path, .. } if path == "$.Q1"));
    }

    #[test]
    fn test_missing_evidences_field() {
        let err = from_value(&json!({"Q1": {"question": "q"}})).unwrap_err();
        assert!(err.to_string().contains("evidences"));
    }

    #[test]
    fn test_evidences_must_be_object() {
        let err = from_value(&json!({"Q1": {"question": "q", "evidences": []}})).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { ref path, .. } if path == "$.Q1.evidences"));
    }

    #[test]
    fn test_answer_entries_must_be_strings() {
        let err = from_value(&json!({
            "Q1": {"question": "q", "evidences": {"Q1#00": {"answer": ["ok", 3], "evidence": "e"}}}
        }))
        .unwrap_err();
        assert!(
            matches!(err, LoadError::Invalid { ref path, .. } if path == "$.Q1.evidences.Q1#00.answer[1]")
        );
    }

    #[test]
    fn test_question_id_with_separator_rejected() {
        let err = from_value(&json!({"Q#1": {"question": "q", "evidences": {}}})).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load(&KnowledgeSource::from(path.as_path())).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load(&KnowledgeSource::File(PathBuf::from("/nonexistent/kb.json"))).unwrap_err();
        assert!(matches!(err, LoadError::SourceNotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(
            &path,
            r#"{"Q1": {"question": "q", "evidences": {"Q1#00": {"answer": ["a"], "evidence": "e"}}}}"#,
        )
        .unwrap();

        let kb = load(&KnowledgeSource::from(path.as_path())).unwrap();
        assert_eq!(kb.question_count(), 1);
    }
}
