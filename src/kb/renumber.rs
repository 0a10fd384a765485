//! Question ID renumbering for knowledge files.
//!
//! Renames one question and rewrites the `<old>#` prefix of its evidence
//! keys. Works on raw JSON documents so fields this crate does not model
//! survive the rewrite untouched.
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use super::ID_SEPARATOR;
use super::loader::{LoadError, read_document};

/// Prefix used when generating a fresh question ID.
pub const DEFAULT_ID_PREFIX: &str = "Q_HEALTH_";

#[derive(Error, Debug)]
pub enum RenumberError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("question ID not found: {0}")]
    UnknownId(String),

    #[error("question ID already exists: {0}")]
    IdCollision(String),

    #[error("invalid question ID {0:?}: must be non-empty and must not contain '#'")]
    InvalidId(String),

    #[error("no ID left after the highest existing number for prefix {0:?}")]
    IdSpaceExhausted(String),

    #[error("expected a JSON object at the top level")]
    NotAnObject,

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Next free ID of the form `<prefix><n:03>`, one past the highest number
/// already used with that prefix.
///
/// Numbers too large for a `u64` are ignored; an existing `u64::MAX` leaves
/// no successor and is an error.
pub fn generate_new_id<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    prefix: &str,
) -> Result<String, RenumberError> {
    let max = existing
        .into_iter()
        .filter_map(|id| {
            let rest = id.strip_prefix(prefix)?;
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u64>().ok()
        })
        .max();

    let next = match max {
        None => 1,
        Some(n) => n
            .checked_add(1)
            .ok_or_else(|| RenumberError::IdSpaceExhausted(prefix.to_string()))?,
    };
    Ok(format!("{prefix}{next:03}"))
}

/// Rename `old_id` in `doc`, returning the rewritten document and the ID used.
///
/// When `new_id` is `None` an ID is generated with `prefix`. The renamed
/// question moves to the end of the document; everything else keeps its order.
pub fn renumber(
    doc: &Value,
    old_id: &str,
    new_id: Option<&str>,
    prefix: &str,
) -> Result<(Value, String), RenumberError> {
    let root = doc.as_object().ok_or(RenumberError::NotAnObject)?;

    if !root.contains_key(old_id) {
        return Err(RenumberError::UnknownId(old_id.to_string()));
    }

    let new_id = match new_id {
        Some(id) => id.to_string(),
        None => {
            let id = generate_new_id(root.keys().map(String::as_str), prefix)?;
            info!("Generated new ID: {id}");
            id
        }
    };

    if new_id.is_empty() || new_id.contains(ID_SEPARATOR) {
        return Err(RenumberError::InvalidId(new_id));
    }
    if root.contains_key(&new_id) {
        return Err(RenumberError::IdCollision(new_id));
    }

    let mut out = Map::with_capacity(root.len());
    let mut moved = None;
    for (key, value) in root {
        if key == old_id {
            moved = Some(rename_evidence_keys(value, old_id, &new_id));
        } else {
            out.insert(key.clone(), value.clone());
        }
    }
    if let Some(question) = moved {
        out.insert(new_id.clone(), question);
    }

    Ok((Value::Object(out), new_id))
}

/// Read `input`, rename `old_id`, and write the result to `output`.
pub fn renumber_file(
    input: &Path,
    output: &Path,
    old_id: &str,
    new_id: Option<&str>,
    prefix: &str,
) -> Result<String, RenumberError> {
    let doc = read_document(input)?;
    let (renamed, new_id) = renumber(&doc, old_id, new_id, prefix)?;

    let data = serde_json::to_string_pretty(&renamed).map_err(LoadError::Parse)?;
    std::fs::write(output, data).map_err(|source| RenumberError::Write {
        path: output.display().to_string(),
        source,
    })?;

    info!("Renamed question {old_id} to {new_id} in {}", output.display());
    Ok(new_id)
}

fn rename_evidence_keys(question: &Value, old_id: &str, new_id: &str) -> Value {
    let mut question = question.clone();
    let old_prefix = format!("{old_id}{ID_SEPARATOR}");

    if let Some(Value::Object(evidences)) = question.get_mut("evidences") {
        let renamed: Map<String, Value> = std::mem::take(evidences)
            .into_iter()
            .map(|(key, value)| match key.strip_prefix(&old_prefix) {
                Some(suffix) => (format!("{new_id}{ID_SEPARATOR}{suffix}"), value),
                None => (key, value),
            })
            .collect();
        *evidences = renamed;
    }

    question
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "Q_HEALTH_001": {"question": "a", "evidences": {
                "Q_HEALTH_001#00": {"answer": ["x"], "evidence": "ex"},
                "Q_HEALTH_001#01": {"answer": [], "evidence": "ey"}
            }},
            "Q_HEALTH_007": {"question": "b", "evidences": {}},
            "OTHER_3": {"question": "c", "evidences": {}}
        })
    }

    #[test]
    fn test_generate_new_id() {
        assert_eq!(
            generate_new_id(["Q_HEALTH_001", "Q_HEALTH_042x", "OTHER_99"], "Q_HEALTH_").unwrap(),
            "Q_HEALTH_043"
        );
        assert_eq!(generate_new_id(["OTHER_1"], "Q_HEALTH_").unwrap(), "Q_HEALTH_001");
        assert_eq!(generate_new_id(std::iter::empty(), "Q_").unwrap(), "Q_001");
        assert_eq!(generate_new_id(["Q_1234"], "Q_").unwrap(), "Q_1235");
    }

    #[test]
    fn test_generate_new_id_at_numeric_limit() {
        let result = generate_new_id(["Q_18446744073709551615"], "Q_");
        assert!(matches!(result, Err(RenumberError::IdSpaceExhausted(p)) if p == "Q_"));

        // Numbers beyond u64 are skipped rather than wrapped.
        assert_eq!(
            generate_new_id(["Q_99999999999999999999999", "Q_007"], "Q_").unwrap(),
            "Q_008"
        );
    }

    #[test]
    fn test_renumber_reports_exhausted_id_space() {
        let doc = json!({"Q_18446744073709551615": {"question": "q", "evidences": {}}});
        let err = renumber(&doc, "Q_18446744073709551615", None, "Q_").unwrap_err();
        assert!(matches!(err, RenumberError::IdSpaceExhausted(_)));
    }

    #[test]
    fn test_renumber_explicit_id() {
        let (out, id) = renumber(&doc(), "Q_HEALTH_001", Some("Q_NEW_1"), DEFAULT_ID_PREFIX).unwrap();
        assert_eq!(id, "Q_NEW_1");

        let root = out.as_object().unwrap();
        assert!(!root.contains_key("Q_HEALTH_001"));

        let keys: Vec<&String> = root.keys().collect();
        assert_eq!(keys, vec!["Q_HEALTH_007", "OTHER_3", "Q_NEW_1"]);

        let evidences = root["Q_NEW_1"]["evidences"].as_object().unwrap();
        let ev_keys: Vec<&String> = evidences.keys().collect();
        assert_eq!(ev_keys, vec!["Q_NEW_1#00", "Q_NEW_1#01"]);
        assert_eq!(evidences["Q_NEW_1#00"]["answer"], json!(["x"]));
    }

    #[test]
    fn test_renumber_generated_id() {
        let (out, id) = renumber(&doc(), "OTHER_3", None, DEFAULT_ID_PREFIX).unwrap();
        assert_eq!(id, "Q_HEALTH_008");
        assert!(out.get("Q_HEALTH_008").is_some());
    }

    #[test]
    fn test_renumber_unknown_id() {
        let err = renumber(&doc(), "MISSING", Some("X"), DEFAULT_ID_PREFIX).unwrap_err();
        assert!(matches!(err, RenumberError::UnknownId(id) if id == "MISSING"));
    }

    #[test]
    fn test_renumber_collision() {
        let err = renumber(&doc(), "Q_HEALTH_001", Some("OTHER_3"), DEFAULT_ID_PREFIX).unwrap_err();
        assert!(matches!(err, RenumberError::IdCollision(id) if id == "OTHER_3"));
    }

    #[test]
    fn test_renumber_rejects_separator_in_new_id() {
        let err = renumber(&doc(), "Q_HEALTH_001", Some("A#B"), DEFAULT_ID_PREFIX).unwrap_err();
        assert!(matches!(err, RenumberError::InvalidId(_)));
    }

    #[test]
    fn test_renumber_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("kb.json");
        let output = dir.path().join("kb_new.json");
        std::fs::write(&input, serde_json::to_string(&doc()).unwrap()).unwrap();

        let id = renumber_file(&input, &output, "Q_HEALTH_007", None, DEFAULT_ID_PREFIX).unwrap();
        assert_eq!(id, "Q_HEALTH_008");

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("\"Q_HEALTH_008\""));
        // Input is left untouched.
        let original = std::fs::read_to_string(&input).unwrap();
        assert!(original.contains("\"Q_HEALTH_007\""));
    }

    #[test]
    fn test_renumber_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = renumber_file(
            &dir.path().join("missing.json"),
            &dir.path().join("out.json"),
            "Q1",
            None,
            DEFAULT_ID_PREFIX,
        )
        .unwrap_err();
        assert!(matches!(err, RenumberError::Load(LoadError::SourceNotFound(_))));
    }
}
