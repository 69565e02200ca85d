use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::QuizError;

/// A single captured answer. Multi-select questions keep their picks in the
/// order they were checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multi(Vec<String>),
}

impl AnswerValue {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            AnswerValue::Single(v) => v == value,
            AnswerValue::Multi(values) => values.iter().any(|v| v == value),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Single(v) => v.trim().is_empty(),
            AnswerValue::Multi(values) => values.is_empty(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            AnswerValue::Single(v) => Value::String(v.clone()),
            AnswerValue::Multi(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, AnswerValue>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    /// The answer as plain text; multi-select answers are not text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(AnswerValue::Single(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn is_selected(&self, key: &str, value: &str) -> bool {
        self.0.get(key).map_or(false, |answer| answer.contains(value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Writes a single value. Keys that already hold a multi-select set are
    /// only changed through [`AnswerMap::toggle`].
    pub fn set_single(&mut self, key: &str, value: &str) -> Result<(), QuizError> {
        if let Some(AnswerValue::Multi(_)) = self.0.get(key) {
            return Err(QuizError::MultiValueOverwrite(key.to_string()));
        }
        self.0
            .insert(key.to_string(), AnswerValue::Single(value.to_string()));
        Ok(())
    }

    /// Adds or removes `value` from the set stored under `key`.
    pub fn toggle(&mut self, key: &str, value: &str, present: bool) {
        let entry = self
            .0
            .entry(key.to_string())
            .or_insert_with(|| AnswerValue::Multi(Vec::new()));

        if let AnswerValue::Single(previous) = entry {
            // Older records may carry a lone string for a checkbox group.
            let previous = std::mem::take(previous);
            *entry = AnswerValue::Multi(if previous.is_empty() {
                Vec::new()
            } else {
                vec![previous]
            });
        }

        if let AnswerValue::Multi(values) = entry {
            if present {
                if !values.iter().any(|v| v == value) {
                    values.push(value.to_string());
                }
            } else {
                values.retain(|v| v != value);
            }
        }
    }

    /// Flat JSON object of all answers with `email` layered on top.
    pub fn submission_payload(&self, email: &str) -> Map<String, Value> {
        let mut payload: Map<String, Value> = self
            .0
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        payload.insert("email".to_string(), Value::String(email.to_string()));
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_previous_set() {
        let mut answers = AnswerMap::new();
        answers.toggle("dental", "tartar", true);
        let before = answers.clone();

        answers.toggle("dental", "bad_breath", true);
        answers.toggle("dental", "bad_breath", false);

        assert_eq!(answers, before);
    }

    #[test]
    fn toggle_keeps_check_order_and_ignores_duplicates() {
        let mut answers = AnswerMap::new();
        answers.toggle("health", "joints", true);
        answers.toggle("health", "skin", true);
        answers.toggle("health", "joints", true);

        assert_eq!(
            answers.get("health"),
            Some(&AnswerValue::Multi(vec!["joints".into(), "skin".into()]))
        );
    }

    #[test]
    fn multi_value_keys_refuse_wholesale_overwrite() {
        let mut answers = AnswerMap::new();
        answers.toggle("health", "skin", true);

        let err = answers.set_single("health", "none").unwrap_err();
        assert_eq!(err, QuizError::MultiValueOverwrite("health".into()));
        assert!(answers.is_selected("health", "skin"));
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut answers = AnswerMap::new();
        answers.set_single("dogName", "Rex").unwrap();
        answers.toggle("dental", "tartar", true);

        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"dental":["tartar"],"dogName":"Rex"}"#);

        let parsed: AnswerMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, answers);
    }

    #[test]
    fn payload_email_overrides_stored_email() {
        let mut answers = AnswerMap::new();
        answers.set_single("email", "old@example.com").unwrap();
        answers.set_single("problem", "itching").unwrap();

        let payload = answers.submission_payload("new@example.com");
        assert_eq!(payload["email"], "new@example.com");
        assert_eq!(payload["problem"], "itching");
    }
}
