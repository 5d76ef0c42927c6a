//! Metric values
//!
//! A metric is a bare score or a score with free-text notes. Everything
//! downstream reads the score through [`MetricValue::score`] and never has to
//! care which shape the backend sent.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A single metric reading inside an entry
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// Numeric score only
    Score(f64),
    /// Numeric score with notes
    ScoredNote(f64, String),
}

impl MetricValue {
    /// Build a value from a score and optional notes.
    ///
    /// Empty or whitespace-only notes collapse to `Score`.
    pub fn new(score: f64, notes: Option<String>) -> Self {
        match notes {
            Some(n) if !n.trim().is_empty() => MetricValue::ScoredNote(score, n),
            _ => MetricValue::Score(score),
        }
    }

    /// The numeric score
    pub fn score(&self) -> f64 {
        match self {
            MetricValue::Score(s) | MetricValue::ScoredNote(s, _) => *s,
        }
    }

    /// Notes, if any were recorded
    pub fn notes(&self) -> Option<&str> {
        match self {
            MetricValue::Score(_) => None,
            MetricValue::ScoredNote(_, n) => Some(n),
        }
    }

    /// Decode one metric from its wire form.
    ///
    /// Returns `None` when the value carries no score (`null`,
    /// `{"score": null}`, strings, arrays); such metrics are absent, not zero.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(MetricValue::Score),
            Value::Object(obj) => {
                let score = obj.get("score").and_then(Value::as_f64)?;
                let notes = obj
                    .get("notes")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Some(MetricValue::new(score, notes))
            }
            _ => None,
        }
    }
}

/// Serialize a score as an integer when it has no fractional part.
///
/// The backend column type is an integer; `4.0` would be accepted but `4`
/// is what the other clients send.
fn serialize_score<S: SerializeMap>(map: &mut S, score: f64) -> Result<(), S::Error> {
    if score.fract() == 0.0 && score.abs() < i64::MAX as f64 {
        map.serialize_entry("score", &(score as i64))
    } else {
        map.serialize_entry("score", &score)
    }
}

impl Serialize for MetricValue {
    /// Always the `{"score": .., "notes": ..}` form accepted by `POST /biofeedback`
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Score(score) => {
                let mut map = serializer.serialize_map(Some(1))?;
                serialize_score(&mut map, *score)?;
                map.end()
            }
            MetricValue::ScoredNote(score, notes) => {
                let mut map = serializer.serialize_map(Some(2))?;
                serialize_score(&mut map, *score)?;
                map.serialize_entry("notes", notes)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_number_is_score() {
        assert_eq!(MetricValue::from_json(&json!(4)), Some(MetricValue::Score(4.0)));
        assert_eq!(
            MetricValue::from_json(&json!(2.5)),
            Some(MetricValue::Score(2.5))
        );
    }

    #[test]
    fn test_object_with_notes() {
        let value = MetricValue::from_json(&json!({"score": 3, "notes": "slept late"}));
        assert_eq!(
            value,
            Some(MetricValue::ScoredNote(3.0, "slept late".to_string()))
        );
        assert_eq!(value.unwrap().notes(), Some("slept late"));
    }

    #[test]
    fn test_object_without_notes_is_score() {
        assert_eq!(
            MetricValue::from_json(&json!({"score": 3, "notes": null})),
            Some(MetricValue::Score(3.0))
        );
        assert_eq!(
            MetricValue::from_json(&json!({"score": 3, "notes": "  "})),
            Some(MetricValue::Score(3.0))
        );
    }

    #[test]
    fn test_missing_score_is_absent() {
        assert_eq!(MetricValue::from_json(&json!(null)), None);
        assert_eq!(MetricValue::from_json(&json!({"score": null})), None);
        assert_eq!(MetricValue::from_json(&json!({"notes": "n/a"})), None);
        assert_eq!(MetricValue::from_json(&json!("4")), None);
    }

    #[test]
    fn test_serializes_object_form() {
        let json = serde_json::to_value(MetricValue::Score(4.0)).unwrap();
        assert_eq!(json, json!({"score": 4}));

        let json =
            serde_json::to_value(MetricValue::ScoredNote(2.5, "tight hamstrings".into())).unwrap();
        assert_eq!(json, json!({"score": 2.5, "notes": "tight hamstrings"}));
    }
}
