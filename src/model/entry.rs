//! Biofeedback entries
//!
//! Decoding is done by hand from `serde_json::Value` because three different
//! shapes are in circulation (see the module docs). Serialization always
//! produces the shape `POST /biofeedback` accepts.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::error::{EntryError, EntryResult};
use super::metric::MetricValue;

/// Top-level keys that are never metrics in the flat row shape
const RESERVED_FIELDS: [&str; 6] = [
    "id",
    "date",
    "time",
    "metrics",
    "additional_notes",
    "summary",
];

/// One self-report for a calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct BiofeedbackEntry {
    /// Server-assigned row id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    pub metrics: BTreeMap<String, MetricValue>,
    pub additional_notes: Vec<String>,
    pub summary: String,
}

impl BiofeedbackEntry {
    /// Create an empty entry for a date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: None,
            date,
            time: None,
            metrics: BTreeMap::new(),
            additional_notes: Vec::new(),
            summary: String::new(),
        }
    }

    /// Builder method: set time of day
    pub fn time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Builder method: add a bare score
    pub fn score(mut self, metric: impl Into<String>, score: f64) -> Self {
        self.metrics.insert(metric.into(), MetricValue::Score(score));
        self
    }

    /// Builder method: add a score with notes
    pub fn scored_note(
        mut self,
        metric: impl Into<String>,
        score: f64,
        notes: impl Into<String>,
    ) -> Self {
        self.metrics
            .insert(metric.into(), MetricValue::new(score, Some(notes.into())));
        self
    }

    /// Builder method: append an additional note
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.additional_notes.push(note.into());
        self
    }

    /// Builder method: set summary text
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Score for a metric, if this entry recorded it
    pub fn metric_score(&self, metric: &str) -> Option<f64> {
        self.metrics.get(metric).map(MetricValue::score)
    }

    /// Decode an entry from any of the supported wire shapes
    pub fn from_json(value: &Value) -> EntryResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| EntryError::NotAnObject(json_kind(value)))?;

        let date = match obj.get("date") {
            Some(Value::String(s)) => parse_date(s)?,
            Some(Value::Null) | None => return Err(EntryError::MissingField("date")),
            Some(other) => return Err(EntryError::InvalidDate(other.to_string())),
        };

        let time = obj.get("time").and_then(Value::as_str).and_then(parse_time);

        Ok(Self {
            id: obj.get("id").and_then(Value::as_i64),
            date,
            time,
            metrics: decode_metrics(obj),
            additional_notes: decode_notes(obj.get("additional_notes")),
            summary: obj
                .get("summary")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

impl TryFrom<Value> for BiofeedbackEntry {
    type Error = EntryError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

/// Merge nested `metrics` with flat numeric columns. Nested wins on conflict.
fn decode_metrics(obj: &Map<String, Value>) -> BTreeMap<String, MetricValue> {
    let mut metrics = BTreeMap::new();

    for (key, value) in obj {
        if RESERVED_FIELDS.contains(&key.as_str()) || !value.is_number() {
            continue;
        }
        if let Some(metric) = MetricValue::from_json(value) {
            metrics.insert(key.clone(), metric);
        }
    }

    if let Some(Value::Object(nested)) = obj.get("metrics") {
        for (key, value) in nested {
            match MetricValue::from_json(value) {
                Some(metric) => {
                    metrics.insert(key.clone(), metric);
                }
                None => {
                    tracing::debug!(metric = %key, "Skipping metric without a numeric score");
                }
            }
        }
    }

    metrics
}

fn decode_notes(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse `YYYY-MM-DD`, ignoring any trailing time part
/// (`2024-01-01T08:00:00`, `2024-01-01 08:00:00`).
pub fn parse_date(s: &str) -> EntryResult<NaiveDate> {
    let day = s.trim().split(['T', ' ']).next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| EntryError::InvalidDate(s.to_string()))
}

/// Parse a time of day; `None` when it doesn't look like one
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}
