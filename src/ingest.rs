//! Transcript Ingest
//!
//! Turns dictated transcripts into entries. A transcript is a JSON file
//! holding `{"text": "..."}` where the text looks like:
//!
//! ```text
//! Biofeedback Entry for 2024-01-05
//!
//! Mood: 4
//! Sleep Quality: 2
//!
//! Additional Notes:
//! - Felt tired
//! - Had a productive day
//! ```
//!
//! Each configured label becomes a snake_case metric (`Sleep Quality` →
//! `sleep_quality`). A label that is missing or not a number is left out of
//! the entry rather than recorded as zero.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::client::BiofeedbackApi;
use crate::model::BiofeedbackEntry;

/// Ingest errors
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid transcript {path:?}: {error}")]
    InvalidJson { path: PathBuf, error: String },

    #[error("Invalid metric label {label:?}: {error}")]
    InvalidLabel { label: String, error: String },
}

#[derive(Debug, Deserialize)]
struct TranscriptFile {
    #[serde(default)]
    text: String,
}

struct LabelPattern {
    key: String,
    label: String,
    regex: Regex,
}

/// Extracts entries from transcript text
pub struct TranscriptParser {
    labels: Vec<LabelPattern>,
    header: Regex,
    summary_chars: usize,
}

impl TranscriptParser {
    /// Build a parser for the given labels
    pub fn new<S: AsRef<str>>(labels: &[S], summary_chars: usize) -> Result<Self, IngestError> {
        let labels = labels
            .iter()
            .map(|label| {
                let label = label.as_ref().trim();
                let pattern = format!(r"(?m)\b{}:[ \t]*([^\r\n]*)", regex::escape(label));
                let regex = Regex::new(&pattern).map_err(|e| IngestError::InvalidLabel {
                    label: label.to_string(),
                    error: e.to_string(),
                })?;
                Ok(LabelPattern {
                    key: metric_key(label),
                    label: label.to_string(),
                    regex,
                })
            })
            .collect::<Result<Vec<_>, IngestError>>()?;

        let header = Regex::new(r"Biofeedback Entry for (\d{4}-\d{2}-\d{2})").map_err(|e| {
            IngestError::InvalidLabel {
                label: "header".to_string(),
                error: e.to_string(),
            }
        })?;

        Ok(Self {
            labels,
            header,
            summary_chars,
        })
    }

    /// Metric keys this parser produces, in label order
    pub fn metric_keys(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.key.as_str()).collect()
    }

    /// Parse one transcript. `now` supplies the time of day, and the date
    /// when the text has no `Biofeedback Entry for` header.
    pub fn parse(&self, text: &str, now: NaiveDateTime) -> BiofeedbackEntry {
        let date = self.header_date(text).unwrap_or_else(|| now.date());
        let mut entry = BiofeedbackEntry::new(date).time(now.time());

        for pattern in &self.labels {
            if let Some(score) = extract_score(pattern, text) {
                entry = entry.score(pattern.key.clone(), score);
            }
        }

        for note in dash_notes(text) {
            entry = entry.note(note);
        }

        entry.summary(text.chars().take(self.summary_chars).collect::<String>())
    }

    fn header_date(&self, text: &str) -> Option<NaiveDate> {
        let caps = self.header.captures(text)?;
        NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()
    }
}

fn extract_score(pattern: &LabelPattern, text: &str) -> Option<f64> {
    let Some(caps) = pattern.regex.captures(text) else {
        tracing::warn!(label = %pattern.label, "Label not found in transcript");
        return None;
    };

    let raw = caps[1].trim();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            tracing::warn!(label = %pattern.label, value = %raw, "Could not parse metric value");
            None
        }
    }
}

/// Trimmed lines starting with `-`, dash kept
pub fn dash_notes(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .map(str::to_string)
        .collect()
}

/// `Sleep Quality` → `sleep_quality`
pub fn metric_key(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Read the `text` field of a transcript file
pub fn read_transcript(path: &Path) -> Result<String, IngestError> {
    let content = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file: TranscriptFile =
        serde_json::from_str(&content).map_err(|e| IngestError::InvalidJson {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

    Ok(file.text)
}

/// `*.json` files in a directory, sorted by name
pub fn transcript_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    Ok(files)
}

/// Per-directory ingest results
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Entries parsed, with their source file
    pub parsed: Vec<(PathBuf, BiofeedbackEntry)>,
    /// Entries the API accepted
    pub submitted: usize,
    /// Files that failed to read, parse or submit
    pub failed: Vec<(PathBuf, String)>,
}

/// Parse every transcript in `dir` and submit each entry.
///
/// A bad file or rejected submission is recorded and the rest continue.
/// With `dry_run` nothing is sent.
pub async fn ingest_directory<A: BiofeedbackApi + ?Sized>(
    api: &A,
    parser: &TranscriptParser,
    dir: &Path,
    now: NaiveDateTime,
    dry_run: bool,
) -> Result<IngestReport, IngestError> {
    let mut report = IngestReport::default();

    for path in transcript_files(dir)? {
        let text = match read_transcript(&path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping transcript");
                report.failed.push((path, e.to_string()));
                continue;
            }
        };

        let entry = parser.parse(&text, now);

        if !dry_run {
            let body = match serde_json::to_value(&entry) {
                Ok(body) => body,
                Err(e) => {
                    report.failed.push((path, e.to_string()));
                    continue;
                }
            };

            match api.submit_entry(&body).await {
                Ok(()) => {
                    tracing::info!(path = %path.display(), date = %entry.date, "Submitted transcript");
                    report.submitted += 1;
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Error sending transcript");
                    report.failed.push((path.clone(), e.to_string()));
                }
            }
        }

        report.parsed.push((path, entry));
    }

    Ok(report)
}
