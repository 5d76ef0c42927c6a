//! Sample transcript generator
//!
//! Writes one transcript per day, newest first, as
//! `sample_output_{n}.json`. The output feeds straight into
//! [`crate::ingest::ingest_directory`].

use chrono::{Duration, NaiveDate};
use rand::Rng;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::ingest::IngestError;

const FEELINGS: [&str; 4] = ["Felt great", "Felt tired", "Felt stressed", "Felt motivated"];
const DAYS: [&str; 4] = [
    "Had a productive day",
    "Struggled with focus",
    "Enjoyed my meals",
    "Had trouble sleeping",
];
const CLOSINGS: [&str; 4] = [
    "Overall, a good day.",
    "Room for improvement tomorrow.",
    "Feeling optimistic about progress.",
    "Need to focus on better habits.",
];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

/// One transcript: every label scored 1..=5, two notes, one closing line
pub fn generate_transcript<R, S>(date: NaiveDate, labels: &[S], rng: &mut R) -> String
where
    R: Rng + ?Sized,
    S: AsRef<str>,
{
    let mut text = format!("Biofeedback Entry for {}\n\n", date.format("%Y-%m-%d"));

    for label in labels {
        let _ = writeln!(text, "{}: {}", label.as_ref(), rng.gen_range(1..=5));
    }

    let _ = write!(
        text,
        "\nAdditional Notes:\n- {}\n- {}\n\n{}",
        pick(rng, &FEELINGS),
        pick(rng, &DAYS),
        pick(rng, &CLOSINGS)
    );

    text
}

/// Write `count` transcripts into `dir`, dated `start`, `start - 1`, ...
pub fn write_samples<R, S>(
    dir: &Path,
    labels: &[S],
    count: usize,
    start: NaiveDate,
    rng: &mut R,
) -> Result<Vec<PathBuf>, IngestError>
where
    R: Rng + ?Sized,
    S: AsRef<str>,
{
    std::fs::create_dir_all(dir).map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(count);

    for i in 0..count {
        let date = start - Duration::days(i as i64);
        let body = serde_json::json!({ "text": generate_transcript(date, labels, rng) });
        let path = dir.join(format!("sample_output_{}.json", i + 1));

        let content =
            serde_json::to_string_pretty(&body).map_err(|e| IngestError::InvalidJson {
                path: path.clone(),
                error: e.to_string(),
            })?;

        std::fs::write(&path, content).map_err(|source| IngestError::Io {
            path: path.clone(),
            source,
        })?;

        written.push(path);
    }

    tracing::info!(count, dir = %dir.display(), "Generated sample files");
    Ok(written)
}
