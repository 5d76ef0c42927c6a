//! Chart table export
//!
//! CSV: `date` column plus one column per metric, empty cells for gaps.
//! JSON: the entries themselves, in date order.

use std::io::Write;

use crate::model::BiofeedbackEntry;
use crate::series::{sort_chronologically, ChartData};

/// Export errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Unknown export format: {}. Use: csv, json", other)),
        }
    }
}

/// Write entries in the chosen format; returns the number of rows written
pub fn export_entries<W: Write>(
    entries: &[BiofeedbackEntry],
    format: ExportFormat,
    writer: W,
) -> Result<usize, ExportError> {
    match format {
        ExportFormat::Csv => write_chart_csv(&ChartData::from_entries(entries), writer),
        ExportFormat::Json => {
            let sorted = sort_chronologically(entries);
            serde_json::to_writer_pretty(writer, &sorted)?;
            Ok(sorted.len())
        }
    }
}

/// Write the aligned chart table as CSV
pub fn write_chart_csv<W: Write>(chart: &ChartData, writer: W) -> Result<usize, ExportError> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["date".to_string()];
    header.extend(chart.metrics.iter().cloned());
    csv.write_record(&header)?;

    for row in &chart.rows {
        let mut record = vec![row.date.to_string()];
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
        );
        csv.write_record(&record)?;
    }

    csv.flush()?;
    tracing::debug!(rows = chart.rows.len(), "Exported chart table");
    Ok(chart.rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entries() -> Vec<BiofeedbackEntry> {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        vec![
            BiofeedbackEntry::new(day(2)).score("mood", 5.0).score("energy", 2.5),
            BiofeedbackEntry::new(day(1)).score("mood", 3.0),
        ]
    }

    #[test]
    fn test_csv_gaps_are_empty() {
        let mut out = Vec::new();
        let rows = export_entries(&entries(), ExportFormat::Csv, &mut out).unwrap();

        assert_eq!(rows, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "date,energy,mood\n2024-01-01,,3\n2024-01-02,2.5,5\n"
        );
    }

    #[test]
    fn test_json_in_date_order() {
        let mut out = Vec::new();
        export_entries(&entries(), ExportFormat::Json, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["date"], "2024-01-01");
        assert_eq!(value[1]["metrics"]["energy"]["score"], 2.5);
    }

    #[test]
    fn test_empty_has_header_only() {
        let mut out = Vec::new();
        write_chart_csv(&ChartData::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "date\n");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
