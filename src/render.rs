//! Text Chart Views
//!
//! Terminal renderings of the three dashboard tabs plus the metric detail
//! and notes views. Every function returns a `String` so the CLI prints it
//! and tests can assert on it.

use std::fmt::Write;

use crate::model::BiofeedbackEntry;
use crate::series::{display_name, sort_chronologically, ChartData, NO_DATA_MESSAGE};
use crate::session::Tab;

/// Shown in the notes view when an entry carries no notes
pub const NO_NOTES_MESSAGE: &str = "No notes available for this entry.";

const SPARK_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const GAP_MARK: char = '·';
const TILES_PER_ROW: usize = 4;
const TILE_WIDTH: usize = 18;

/// Rendering options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    /// Bottom of the value axis
    pub y_min: f64,
    /// Top of the value axis
    pub y_max: f64,
    /// Columns available for sparklines and bars
    pub width: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            y_min: 0.0,
            y_max: 5.0,
            width: 40,
        }
    }
}

impl ChartOptions {
    /// Position of `value` on the axis, clamped to 0..=1
    fn fraction(&self, value: f64) -> f64 {
        let span = self.y_max - self.y_min;
        if span <= 0.0 {
            return 1.0;
        }
        ((value - self.y_min) / span).clamp(0.0, 1.0)
    }
}

/// Render one tab
pub fn render_tab(tab: Tab, chart: &ChartData, opts: &ChartOptions) -> String {
    match tab {
        Tab::Trend => render_trend(chart, opts),
        Tab::Latest => render_latest(chart, opts),
        Tab::Summary => render_summary(chart),
    }
}

/// Trend chart: one sparkline per metric across all entries.
///
/// Missing values are drawn as `·` and do not break the line.
pub fn render_trend(chart: &ChartData, opts: &ChartOptions) -> String {
    if chart.is_empty() {
        return format!("{}\n", NO_DATA_MESSAGE);
    }

    let mut out = String::new();
    let first = chart.rows.first().map(|r| r.date);
    let last = chart.rows.last().map(|r| r.date);
    let _ = writeln!(
        out,
        "{} ({} → {}, {} entries)",
        Tab::Trend.label(),
        first.map(|d| d.to_string()).unwrap_or_default(),
        last.map(|d| d.to_string()).unwrap_or_default(),
        chart.rows.len()
    );

    let width = opts.width.max(1);
    let skip = chart.rows.len().saturating_sub(width);
    if skip > 0 {
        let _ = writeln!(out, "(showing the last {} entries)", width);
    }
    out.push('\n');

    let name_width = label_width(&chart.metrics);

    for (idx, series) in chart.series.iter().enumerate() {
        let line: String = chart
            .rows
            .iter()
            .skip(skip)
            .map(|row| match row.values[idx] {
                Some(v) => spark(opts.fraction(v)),
                None => GAP_MARK,
            })
            .collect();

        let stats = series
            .stats()
            .map(|s| {
                format!(
                    "min {}  max {}  latest {}",
                    format_score(s.min),
                    format_score(s.max),
                    format_score(s.latest)
                )
            })
            .unwrap_or_else(|| "no values".to_string());

        let _ = writeln!(
            out,
            "  {:<name_width$}  {}  {}  {}",
            series.display_name(),
            line,
            stats,
            series.color,
        );
    }

    out
}

/// Latest-entry bar chart
pub fn render_latest(chart: &ChartData, opts: &ChartOptions) -> String {
    let latest = match chart.latest() {
        Some(row) => row,
        None => return format!("{}\n", NO_DATA_MESSAGE),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} ({})\n", Tab::Latest.label(), latest.date);

    let name_width = label_width(&chart.metrics);

    for (metric, value) in chart.latest_values() {
        let bar = match value {
            Some(v) => {
                let len = (opts.fraction(v) * opts.width as f64).round() as usize;
                format!("{} {}", "█".repeat(len), format_score(v))
            }
            None => "N/A".to_string(),
        };
        let _ = writeln!(out, "  {:<name_width$}  {}", display_name(metric), bar);
    }

    out
}

/// Summary tiles: one box per metric with the latest value
pub fn render_summary(chart: &ChartData) -> String {
    if chart.is_empty() {
        return format!("{}\n", NO_DATA_MESSAGE);
    }

    let tiles: Vec<[String; 4]> = chart
        .latest_values()
        .into_iter()
        .map(|(metric, value)| {
            let value = value
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "N/A".to_string());
            tile(&display_name(metric), &value)
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "{}\n", Tab::Summary.label());

    for row in tiles.chunks(TILES_PER_ROW) {
        for line in 0..4 {
            let joined: Vec<&str> = row.iter().map(|t| t[line].as_str()).collect();
            let _ = writeln!(out, "{}", joined.join(" "));
        }
    }

    out
}

fn tile(title: &str, value: &str) -> [String; 4] {
    let inner = TILE_WIDTH - 2;
    let clip = |s: &str| -> String { s.chars().take(inner - 2).collect() };
    [
        format!("┌{}┐", "─".repeat(inner)),
        format!("│ {:<w$} │", clip(title), w = inner - 2),
        format!("│ {:<w$} │", clip(value), w = inner - 2),
        format!("└{}┘", "─".repeat(inner)),
    ]
}

/// Per-date values and notes for one metric, newest last
pub fn render_metric_details(entries: &[BiofeedbackEntry], metric: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Details\n", display_name(metric));

    let mut any = false;
    for entry in sort_chronologically(entries) {
        let Some(value) = entry.metrics.get(metric) else {
            continue;
        };
        any = true;
        let _ = writeln!(out, "  {}: {}", entry.date, format_score(value.score()));
        if let Some(notes) = value.notes() {
            let _ = writeln!(out, "    {}", notes);
        }
    }

    if !any {
        let _ = writeln!(out, "  No values recorded for {}.", display_name(metric));
    }

    out
}

/// Notes attached to one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNotes<'a> {
    /// `(metric, notes)` pairs in key order
    pub metric_notes: Vec<(&'a str, &'a str)>,
    pub additional: &'a [String],
}

impl EntryNotes<'_> {
    pub fn is_empty(&self) -> bool {
        self.metric_notes.is_empty() && self.additional.is_empty()
    }
}

/// Collect an entry's notes. With `metric` set, only that metric's notes
/// are included alongside the additional notes.
pub fn entry_notes<'a>(entry: &'a BiofeedbackEntry, metric: Option<&str>) -> EntryNotes<'a> {
    let metric_notes = entry
        .metrics
        .iter()
        .filter(|(m, _)| metric.map_or(true, |wanted| m.as_str() == wanted))
        .filter_map(|(m, v)| v.notes().map(|n| (m.as_str(), n)))
        .collect();

    EntryNotes {
        metric_notes,
        additional: &entry.additional_notes,
    }
}

/// Notes dialog for one entry, optionally focused on a metric
pub fn render_entry_notes(entry: &BiofeedbackEntry, metric: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Notes for {}\n", entry.date);

    let notes = entry_notes(entry, metric);

    for (m, text) in &notes.metric_notes {
        let _ = writeln!(out, "Notes for {}:", display_name(m));
        let _ = writeln!(out, "  {}\n", text);
    }

    if !notes.additional.is_empty() {
        let _ = writeln!(out, "Additional Notes:");
        for note in notes.additional {
            let _ = writeln!(out, "  {}", note);
        }
    }

    if notes.is_empty() {
        let _ = writeln!(out, "{}", NO_NOTES_MESSAGE);
    }

    if !entry.summary.is_empty() {
        let _ = writeln!(out, "\nSummary:\n  {}", entry.summary);
    }

    out
}

/// Whole numbers without decimals, everything else with one
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn spark(fraction: f64) -> char {
    let idx = (fraction * (SPARK_BLOCKS.len() - 1) as f64).round() as usize;
    SPARK_BLOCKS[idx.min(SPARK_BLOCKS.len() - 1)]
}

fn label_width(metrics: &[String]) -> usize {
    metrics
        .iter()
        .map(|m| display_name(m).chars().count())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> Vec<BiofeedbackEntry> {
        vec![
            BiofeedbackEntry::new(day("2024-01-02")).score("mood", 5.0),
            BiofeedbackEntry::new(day("2024-01-01"))
                .score("mood", 0.0)
                .scored_note("sleep_quality", 2.0, "woke up twice"),
            BiofeedbackEntry::new(day("2024-01-03"))
                .score("mood", 4.0)
                .score("sleep_quality", 3.0),
        ]
    }

    #[test]
    fn test_empty_views_show_no_data() {
        let chart = ChartData::from_entries(&[]);
        let opts = ChartOptions::default();

        for tab in Tab::ALL {
            assert_eq!(render_tab(tab, &chart, &opts).trim(), NO_DATA_MESSAGE);
        }
    }

    #[test]
    fn test_trend_marks_gaps() {
        let chart = ChartData::from_entries(&sample());
        let out = render_trend(&chart, &ChartOptions::default());

        assert!(out.contains("2024-01-01 → 2024-01-03, 3 entries"));
        let sleep_line = out.lines().find(|l| l.contains("Sleep Quality")).unwrap();
        assert!(sleep_line.contains('·'));
        let mood_line = out.lines().find(|l| l.trim_start().starts_with("Mood")).unwrap();
        assert!(mood_line.contains("▁█▇"));
        assert!(mood_line.contains("latest 4"));
    }

    #[test]
    fn test_trend_truncates_to_width() {
        let entries: Vec<_> = (1..=10)
            .map(|d| {
                BiofeedbackEntry::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
                    .score("mood", 3.0)
            })
            .collect();
        let chart = ChartData::from_entries(&entries);
        let opts = ChartOptions {
            width: 4,
            ..Default::default()
        };

        let out = render_trend(&chart, &opts);
        assert!(out.contains("showing the last 4 entries"));
    }

    #[test]
    fn test_latest_bars() {
        let chart = ChartData::from_entries(&sample());
        let opts = ChartOptions {
            width: 10,
            ..Default::default()
        };
        let out = render_latest(&chart, &opts);

        assert!(out.starts_with("Latest Entry (2024-01-03)"));
        assert!(out.contains(&format!("{} 4", "█".repeat(8))));
        assert!(out.contains(&format!("{} 3", "█".repeat(6))));
    }

    #[test]
    fn test_latest_missing_metric_is_na() {
        let entries = vec![
            BiofeedbackEntry::new(day("2024-01-01")).score("energy", 2.0),
            BiofeedbackEntry::new(day("2024-01-02")).score("mood", 3.0),
        ];
        let chart = ChartData::with_metrics(&entries, vec!["energy".into(), "mood".into()]);
        let out = render_latest(&chart, &ChartOptions::default());

        let energy = out.lines().find(|l| l.contains("Energy")).unwrap();
        assert!(energy.ends_with("N/A"));
    }

    #[test]
    fn test_summary_tiles() {
        let chart = ChartData::from_entries(&sample());
        let out = render_summary(&chart);

        assert!(out.contains(&format!("│ {:<14} │", "Mood")));
        assert!(out.contains(&format!("│ {:<14} │", "4.00")));
        assert!(out.contains(&format!("│ {:<14} │", "Sleep Quality")));
        assert!(out.contains(&format!("│ {:<14} │", "3.00")));
    }

    #[test]
    fn test_metric_details_include_notes() {
        let out = render_metric_details(&sample(), "sleep_quality");

        assert!(out.starts_with("Sleep Quality Details"));
        assert!(out.contains("2024-01-01: 2\n    woke up twice"));
        assert!(out.contains("2024-01-03: 3"));
    }

    #[test]
    fn test_entry_notes() {
        let entry = BiofeedbackEntry::new(day("2024-01-01"))
            .scored_note("soreness", 2.0, "calves")
            .note("- Felt tired");

        let out = render_entry_notes(&entry, Some("soreness"));
        assert!(out.contains("Notes for Soreness:\n  calves"));
        assert!(out.contains("Additional Notes:\n  - Felt tired"));
        assert!(!out.contains("No notes available"));

        let notes = entry_notes(&entry, None);
        assert_eq!(notes.metric_notes, vec![("soreness", "calves")]);
        assert!(entry_notes(&entry, Some("mood")).metric_notes.is_empty());

        let bare = BiofeedbackEntry::new(day("2024-01-01")).score("mood", 3.0);
        let out = render_entry_notes(&bare, Some("mood"));
        assert!(out.contains(NO_NOTES_MESSAGE));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(4.0), "4");
        assert_eq!(format_score(3.3), "3.3");
    }
}
