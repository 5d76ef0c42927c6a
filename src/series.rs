//! Series Transformer
//!
//! Reshapes fetched entries into chart-ready data:
//!
//! ```text
//! entries (fetch order)
//!   → stable sort by date
//!   → metric names from the latest entry
//!   → one Series per metric      (points only where the metric was recorded)
//!   → aligned ChartRows          (None where it wasn't; drawn with connect-nulls)
//! ```
//!
//! Nothing here is cached: views call [`ChartData::from_entries`] whenever
//! the entry list changes.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::BiofeedbackEntry;

/// Shown by every view when there is nothing to chart
pub const NO_DATA_MESSAGE: &str = "No data available. Please submit some biofeedback data.";

/// Series colors, assigned by metric position
pub const SERIES_COLORS: [&str; 10] = [
    "#8884d8", "#82ca9d", "#ffc658", "#ff7300", "#0088FE", "#00C49F", "#FFBB28", "#FF8042",
    "#a4de6c", "#d0ed57",
];

/// One plotted value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A metric's values over time, ascending by date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub metric: String,
    pub color: &'static str,
    pub points: Vec<SeriesPoint>,
}

/// Summary statistics for a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub latest: f64,
}

impl Series {
    /// Title-cased metric name
    pub fn display_name(&self) -> String {
        display_name(&self.metric)
    }

    /// Most recent point
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Count/min/max/mean/latest, `None` for an empty series
    pub fn stats(&self) -> Option<SeriesStats> {
        let latest = self.points.last()?.value;
        let count = self.points.len();
        let (min, max, sum) = self.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), p| (min.min(p.value), max.max(p.value), sum + p.value),
        );

        Some(SeriesStats {
            count,
            min,
            max,
            mean: sum / count as f64,
            latest,
        })
    }
}

/// One entry's values aligned to a metric list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// Everything the chart views need, derived from one entry snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    /// Metric keys, in series order
    pub metrics: Vec<String>,
    pub series: Vec<Series>,
    /// One row per entry, ascending by date
    pub rows: Vec<ChartRow>,
}

impl ChartData {
    /// Derive chart data using the latest entry's metric names
    pub fn from_entries(entries: &[BiofeedbackEntry]) -> Self {
        let metrics = metric_names(entries);
        Self::with_metrics(entries, metrics)
    }

    /// Derive chart data for an explicit metric list
    pub fn with_metrics(entries: &[BiofeedbackEntry], metrics: Vec<String>) -> Self {
        let sorted = sort_chronologically(entries);
        let series = series_from_sorted(&sorted, &metrics);
        let rows = rows_from_sorted(&sorted, &metrics);

        Self {
            metrics,
            series,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The last row: what the latest-entry bar chart and summary tiles show
    pub fn latest(&self) -> Option<&ChartRow> {
        self.rows.last()
    }

    /// Latest value for each metric, paired with its key
    pub fn latest_values(&self) -> Vec<(&str, Option<f64>)> {
        let latest = self.latest();
        self.metrics
            .iter()
            .enumerate()
            .map(|(i, m)| (m.as_str(), latest.and_then(|row| row.values[i])))
            .collect()
    }

    /// Find a series by metric key
    pub fn series_for(&self, metric: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.metric == metric)
    }

    /// Narrow to one metric, keeping its color and its column of each row.
    /// An unknown metric leaves the chart unchanged.
    pub fn focus(mut self, metric: &str) -> Self {
        let Some(idx) = self.metrics.iter().position(|m| m == metric) else {
            return self;
        };

        self.metrics = vec![self.metrics.swap_remove(idx)];
        self.series.retain(|s| s.metric == metric);
        for row in &mut self.rows {
            row.values = vec![row.values[idx]];
        }
        self
    }
}

/// Stable ascending sort by date; same-date entries keep fetch order
pub fn sort_chronologically(entries: &[BiofeedbackEntry]) -> Vec<&BiofeedbackEntry> {
    let mut sorted: Vec<&BiofeedbackEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);
    sorted
}

/// The chronologically last entry
pub fn latest_entry(entries: &[BiofeedbackEntry]) -> Option<&BiofeedbackEntry> {
    sort_chronologically(entries).last().copied()
}

/// Metric names recorded in the latest entry, in key order
pub fn metric_names(entries: &[BiofeedbackEntry]) -> Vec<String> {
    latest_entry(entries)
        .map(|e| e.metrics.keys().cloned().collect())
        .unwrap_or_default()
}

/// One series per metric, in the order given
pub fn build_series(entries: &[BiofeedbackEntry], metrics: &[String]) -> Vec<Series> {
    series_from_sorted(&sort_chronologically(entries), metrics)
}

/// Aligned rows, one per entry in date order
pub fn chart_rows(entries: &[BiofeedbackEntry], metrics: &[String]) -> Vec<ChartRow> {
    rows_from_sorted(&sort_chronologically(entries), metrics)
}

fn series_from_sorted(sorted: &[&BiofeedbackEntry], metrics: &[String]) -> Vec<Series> {
    metrics
        .iter()
        .enumerate()
        .map(|(idx, metric)| Series {
            metric: metric.clone(),
            color: series_color(idx),
            points: sorted
                .iter()
                .filter_map(|entry| {
                    entry.metric_score(metric).map(|value| SeriesPoint {
                        date: entry.date,
                        value,
                    })
                })
                .collect(),
        })
        .collect()
}

fn rows_from_sorted(sorted: &[&BiofeedbackEntry], metrics: &[String]) -> Vec<ChartRow> {
    sorted
        .iter()
        .map(|entry| ChartRow {
            date: entry.date,
            values: metrics.iter().map(|m| entry.metric_score(m)).collect(),
        })
        .collect()
}

/// Palette color for the series at `index`
pub fn series_color(index: usize) -> &'static str {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// `sleep_quality` → `Sleep Quality`
pub fn display_name(metric: &str) -> String {
    metric
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(date: &str) -> BiofeedbackEntry {
        BiofeedbackEntry::new(day(date))
    }

    #[test]
    fn test_energy_gap_and_mood_order() {
        // Newest first, the way the backend returns them
        let entries = vec![
            entry("2024-01-02").score("mood", 5.0),
            entry("2024-01-01").score("mood", 3.0).score("energy", 4.0),
        ];
        let metrics = vec!["energy".to_string(), "mood".to_string()];

        let series = build_series(&entries, &metrics);

        let energy = &series[0];
        assert_eq!(energy.metric, "energy");
        assert_eq!(
            energy.points,
            vec![SeriesPoint {
                date: day("2024-01-01"),
                value: 4.0
            }]
        );

        let mood = &series[1];
        assert_eq!(mood.points.len(), 2);
        assert_eq!(mood.points[0].date, day("2024-01-01"));
        assert_eq!(mood.points[0].value, 3.0);
        assert_eq!(mood.points[1].date, day("2024-01-02"));
        assert_eq!(mood.points[1].value, 5.0);
    }

    #[test]
    fn test_dates_non_decreasing() {
        let entries = vec![
            entry("2024-03-10").score("mood", 1.0),
            entry("2024-01-05").score("mood", 2.0),
            entry("2024-02-20").score("mood", 3.0),
            entry("2024-01-05").score("mood", 4.0),
            entry("2023-12-31").score("mood", 5.0),
        ];

        let data = ChartData::from_entries(&entries);
        let dates: Vec<_> = data.rows.iter().map(|r| r.date).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));

        let points = &data.series_for("mood").unwrap().points;
        assert!(points.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_same_date_keeps_fetch_order() {
        let entries = vec![
            entry("2024-01-05").score("mood", 4.0),
            entry("2024-01-01").score("mood", 1.0),
            entry("2024-01-05").score("mood", 2.0),
        ];

        let series = build_series(&entries, &["mood".to_string()]);
        let values: Vec<f64> = series[0].points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 4.0, 2.0]);
    }

    #[test]
    fn test_absent_metric_is_gap_not_zero() {
        let entries = vec![
            entry("2024-01-01").score("mood", 3.0).score("soreness", 2.0),
            entry("2024-01-02").score("mood", 4.0),
            entry("2024-01-03").score("mood", 5.0).score("soreness", 1.0),
        ];

        let data = ChartData::from_entries(&entries);
        let soreness = data.series_for("soreness").unwrap();
        assert_eq!(soreness.points.len(), 2);
        assert!(soreness.points.iter().all(|p| p.date != day("2024-01-02")));

        let idx = data.metrics.iter().position(|m| m == "soreness").unwrap();
        assert_eq!(data.rows[1].values[idx], None);
    }

    #[test]
    fn test_metric_names_from_latest_entry() {
        let entries = vec![
            entry("2024-01-03").score("sleep_quality", 4.0).score("mood", 3.0),
            entry("2024-01-01").score("cravings", 2.0),
        ];

        assert_eq!(metric_names(&entries), vec!["mood", "sleep_quality"]);

        let data = ChartData::from_entries(&entries);
        assert!(data.series_for("cravings").is_none());
    }

    #[test]
    fn test_empty_entries() {
        let data = ChartData::from_entries(&[]);
        assert!(data.is_empty());
        assert!(data.series.is_empty());
        assert!(data.latest().is_none());
        assert!(latest_entry(&[]).is_none());
    }

    #[test]
    fn test_latest_values() {
        let entries = vec![
            entry("2024-01-01").score("mood", 3.0).score("energy", 2.0),
            entry("2024-01-02").score("mood", 5.0),
        ];
        let data = ChartData::with_metrics(&entries, vec!["energy".into(), "mood".into()]);

        assert_eq!(
            data.latest_values(),
            vec![("energy", None), ("mood", Some(5.0))]
        );
    }

    #[test]
    fn test_focus_keeps_color_and_column() {
        let entries = vec![
            BiofeedbackEntry::new(day("2024-01-01")).score("mood", 3.0),
            BiofeedbackEntry::new(day("2024-01-02"))
                .score("mood", 2.0)
                .score("sleep_quality", 4.0),
        ];
        let full = ChartData::from_entries(&entries);
        let color = full.series_for("sleep_quality").unwrap().color;

        let focused = full.clone().focus("sleep_quality");
        assert_eq!(focused.metrics, vec!["sleep_quality"]);
        assert_eq!(focused.series.len(), 1);
        assert_eq!(focused.series[0].color, color);
        assert_eq!(focused.rows[0].values, vec![None]);
        assert_eq!(focused.rows[1].values, vec![Some(4.0)]);

        assert_eq!(full.clone().focus("unknown"), full);
    }

    #[test]
    fn test_colors_cycle() {
        assert_eq!(series_color(0), "#8884d8");
        assert_eq!(series_color(9), "#d0ed57");
        assert_eq!(series_color(10), "#8884d8");

        let metrics: Vec<String> = (0..12).map(|i| format!("m{:02}", i)).collect();
        let series = build_series(&[], &metrics);
        assert_eq!(series[11].color, SERIES_COLORS[1]);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("sleep_quality"), "Sleep Quality");
        assert_eq!(display_name("mood"), "Mood");
        assert_eq!(display_name("gym_performance"), "Gym Performance");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_stats() {
        let entries = vec![
            entry("2024-01-01").score("mood", 2.0),
            entry("2024-01-02").score("mood", 4.0),
            entry("2024-01-03").score("mood", 3.0),
        ];
        let series = build_series(&entries, &["mood".to_string()]);
        let stats = series[0].stats().unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 4.0);
        assert!((stats.mean - 3.0).abs() < 1e-9);
        assert_eq!(stats.latest, 3.0);

        let empty = build_series(&[], &["mood".to_string()]);
        assert!(empty[0].stats().is_none());
    }
}
