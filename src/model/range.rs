//! Date range filter for fetches

use chrono::NaiveDate;

use super::error::{EntryError, EntryResult};

/// Inclusive date range; either end may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// No filtering at all
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a range, rejecting `start > end`
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> EntryResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(EntryError::InvalidRange {
                    start: s.to_string(),
                    end: e.to_string(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Parse from optional `YYYY-MM-DD` strings; empty strings mean unset
    pub fn parse(start: Option<&str>, end: Option<&str>) -> EntryResult<Self> {
        let parse = |s: Option<&str>| -> EntryResult<Option<NaiveDate>> {
            match s.map(str::trim).filter(|s| !s.is_empty()) {
                Some(s) => super::parse_date(s).map(Some),
                None => Ok(None),
            }
        };
        Self::new(parse(start)?, parse(end)?)
    }

    /// True when neither end is set
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a date falls inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    /// Query parameters for `GET /biofeedback`; unset ends are omitted
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(start) = self.start {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }

    /// Human-readable label
    pub fn label(&self) -> String {
        match (self.start, self.end) {
            (None, None) => "All Time".to_string(),
            (Some(s), None) => format!("Since {}", s),
            (None, Some(e)) => format!("Until {}", e),
            (Some(s), Some(e)) => format!("{} to {}", s, e),
        }
    }
}
