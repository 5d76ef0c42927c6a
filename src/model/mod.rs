//! Biofeedback Data Model
//!
//! The types every other module speaks:
//!
//! - **entry**: `BiofeedbackEntry`, one self-report for a date
//! - **metric**: `MetricValue`, a score with optional notes
//! - **range**: `DateRange`, the inclusive filter sent with fetches
//! - **error**: Decode and validation errors
//!
//! # Wire shapes
//!
//! The backend and older frontends disagree on how metrics are encoded.
//! All of these decode to the same entry:
//!
//! ```text
//! {"date": "2024-01-01", "metrics": {"mood": 3}}
//! {"date": "2024-01-01", "metrics": {"mood": {"score": 3, "notes": null}}}
//! {"id": 7, "date": "2024-01-01", "mood": 3, "soreness": null}
//! ```

mod entry;
mod error;
mod metric;
mod range;

pub use entry::{parse_date, parse_time, BiofeedbackEntry};
pub use error::{EntryError, EntryResult};
pub use metric::MetricValue;
pub use range::DateRange;
