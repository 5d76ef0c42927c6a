//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod nav;
pub mod trend_chart;
pub mod latest_chart;
pub mod summary;
pub mod date_range;
pub mod notes_modal;
pub mod loading;
pub mod toast;

pub use nav::Nav;
pub use trend_chart::TrendChart;
pub use latest_chart::LatestChart;
pub use summary::SummaryTiles;
pub use date_range::DateRangePicker;
pub use notes_modal::NotesModal;
pub use loading::{Loading, NoData};
pub use toast::Toast;
