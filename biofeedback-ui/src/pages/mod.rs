//! Application Pages
//!
//! Top-level page components for routing.

pub mod dashboard;
pub mod data_entry;
pub mod explore;
pub mod settings;

pub use dashboard::Dashboard;
pub use data_entry::DataEntry;
pub use explore::Explore;
pub use settings::Settings;
