//! # Biofeedback
//!
//! Client for a personal biofeedback tracker: daily self-reported scores
//! (mood, sleep quality, soreness, ...) with notes, charted over time.
//!
//! ## Modules
//!
//! - [`model`]: Entries, metric values and date ranges
//! - [`client`]: The `BiofeedbackApi` seam and its HTTP implementation
//! - [`series`]: Reshapes entries into per-metric chart series
//! - [`session`]: Fetch/submit state machine shared by the CLI and web UI
//! - [`auth`]: Gate in front of the entry form
//! - [`render`]: Text charts for the terminal
//! - [`ingest`]: Dictated transcript parsing and batch upload
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use biofeedback::{ChartData, DateRange, Dashboard, HttpClient};
//! use biofeedback::config::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::from_config(&ApiConfig::default())?;
//!     let mut dashboard = Dashboard::new(client);
//!
//!     dashboard.set_range(DateRange::parse(Some("2024-01-01"), None)?).await;
//!
//!     let chart: ChartData = dashboard.session().chart();
//!     for series in &chart.series {
//!         println!("{}: {} points", series.display_name(), series.points.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod ingest;
pub mod model;
pub mod render;
pub mod series;
pub mod session;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod export;
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod samples;

// Re-export top-level types for convenience
pub use model::{BiofeedbackEntry, DateRange, EntryError, EntryResult, MetricValue};

pub use client::{BiofeedbackApi, ClientError};

#[cfg(feature = "native")]
pub use client::HttpClient;

pub use series::{ChartData, ChartRow, Series, SeriesPoint, SeriesStats, NO_DATA_MESSAGE};

pub use session::{Dashboard, FetchOutcome, Notice, Session, SubmitOutcome, Tab};

pub use auth::{AuthGate, AuthMode, AuthState, TokenIssuer};

pub use render::ChartOptions;

pub use ingest::{IngestError, IngestReport, TranscriptParser};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError};

#[cfg(feature = "native")]
pub use export::{ExportError, ExportFormat};
