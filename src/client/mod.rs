//! Biofeedback API Client
//!
//! The tracker never stores anything itself; it talks to the external API:
//!
//! - `GET /biofeedback[?start_date=..&end_date=..]` - list entries
//! - `POST /biofeedback` - submit one entry
//! - `POST /token` - exchange credentials for a bearer token
//!
//! [`BiofeedbackApi`] is the seam the session controller drives. The reqwest
//! implementation lives in [`http`] and is only built with the `native`
//! feature; the web dashboard brings its own fetch layer.

#[cfg(feature = "native")]
mod http;

#[cfg(feature = "native")]
pub use http::HttpClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::model::{BiofeedbackEntry, DateRange};

/// Read/append access to the biofeedback store
#[async_trait]
pub trait BiofeedbackApi: Send + Sync {
    /// Fetch every entry inside `range`, in server order
    async fn fetch_entries(&self, range: &DateRange) -> Result<Vec<BiofeedbackEntry>, ClientError>;

    /// Submit one entry body exactly as the user wrote it
    async fn submit_entry(&self, entry: &Value) -> Result<(), ClientError>;
}

/// Errors that can occur when talking to the API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Parse error: {0}")]
    Decode(String),

    #[error("Unauthorized")]
    Unauthorized,
}

impl ClientError {
    /// Build from a non-success status and response body
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => ClientError::Unauthorized,
            _ => ClientError::Status {
                status,
                message: message.into(),
            },
        }
    }

    /// True for credential rejections
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}
