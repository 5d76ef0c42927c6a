//! Browser API layer

pub mod client;

pub use client::{
    fetch_entries, get_api_base, issue_token, set_api_base, submit_entry,
    DEFAULT_API_BASE,
};
