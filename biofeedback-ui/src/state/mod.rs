//! State Management
//!
//! Global application state shared through context.

pub mod global;

pub use global::{auth_mode, provide_global_state, use_global_state};
