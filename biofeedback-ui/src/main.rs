//! Biofeedback Dashboard
//!
//! Browser frontend for the biofeedback tracker, built with Leptos (WASM).
//!
//! # Features
//!
//! - Trend chart, latest-entry bars and summary tiles
//! - Metric explorer with date range and per-date notes
//! - Gated JSON entry form
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! Fetch and submit state lives in the shared `biofeedback::Session`; this
//! crate only supplies the browser fetch layer and the views.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
