//! Loading Component
//!
//! Spinner and the empty state.

use biofeedback::NO_DATA_MESSAGE;
use leptos::*;

/// Full-width loading spinner
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="loading-spinner w-8 h-8" />
        </div>
    }
}

/// Shown by every view when there are no entries
#[component]
pub fn NoData() -> impl IntoView {
    view! {
        <div class="h-64 flex items-center justify-center text-gray-400">
            {NO_DATA_MESSAGE}
        </div>
    }
}
