//! Toast Notification Component
//!
//! Shows the session's submit notice and the last fetch error.

use biofeedback::Notice;
use leptos::*;

use crate::state::use_global_state;

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_global_state();

    view! {
        <div class="fixed bottom-20 right-4 z-50 space-y-2">
            {move || {
                state.session.with(|s| s.notice().cloned()).map(|notice| {
                    let variant = match notice {
                        Notice::Success(_) => ToastVariant::Success,
                        Notice::Error(_) => ToastVariant::Error,
                    };
                    view! { <ToastMessage message=notice.text().to_string() variant=variant /> }
                })
            }}

            {move || {
                state.session.with(|s| s.error().map(str::to_string)).map(|msg| view! {
                    <ToastMessage message=msg variant=ToastVariant::Error />
                })
            }}
        </div>
    }
}

#[derive(Clone, Copy)]
enum ToastVariant {
    Success,
    Error,
}

#[component]
fn ToastMessage(
    #[prop(into)]
    message: String,
    variant: ToastVariant,
) -> impl IntoView {
    let (icon, bg_class) = match variant {
        ToastVariant::Success => ("✓", "bg-green-600"),
        ToastVariant::Error => ("✕", "bg-red-600"),
    };

    view! {
        <div class=format!(
            "flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg \
             transform transition-all duration-300 ease-out animate-slide-in",
            bg_class
        )>
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium">{message}</span>
        </div>
    }
}
