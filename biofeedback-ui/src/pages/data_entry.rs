//! Data Entry Page
//!
//! Gate, then a JSON entry form. Submitting refreshes the dashboard data.

use biofeedback::AuthMode;
use leptos::*;

use crate::state::{auth_mode, use_global_state};

const PLACEHOLDER: &str = r#"{
  "date": "2024-01-01",
  "metrics": {
    "mood": { "score": 4, "notes": "Calm all day" },
    "sleep_quality": 3
  },
  "additional_notes": ["- Walked after dinner"],
  "summary": "A steady day."
}"#;

/// Data entry page component
#[component]
pub fn DataEntry() -> impl IntoView {
    let state = use_global_state();
    let unlocked = create_memo(move |_| state.gate.with(|g| g.is_authenticated()));

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <h1 class="text-3xl font-bold">"Data Entry"</h1>
            <Show when=move || unlocked.get() fallback=|| view! { <GateForm /> }>
                <EntryForm />
            </Show>
        </div>
    }
}

/// Password or username/password form, depending on the build's gate mode
#[component]
fn GateForm() -> impl IntoView {
    let state = use_global_state();
    let mode = auth_mode();

    let username = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let input = password.get_untracked();

        match mode {
            AuthMode::Password => {
                if state.unlock_with_password(&input) {
                    password.set(String::new());
                }
            }
            AuthMode::Token => state.login(username.get_untracked(), input),
        }
    };

    view! {
        <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4">
            <p class="text-gray-400">"Enter the password to add entries."</p>

            {(mode == AuthMode::Token).then(|| view! {
                <input
                    type="text"
                    placeholder="Username"
                    autocomplete="username"
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                    prop:value=username
                    on:input=move |ev| username.set(event_target_value(&ev))
                />
            })}

            <input
                type="password"
                placeholder="Password"
                autocomplete="current-password"
                class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                       border border-gray-600 focus:border-primary-500 focus:outline-none"
                prop:value=password
                on:input=move |ev| password.set(event_target_value(&ev))
            />

            {move || state.gate.with(|g| g.message().map(str::to_string)).map(|msg| view! {
                <p class="text-sm text-red-400">{msg}</p>
            })}

            <button
                type="submit"
                disabled=move || state.logging_in.get()
                class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                       disabled:cursor-not-allowed rounded-lg py-3 font-semibold transition-colors"
            >
                {move || if state.logging_in.get() { "Checking..." } else { "Unlock" }}
            </button>
        </form>
    }
}

/// Raw JSON entry form
#[component]
fn EntryForm() -> impl IntoView {
    let state = use_global_state();
    let submitting = create_memo(move |_| state.session.with(|s| s.is_submitting()));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        state.submit();
    };

    view! {
        <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4">
            <label class="block text-sm text-gray-400">"Entry JSON"</label>
            <textarea
                rows="14"
                placeholder=PLACEHOLDER
                class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white font-mono text-sm
                       border border-gray-600 focus:border-primary-500 focus:outline-none"
                prop:value=move || state.session.with(|s| s.input().to_string())
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    state.session.update(|s| s.set_input(text));
                }
            />

            <button
                type="submit"
                disabled=move || submitting.get()
                class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                       disabled:cursor-not-allowed rounded-lg py-3 font-semibold
                       transition-colors flex items-center justify-center space-x-2"
            >
                {move || if submitting.get() {
                    view! {
                        <div class="loading-spinner w-5 h-5" />
                        <span>"Submitting..."</span>
                    }.into_view()
                } else {
                    view! { <span>"Submit"</span> }.into_view()
                }}
            </button>
        </form>
    }
}
