//! Settings Page
//!
//! API base URL, kept in local storage.

use leptos::*;

use crate::api;
use crate::state::use_global_state;

/// Settings page component
#[component]
pub fn Settings() -> impl IntoView {
    let state = use_global_state();
    let api_url = create_rw_signal(api::get_api_base());

    let save = move |_| {
        api::set_api_base(api_url.get_untracked().trim());
        api_url.set(api::get_api_base());
        state.refresh();
    };

    let reset = move |_| {
        api::set_api_base(api::DEFAULT_API_BASE);
        api_url.set(api::get_api_base());
        state.refresh();
    };

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Settings"</h1>
                <p class="text-gray-400 mt-1">"Where the dashboard reads and writes entries"</p>
            </div>

            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">"API Connection"</h2>
                <label class="block text-sm text-gray-400 mb-2">"Biofeedback API URL"</label>
                <div class="flex space-x-2">
                    <input
                        type="text"
                        prop:value=api_url
                        on:input=move |ev| api_url.set(event_target_value(&ev))
                        class="flex-1 bg-gray-700 rounded-lg px-4 py-3 text-white
                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                    />
                    <button
                        on:click=save
                        class="px-4 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium"
                    >
                        "Save & Reload"
                    </button>
                    <button
                        on:click=reset
                        class="px-4 py-3 bg-gray-700 hover:bg-gray-600 rounded-lg font-medium"
                    >
                        "Reset"
                    </button>
                </div>
            </section>
        </div>
    }
}
