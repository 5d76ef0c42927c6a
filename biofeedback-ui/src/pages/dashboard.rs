//! Dashboard Page
//!
//! Trend, latest-entry and summary views behind a tab bar.

use biofeedback::Tab;
use leptos::*;

use crate::components::{DateRangePicker, LatestChart, Loading, SummaryTiles, TrendChart};
use crate::state::use_global_state;

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_global_state();
    let tab = create_memo(move |_| state.session.with(|s| s.tab()));
    let loading = create_memo(move |_| state.session.with(|s| s.is_loading()));

    view! {
        <div class="space-y-8">
            <div class="flex flex-wrap items-end justify-between gap-4">
                <div>
                    <h1 class="text-3xl font-bold">"Biofeedback Dashboard"</h1>
                    <p class="text-gray-400 mt-1">"Daily self-reported scores"</p>
                </div>
                <DateRangePicker />
            </div>

            <div class="flex space-x-2">
                {Tab::ALL
                    .into_iter()
                    .map(|t| view! { <TabButton tab=t current=tab /> })
                    .collect_view()}
            </div>

            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">{move || tab.get().label()}</h2>
                {move || {
                    if loading.get() {
                        return view! { <Loading /> }.into_view();
                    }
                    match tab.get() {
                        Tab::Trend => view! { <TrendChart /> }.into_view(),
                        Tab::Latest => view! { <LatestChart /> }.into_view(),
                        Tab::Summary => view! { <SummaryTiles /> }.into_view(),
                    }
                }}
            </section>
        </div>
    }
}

#[component]
fn TabButton(tab: Tab, current: Memo<Tab>) -> impl IntoView {
    let state = use_global_state();

    view! {
        <button
            type="button"
            on:click=move |_| state.session.update(|s| s.set_tab(tab))
            class=move || {
                let base = "px-4 py-2 rounded-lg text-sm font-medium transition-colors";
                if current.get() == tab {
                    format!("{} bg-primary-600 text-white", base)
                } else {
                    format!("{} bg-gray-700 text-gray-300 hover:bg-gray-600", base)
                }
            }
        >
            {tab.label()}
        </button>
    }
}
