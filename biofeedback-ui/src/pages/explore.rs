//! Explore Page
//!
//! Single-metric trend with a per-date details list. Any date opens its notes.

use biofeedback::render::format_score;
use biofeedback::series::{display_name, metric_names, sort_chronologically};
use chrono::NaiveDate;
use leptos::*;

use crate::components::{DateRangePicker, Loading, NoData, NotesModal, TrendChart};
use crate::state::use_global_state;

const SHOW_ALL: &str = "";

/// Metric explorer page
#[component]
pub fn Explore() -> impl IntoView {
    let state = use_global_state();

    let metrics = create_memo(move |_| state.session.with(|s| metric_names(s.entries())));
    let selected = create_memo(move |_| {
        state.session.with(|s| s.selected_metric().map(str::to_string))
    });
    let open_date = create_rw_signal(None::<NaiveDate>);

    let on_select = move |ev: ev::Event| {
        let value = event_target_value(&ev);
        let metric = (value != SHOW_ALL).then_some(value);
        state.session.update(|s| s.select_metric(metric));
    };

    view! {
        <div class="space-y-8">
            <div class="flex flex-wrap items-end justify-between gap-4">
                <div>
                    <h1 class="text-3xl font-bold">"Explore"</h1>
                    <p class="text-gray-400 mt-1">"Drill into one metric"</p>
                </div>
                <DateRangePicker />
            </div>

            <div>
                <label class="block text-sm text-gray-400 mb-2">"Metric"</label>
                <select
                    on:change=on_select
                    prop:value=move || selected.get().unwrap_or_default()
                    class="bg-gray-700 rounded-lg px-4 py-3 text-white border border-gray-600
                           focus:border-primary-500 focus:outline-none"
                >
                    <option value=SHOW_ALL>"Show All"</option>
                    {move || metrics.get()
                        .into_iter()
                        .map(|m| view! { <option value=m.clone()>{display_name(&m)}</option> })
                        .collect_view()}
                </select>
            </div>

            <section class="bg-gray-800 rounded-xl p-6">
                {move || if state.session.with(|s| s.is_loading()) {
                    view! { <Loading /> }.into_view()
                } else {
                    view! { <TrendChart /> }.into_view()
                }}
            </section>

            {move || selected.get().map(|metric| view! {
                <MetricDetails metric=metric on_open=move |date| open_date.set(Some(date)) />
            })}

            {move || open_date.get().map(|date| view! {
                <NotesModal
                    date=date
                    metric=selected.get_untracked()
                    on_close=move |_| open_date.set(None)
                />
            })}
        </div>
    }
}

/// Date and score for every entry, oldest first
#[component]
fn MetricDetails(
    metric: String,
    #[prop(into)]
    on_open: Callback<NaiveDate>,
) -> impl IntoView {
    let state = use_global_state();
    let title = format!("{} Details", display_name(&metric));

    let rows = move || {
        state.session.with(|s| {
            sort_chronologically(s.entries())
                .into_iter()
                .map(|entry| {
                    let date = entry.date;
                    let score = entry
                        .metric_score(&metric)
                        .map(format_score)
                        .unwrap_or_else(|| "N/A".to_string());
                    view! {
                        <li>
                            <button
                                class="w-full flex justify-between px-3 py-2 rounded hover:bg-gray-700"
                                on:click=move |_| on_open.call(date)
                            >
                                <span class="text-gray-300">{date.to_string()}</span>
                                <span class="text-white font-medium">{score}</span>
                            </button>
                        </li>
                    }
                })
                .collect::<Vec<_>>()
        })
    };

    let empty = move || state.session.with(|s| s.entries().is_empty());

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">{title}</h2>
            <Show when=move || !empty() fallback=|| view! { <NoData /> }>
                <ul class="divide-y divide-gray-700">{rows.clone()}</ul>
            </Show>
        </section>
    }
}
