//! Notes Modal Component
//!
//! Per-metric notes, additional notes and summary for the entries on a date.

use biofeedback::render::{entry_notes, NO_NOTES_MESSAGE};
use biofeedback::series::display_name;
use chrono::NaiveDate;
use leptos::*;

use crate::state::use_global_state;

/// Notes dialog for `date`, optionally focused on one metric
#[component]
pub fn NotesModal(
    date: NaiveDate,
    metric: Option<String>,
    #[prop(into)]
    on_close: Callback<()>,
) -> impl IntoView {
    let state = use_global_state();

    let body = move || {
        state.session.with(|s| {
            let on_day: Vec<_> = s.entries().iter().filter(|e| e.date == date).collect();
            if on_day.is_empty() {
                return view! { <p class="text-gray-400">{NO_NOTES_MESSAGE}</p> }.into_view();
            }

            on_day
                .into_iter()
                .map(|entry| {
                    let notes = entry_notes(entry, metric.as_deref());
                    let empty = notes.is_empty();

                    let metric_notes = notes
                        .metric_notes
                        .iter()
                        .map(|(m, text)| view! {
                            <div class="mb-3">
                                <h4 class="text-sm font-semibold text-gray-200">
                                    {format!("Notes for {}:", display_name(m))}
                                </h4>
                                <p class="text-sm text-gray-300">{text.to_string()}</p>
                            </div>
                        })
                        .collect::<Vec<_>>();

                    let additional = (!notes.additional.is_empty()).then(|| {
                        let items = notes
                            .additional
                            .iter()
                            .map(|n| view! { <li>{n.clone()}</li> })
                            .collect::<Vec<_>>();
                        view! {
                            <div class="mb-3">
                                <h4 class="text-sm font-semibold text-gray-200">"Additional Notes:"</h4>
                                <ul class="text-sm text-gray-300 space-y-1">{items}</ul>
                            </div>
                        }
                    });

                    let summary = (!entry.summary.is_empty()).then(|| view! {
                        <div class="pt-3 border-t border-gray-700">
                            <h4 class="text-sm font-semibold text-gray-200">"Summary:"</h4>
                            <p class="text-sm text-gray-300">{entry.summary.clone()}</p>
                        </div>
                    });

                    view! {
                        <div class="mb-4">
                            {metric_notes}
                            {additional}
                            {empty.then(|| view! { <p class="text-gray-400 mb-3">{NO_NOTES_MESSAGE}</p> })}
                            {summary}
                        </div>
                    }
                })
                .collect::<Vec<_>>()
                .into_view()
        })
    };

    view! {
        <div class="fixed inset-0 z-40 flex items-center justify-center bg-black/60">
            <div class="bg-gray-800 rounded-xl p-6 w-full max-w-lg max-h-[80vh] overflow-y-auto shadow-xl">
                <div class="flex items-center justify-between mb-4">
                    <h3 class="text-lg font-semibold text-white">{format!("Notes for {}", date)}</h3>
                    <button
                        class="text-gray-400 hover:text-white"
                        on:click=move |_| on_close.call(())
                    >
                        "✕"
                    </button>
                </div>
                {body}
            </div>
        </div>
    }
}
