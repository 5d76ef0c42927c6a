//! Date Range Picker Component
//!
//! Start and end date inputs. Applying a valid range refetches.

use biofeedback::DateRange;
use leptos::*;

use crate::state::use_global_state;

/// Start/end date filter
#[component]
pub fn DateRangePicker() -> impl IntoView {
    let state = use_global_state();

    let initial = state.session.with_untracked(|s| s.range());
    let start = create_rw_signal(initial.start.map(|d| d.to_string()).unwrap_or_default());
    let end = create_rw_signal(initial.end.map(|d| d.to_string()).unwrap_or_default());
    let error = create_rw_signal(None::<String>);

    let apply = move |_| {
        let start = start.get_untracked();
        let end = end.get_untracked();
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());

        match DateRange::parse(non_empty(&start).as_deref(), non_empty(&end).as_deref()) {
            Ok(range) => {
                error.set(None);
                state.set_range(range);
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    let clear = move |_| {
        start.set(String::new());
        end.set(String::new());
        error.set(None);
        state.set_range(DateRange::all());
    };

    view! {
        <div class="flex flex-wrap items-end gap-3">
            <label class="flex flex-col text-sm text-gray-400">
                "Start Date"
                <input
                    type="date"
                    class="mt-1 bg-gray-700 text-white rounded px-3 py-2"
                    prop:value=start
                    on:input=move |ev| start.set(event_target_value(&ev))
                />
            </label>
            <label class="flex flex-col text-sm text-gray-400">
                "End Date"
                <input
                    type="date"
                    class="mt-1 bg-gray-700 text-white rounded px-3 py-2"
                    prop:value=end
                    on:input=move |ev| end.set(event_target_value(&ev))
                />
            </label>
            <button
                on:click=apply
                class="px-4 py-2 rounded-lg bg-primary-600 text-white text-sm font-medium hover:bg-primary-700"
            >
                "Apply"
            </button>
            <button
                on:click=clear
                class="px-4 py-2 rounded-lg bg-gray-700 text-gray-300 text-sm font-medium hover:bg-gray-600"
            >
                "All Dates"
            </button>
            {move || error.get().map(|e| view! { <span class="text-sm text-red-400">{e}</span> })}
        </div>
    }
}
