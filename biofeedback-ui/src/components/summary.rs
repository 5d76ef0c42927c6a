//! Summary Tiles Component
//!
//! One tile per metric with the latest value.

use biofeedback::ChartData;
use biofeedback::series::display_name;
use leptos::*;

use super::NoData;
use crate::state::use_global_state;

/// Grid of latest-value tiles
#[component]
pub fn SummaryTiles() -> impl IntoView {
    let state = use_global_state();
    let chart = create_memo(move |_| state.session.with(|s| s.chart()));

    view! {
        <Show when=move || !chart.with(ChartData::is_empty) fallback=|| view! { <NoData /> }>
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                {move || chart.with(|c| {
                    c.latest_values()
                        .into_iter()
                        .map(|(metric, value)| view! {
                            <Tile name=display_name(metric) value=value />
                        })
                        .collect::<Vec<_>>()
                })}
            </div>
        </Show>
    }
}

#[component]
fn Tile(name: String, value: Option<f64>) -> impl IntoView {
    let shown = value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "N/A".to_string());

    view! {
        <div class="bg-gray-800 rounded-xl p-4 border border-gray-700">
            <p class="text-sm text-gray-400 mb-1">{name}</p>
            <p class="text-2xl font-bold text-white">{shown}</p>
        </div>
    }
}
