//! Latest Entry Chart Component
//!
//! Bar per metric for the most recent entry. Clicking a bar opens that
//! metric's notes.

use biofeedback::render::format_score;
use biofeedback::series::display_name;
use biofeedback::{ChartData, ChartOptions};
use leptos::*;

use super::{NoData, NotesModal};
use crate::state::use_global_state;

/// Bar chart of the latest entry's scores
#[component]
pub fn LatestChart() -> impl IntoView {
    let state = use_global_state();
    let opts = ChartOptions::default();

    let chart = create_memo(move |_| state.session.with(|s| s.chart()));
    let open_metric = create_rw_signal(None::<String>);

    let latest_date = move || chart.with(|c| c.latest().map(|r| r.date));

    view! {
        <Show when=move || !chart.with(ChartData::is_empty) fallback=|| view! { <NoData /> }>
            <div class="space-y-3">
                <p class="text-sm text-gray-400">
                    {move || latest_date().map(|d| format!("Entry for {}", d)).unwrap_or_default()}
                </p>

                {move || chart.with(|c| {
                    c.latest_values()
                        .into_iter()
                        .enumerate()
                        .map(|(i, (metric, value))| {
                            let metric = metric.to_string();
                            let color = c.series.get(i).map(|s| s.color).unwrap_or("#8884d8");
                            view! {
                                <MetricBar
                                    metric=metric.clone()
                                    value=value
                                    color=color
                                    opts=opts
                                    on_click=move |_| open_metric.set(Some(metric.clone()))
                                />
                            }
                        })
                        .collect::<Vec<_>>()
                })}
            </div>

            {move || open_metric.get().zip(latest_date()).map(|(metric, date)| view! {
                <NotesModal
                    date=date
                    metric=Some(metric)
                    on_close=move |_| open_metric.set(None)
                />
            })}
        </Show>
    }
}

#[component]
fn MetricBar<F>(
    metric: String,
    value: Option<f64>,
    color: &'static str,
    opts: ChartOptions,
    on_click: F,
) -> impl IntoView
where
    F: Fn(leptos::ev::MouseEvent) + 'static,
{
    let span = (opts.y_max - opts.y_min).max(f64::EPSILON);
    let percent = value
        .map(|v| ((v.clamp(opts.y_min, opts.y_max) - opts.y_min) / span) * 100.0)
        .unwrap_or(0.0);
    let label = value.map(format_score).unwrap_or_else(|| "N/A".into());

    view! {
        <button
            on:click=on_click
            class="w-full flex items-center space-x-3 text-left hover:bg-gray-700/50 rounded px-2 py-1"
        >
            <span class="w-40 text-sm text-gray-300 truncate">{display_name(&metric)}</span>
            <div class="flex-1 h-4 bg-gray-700 rounded">
                <div
                    class="h-4 rounded"
                    style=format!("width: {:.1}%; background-color: {}", percent, color)
                />
            </div>
            <span class="w-12 text-right text-sm text-white">{label}</span>
        </button>
    }
}
