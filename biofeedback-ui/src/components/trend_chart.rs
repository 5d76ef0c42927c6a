//! Trend Chart Component
//!
//! One line per metric over the entry dates, drawn on an HTML5 canvas.
//! Missing values are skipped and the line joins the points either side.

use biofeedback::{ChartData, ChartOptions};
use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::NoData;
use crate::state::use_global_state;

/// Trend line chart for the current entries
#[component]
pub fn TrendChart() -> impl IntoView {
    let state = use_global_state();
    let canvas_ref = create_node_ref::<html::Canvas>();

    let chart = create_memo(move |_| state.session.with(|s| s.chart()));
    let selected = create_memo(move |_| {
        state.session.with(|s| s.selected_metric().map(str::to_string))
    });

    create_effect(move |_| {
        let chart = chart.get();
        let selected = selected.get();

        if let Some(canvas) = canvas_ref.get() {
            draw_trend(&canvas, &chart, selected.as_deref(), &ChartOptions::default());
        }
    });

    view! {
        <Show when=move || !chart.with(ChartData::is_empty) fallback=|| view! { <NoData /> }>
            <div class="relative">
                <canvas
                    node_ref=canvas_ref
                    width="800"
                    height="400"
                    class="w-full h-64 md:h-96 rounded-lg"
                />
                <TrendLegend chart=chart selected=selected />
            </div>
        </Show>
    }
}

/// Legend with each series' color and name
#[component]
fn TrendLegend(chart: Memo<ChartData>, selected: Memo<Option<String>>) -> impl IntoView {
    view! {
        <div class="flex justify-center flex-wrap gap-4 mt-4">
            {move || {
                let selected = selected.get();
                chart.with(|c| {
                    c.series
                        .iter()
                        .filter(|s| is_visible(&s.metric, selected.as_deref()))
                        .map(|s| view! {
                            <div class="flex items-center space-x-2">
                                <div
                                    class="w-3 h-3 rounded-full"
                                    style=format!("background-color: {}", s.color)
                                />
                                <span class="text-sm text-gray-300">{s.display_name()}</span>
                            </div>
                        })
                        .collect::<Vec<_>>()
                })
            }}
        </div>
    }
}

fn is_visible(metric: &str, selected: Option<&str>) -> bool {
    selected.map_or(true, |s| s == metric)
}

fn draw_trend(
    canvas: &HtmlCanvasElement,
    chart: &ChartData,
    selected: Option<&str>,
    opts: &ChartOptions,
) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    let margin_left = 40.0;
    let margin_right = 20.0;
    let margin_top = 20.0;
    let margin_bottom = 40.0;

    let plot_width = width - margin_left - margin_right;
    let plot_height = height - margin_top - margin_bottom;

    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, height);

    let y_span = (opts.y_max - opts.y_min).max(f64::EPSILON);
    let y_of = |value: f64| {
        let clamped = value.clamp(opts.y_min, opts.y_max);
        margin_top + ((opts.y_max - clamped) / y_span) * plot_height
    };

    // One x slot per entry, evenly spaced
    let slots = chart.rows.len();
    let x_of = |i: usize| {
        if slots <= 1 {
            margin_left + plot_width / 2.0
        } else {
            margin_left + (i as f64 / (slots - 1) as f64) * plot_width
        }
    };

    // Grid at each whole score
    ctx.set_stroke_style(&"#374151".into()); // gray-700
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");

    let steps = y_span.round().max(1.0) as usize;
    for i in 0..=steps {
        let value = opts.y_min + (i as f64 / steps as f64) * y_span;
        let y = y_of(value);
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        let _ = ctx.fill_text(&format!("{}", value), 10.0, y + 4.0);
    }

    for (m, series) in chart.series.iter().enumerate() {
        if !is_visible(&series.metric, selected) {
            continue;
        }

        let points: Vec<(f64, f64)> = chart
            .rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| row.values[m].map(|v| (x_of(i), y_of(v))))
            .collect();

        if points.is_empty() {
            continue;
        }

        ctx.set_stroke_style(&series.color.into());
        ctx.set_line_width(2.0);
        ctx.begin_path();
        for (i, (x, y)) in points.iter().enumerate() {
            if i == 0 {
                ctx.move_to(*x, *y);
            } else {
                ctx.line_to(*x, *y);
            }
        }
        ctx.stroke();

        ctx.set_fill_style(&series.color.into());
        for (x, y) in &points {
            ctx.begin_path();
            let _ = ctx.arc(*x, *y, 3.0, 0.0, std::f64::consts::PI * 2.0);
            ctx.fill();
        }
    }

    // Date labels, at most six
    ctx.set_fill_style(&"#9ca3af".into());
    let stride = (slots / 6).max(1);
    for (i, row) in chart.rows.iter().enumerate().step_by(stride) {
        let label = row.date.format("%m/%d").to_string();
        let _ = ctx.fill_text(&label, x_of(i) - 15.0, height - 10.0);
    }
}
