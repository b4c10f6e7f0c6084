//! Bar chart geometry for the filtered articles.
//!
//! Layout is computed here in SVG user units so the template only emits
//! elements. Bars grow up from the zero line for positive sentiment and down
//! for negative sentiment.

use serde::Serialize;

use super::color::diverging_color;
use crate::config::ChartAxis;
use crate::data::ArticleRecord;
use crate::filter::FilteredView;

pub const CHART_WIDTH: f64 = 960.0;
pub const CHART_HEIGHT: f64 = 380.0;

const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 110.0;
const BAR_FILL: f64 = 0.8;
const TICK_COUNT: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Anchor for the rotated category label.
    pub label_x: f64,
    pub label_y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisTick {
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: f64,
    pub height: f64,
    pub plot_left: f64,
    pub plot_right: f64,
    pub zero_y: f64,
    pub bars: Vec<Bar>,
    pub ticks: Vec<AxisTick>,
}

/// Category label of a row for the configured axis.
fn category(record: &ArticleRecord, axis: ChartAxis) -> &str {
    match axis {
        ChartAxis::Company => &record.company,
        ChartAxis::Published => record.published.as_deref().unwrap_or(&record.company),
    }
}

/// Lay out one bar per row of a non-empty view.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bar_chart(view: &FilteredView<'_>, axis: ChartAxis, title: String) -> BarChart {
    let values: Vec<f64> = view.scored().map(|(_, s)| s).collect();
    let (mut lo, mut hi) = values.iter().fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if (hi - lo).abs() < f64::EPSILON {
        lo = -1.0;
        hi = 1.0;
    }

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let y_of = |v: f64| MARGIN_TOP + (hi - v) / (hi - lo) * plot_height;
    let zero_y = y_of(0.0);

    let slot = plot_width / values.len().max(1) as f64;
    let bars = view
        .scored()
        .enumerate()
        .map(|(i, (record, sentiment))| {
            let top = y_of(sentiment);
            let x = MARGIN_LEFT + i as f64 * slot + slot * (1.0 - BAR_FILL) / 2.0;
            let width = slot * BAR_FILL;
            Bar {
                label: category(record, axis).to_owned(),
                value: sentiment,
                color: diverging_color(sentiment),
                x,
                y: top.min(zero_y),
                width,
                height: (top - zero_y).abs(),
                label_x: x + width / 2.0,
                label_y: MARGIN_TOP + plot_height + 14.0,
            }
        })
        .collect();

    let ticks = (0..TICK_COUNT)
        .map(|i| {
            let v = lo + (hi - lo) * i as f64 / (TICK_COUNT - 1) as f64;
            AxisTick { y: y_of(v), label: format!("{v:.2}") }
        })
        .collect();

    let x_label = match axis {
        ChartAxis::Company => "Company",
        ChartAxis::Published => "Published",
    };

    BarChart {
        title,
        x_label: x_label.to_owned(),
        y_label: "Sentiment Score".to_owned(),
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        plot_left: MARGIN_LEFT,
        plot_right: CHART_WIDTH - MARGIN_RIGHT,
        zero_y,
        bars,
        ticks,
    }
}

#[cfg(test)]
#[path = "chart_test.rs"]
mod tests;
