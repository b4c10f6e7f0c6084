//! Render model for the dashboard page.
//!
//! DESIGN
//! ======
//! `render_dashboard` is a pure function of the loaded data, the config and
//! the filter query. Every request recomputes the whole model; nothing is
//! cached between interactions. The HTML template, the JSON endpoint and the
//! tests all consume the same `DashboardView`.

pub mod chart;
pub mod color;
pub mod export;

use serde::Serialize;

use crate::config::{ChartAxis, DashboardConfig, PositiveMetric};
use crate::data::{ArticleTable, DataContext, SchemaError, Table};
use crate::filter::{FilterParams, FilterQuery, FilteredView, THRESHOLD_STEP, filter_articles};
use chart::BarChart;

pub const EMPTY_FILTER_MESSAGE: &str = "No articles match your filters.";
pub const MISSING_TOP_COMPANIES_MESSAGE: &str = "Top 5 companies data not available.";
pub const TOP_COMPANIES_NOTE: &str =
    "These companies were selected based on positive sentiment scores and news coverage.";

// =============================================================================
// METRICS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub filtered_articles: usize,
    /// `None` when the positive-article metric is hidden.
    pub positive_articles: Option<usize>,
    /// `None` for an empty view.
    pub average_sentiment: Option<f64>,
}

impl Metrics {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(view: &FilteredView<'_>, positive: PositiveMetric) -> Self {
        let positive_articles = match positive {
            PositiveMetric::Hidden => None,
            PositiveMetric::Above(cutoff) => Some(view.scored().filter(|&(_, s)| s > cutoff).count()),
        };
        let average_sentiment = if view.is_empty() {
            None
        } else {
            Some(view.scored().map(|(_, s)| s).sum::<f64>() / view.len() as f64)
        };
        Self { filtered_articles: view.len(), positive_articles, average_sentiment }
    }

    /// Mean to three decimals, or `N/A`.
    #[must_use]
    pub fn average_display(&self) -> String {
        self.average_sentiment.map_or_else(|| "N/A".to_owned(), |mean| format!("{mean:.3}"))
    }

    /// Display cards in page order.
    #[must_use]
    pub fn cards(&self) -> Vec<MetricCard> {
        let mut cards = vec![MetricCard::new("📰 Filtered Articles", self.filtered_articles.to_string())];
        if let Some(positive) = self.positive_articles {
            cards.push(MetricCard::new("✅ Positive Articles", positive.to_string()));
        }
        cards.push(MetricCard::new("📈 Average Sentiment", self.average_display()));
        cards
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

impl MetricCard {
    fn new(label: &str, value: String) -> Self {
        Self { label: label.to_owned(), value }
    }
}

// =============================================================================
// VIEW MODEL
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CompanyOption {
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThresholdControl {
    pub min: f64,
    pub max: f64,
    pub value: f64,
    /// `value` at the step's precision.
    pub label: String,
    pub step: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartPanel {
    Bars(BarChart),
    Empty { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    /// True when rows were cut to the preview length.
    pub truncated: bool,
    /// Whether the "show all rows" toggle is offered at all.
    pub toggle_available: bool,
    pub show_all: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportLink {
    pub filename: String,
    pub company: String,
    pub min_sentiment: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopCompaniesPanel {
    /// `None` when the top-5 table is empty.
    pub table: Option<Table>,
    pub message: String,
}

/// Everything shown once the article table is usable.
#[derive(Debug, Clone, Serialize)]
pub struct ReadyView {
    pub companies: Vec<CompanyOption>,
    pub selected_company: String,
    pub threshold: ThresholdControl,
    pub metrics: Metrics,
    pub metric_cards: Vec<MetricCard>,
    pub heading: String,
    pub chart: ChartPanel,
    pub table: TablePreview,
    pub export: ExportLink,
    pub top_companies: TopCompaniesPanel,
    pub all_articles: Table,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardBody {
    /// The article table is empty or lacks required columns.
    Unavailable { missing_columns: Vec<String> },
    Ready(Box<ReadyView>),
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub load_error: Option<String>,
    pub body: DashboardBody,
}

// =============================================================================
// RENDER
// =============================================================================

/// Build the full page model for one interaction.
#[must_use]
pub fn render_dashboard(ctx: &DataContext, config: &DashboardConfig, query: &FilterQuery) -> DashboardView {
    let body = match ctx.articles() {
        Ok(articles) => match FilterParams::resolve(articles, query) {
            Some(params) => DashboardBody::Ready(Box::new(render_ready(ctx, articles, config, &params, query.show_all()))),
            None => DashboardBody::Unavailable { missing_columns: Vec::new() },
        },
        Err(SchemaError::MissingColumns(columns)) => DashboardBody::Unavailable { missing_columns: columns.clone() },
        Err(_) => DashboardBody::Unavailable { missing_columns: Vec::new() },
    };

    DashboardView { title: config.title.clone(), load_error: ctx.load_error().map(str::to_owned), body }
}

fn render_ready(
    ctx: &DataContext,
    articles: &ArticleTable,
    config: &DashboardConfig,
    params: &FilterParams,
    show_all: bool,
) -> ReadyView {
    let view = filter_articles(articles, &params.company, params.threshold);
    let metrics = Metrics::compute(&view, config.positive_metric);

    let axis = match config.chart_axis {
        ChartAxis::Published if articles.has_published() => ChartAxis::Published,
        _ => ChartAxis::Company,
    };
    let chart = if view.is_empty() {
        ChartPanel::Empty { message: EMPTY_FILTER_MESSAGE.to_owned() }
    } else {
        ChartPanel::Bars(chart::bar_chart(&view, axis, format!("Sentiment Over Time for {}", params.company)))
    };

    let (min, max) = articles.sentiment_bounds().unwrap_or((params.threshold, params.threshold));
    let top = ctx.top_companies();

    ReadyView {
        companies: articles
            .companies()
            .into_iter()
            .map(|name| CompanyOption { selected: name == params.company, name })
            .collect(),
        selected_company: params.company.clone(),
        threshold: ThresholdControl {
            min,
            max,
            value: params.threshold,
            label: format!("{:.2}", params.threshold),
            step: THRESHOLD_STEP,
        },
        metric_cards: metrics.cards(),
        metrics,
        heading: format!("Sentiment Details for {} (Sentiment ≥ {:.2})", params.company, params.threshold),
        chart,
        table: table_preview(&view, config.preview_rows, show_all),
        export: ExportLink {
            filename: export::export_filename(&params.company),
            company: params.company.clone(),
            min_sentiment: params.threshold,
        },
        top_companies: if top.is_empty() {
            TopCompaniesPanel { table: None, message: MISSING_TOP_COMPANIES_MESSAGE.to_owned() }
        } else {
            TopCompaniesPanel { table: Some(top.clone()), message: TOP_COMPANIES_NOTE.to_owned() }
        },
        all_articles: articles.to_table(),
    }
}

fn table_preview(view: &FilteredView<'_>, preview_rows: Option<usize>, show_all: bool) -> TablePreview {
    let limit = match preview_rows {
        Some(n) if !show_all => n,
        _ => usize::MAX,
    };
    TablePreview {
        headers: view.headers().to_vec(),
        rows: view.rows().iter().take(limit).map(|r| r.cells.clone()).collect(),
        total_rows: view.len(),
        truncated: view.len() > limit,
        toggle_available: preview_rows.is_some(),
        show_all: show_all && preview_rows.is_some(),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
