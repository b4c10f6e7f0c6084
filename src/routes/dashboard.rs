//! Dashboard page, CSV export and JSON view routes.

use askama::Template;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{Html, IntoResponse, Json, Response};

use crate::data::Table;
use crate::filter::{FilterParams, FilterQuery, filter_articles};
use crate::state::AppState;
use crate::view::chart::BarChart;
use crate::view::export::{content_disposition, export_csv, export_filename};
use crate::view::{ChartPanel, DashboardBody, DashboardView, ReadyView, render_dashboard};

/// Render a template into an HTML response, or a 500 on template failure.
fn render_template<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Template error: {e}")).into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage<'a> {
    title: &'a str,
    load_error: Option<&'a str>,
    ready: Option<&'a ReadyView>,
    missing_columns: String,
    chart: Option<&'a BarChart>,
    chart_message: Option<&'a str>,
    top_table: Option<&'a Table>,
}

impl<'a> DashboardPage<'a> {
    fn new(view: &'a DashboardView) -> Self {
        let (ready, missing_columns) = match &view.body {
            DashboardBody::Ready(ready) => (Some(&**ready), String::new()),
            DashboardBody::Unavailable { missing_columns } => (None, missing_columns.join(", ")),
        };
        let (chart, chart_message) = match ready.map(|r| &r.chart) {
            Some(ChartPanel::Bars(chart)) => (Some(chart), None),
            Some(ChartPanel::Empty { message }) => (None, Some(message.as_str())),
            None => (None, None),
        };
        Self {
            title: &view.title,
            load_error: view.load_error.as_deref(),
            ready,
            missing_columns,
            chart,
            chart_message,
            top_table: ready.and_then(|r| r.top_companies.table.as_ref()),
        }
    }
}

/// `GET /`: the dashboard for the current filter query.
pub async fn index(State(state): State<AppState>, Query(query): Query<FilterQuery>) -> Response {
    let view = render_dashboard(&state.data, &state.config, &query);
    render_template(&DashboardPage::new(&view))
}

/// `GET /api/view`: the same page model as JSON.
pub async fn view_json(State(state): State<AppState>, Query(query): Query<FilterQuery>) -> Json<DashboardView> {
    Json(render_dashboard(&state.data, &state.config, &query))
}

/// `GET /export.csv`: download the filtered rows.
pub async fn export(State(state): State<AppState>, Query(query): Query<FilterQuery>) -> Result<Response, StatusCode> {
    let articles = state.data.articles().map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;
    let params = FilterParams::resolve(articles, &query).ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    let view = filter_articles(articles, &params.company, params.threshold);

    let body = export_csv(&view).map_err(|err| {
        tracing::error!(error = %err, company = %params.company, "csv export failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    tracing::info!(company = %params.company, threshold = params.threshold, rows = view.len(), "csv export");

    let filename = export_filename(&params.company);
    Ok((
        [(CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()), (CONTENT_DISPOSITION, content_disposition(&filename))],
        body,
    )
        .into_response())
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
