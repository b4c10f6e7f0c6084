use super::*;
use axum::body::{Body, to_bytes};
use axum::http::Request;
use tower::ServiceExt;

use crate::config::DashboardConfig;
use crate::data::{DataContext, DataLoadError};
use crate::routes::app;

fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
    Table::new(
        headers.iter().map(|h| (*h).to_owned()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|c| (*c).to_owned()).collect())
            .collect(),
    )
}

fn loaded_state() -> AppState {
    let ctx = DataContext::from_tables(
        table(
            &["Company", "sentiment", "Headline"],
            &[
                &["Reliance Industries", "0.10", "Retail arm expands"],
                &["Reliance Industries", "-0.20", "Refining margins <slip>"],
                &["Infosys", "0.50", "Large deal win"],
            ],
        ),
        table(&["Company", "avg_sentiment"], &[&["Infosys", "0.50"]]),
    )
    .unwrap();
    AppState::new(ctx, DashboardConfig::default())
}

fn failed_state() -> AppState {
    let err = DataLoadError::Io {
        path: "sentiment_analysis_results.csv".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
    };
    AppState::new(DataContext::failed(&err), DashboardConfig::default())
}

async fn get(state: AppState, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

// =============================================================================
// GET /
// =============================================================================

#[tokio::test]
async fn index_renders_filters_metrics_and_table() {
    let (status, headers, body) = get(loaded_state(), "/?company=Reliance+Industries&min_sentiment=0").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert!(body.contains("Nifty 50 News Sentiment Analysis Dashboard"));
    assert!(body.contains(r#"<option value="Reliance Industries" selected>"#));
    assert!(body.contains("Sentiment Details for Reliance Industries"));
    assert!(body.contains("Retail arm expands"));
    assert!(body.contains("View All Articles (Full Data)"));
    assert!(body.contains("<svg"));
    assert!(body.contains("Download Filtered Data as CSV"));
}

#[tokio::test]
async fn index_escapes_cell_text() {
    let (_, _, body) = get(loaded_state(), "/?company=Reliance+Industries").await;
    assert!(body.contains("Refining margins &lt;slip&gt;"));
    assert!(!body.contains("<slip>"));
}

#[tokio::test]
async fn index_empty_filter_shows_message_instead_of_chart() {
    let (status, _, body) = get(loaded_state(), "/?company=Infosys&min_sentiment=0.5").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Large deal win"));

    let (_, _, body) = get(loaded_state(), "/?company=Reliance+Industries&min_sentiment=0.5").await;
    assert!(body.contains(crate::view::EMPTY_FILTER_MESSAGE));
    assert!(body.contains("N/A"));
    assert!(!body.contains("<svg"));
}

#[tokio::test]
async fn index_missing_data_renders_error_state_not_a_crash() {
    let (status, _, body) = get(failed_state(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Error loading data:"));
    assert!(body.contains("Required data not found or columns missing."));
    assert!(!body.contains("Interactive Filters"));
}

#[tokio::test]
async fn index_ignores_garbage_query_values() {
    let (status, _, body) = get(loaded_state(), "/?company=Nobody&min_sentiment=lots&show_all=maybe").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<option value="Reliance Industries" selected>"#));
}

// =============================================================================
// GET /export.csv
// =============================================================================

#[tokio::test]
async fn export_downloads_filtered_rows() {
    let (status, headers, body) = get(loaded_state(), "/export.csv?company=Reliance+Industries&min_sentiment=-1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[CONTENT_TYPE], "text/csv; charset=utf-8");
    assert_eq!(headers[CONTENT_DISPOSITION], "attachment; filename=\"Reliance Industries_sentiment.csv\"");
    assert_eq!(
        body,
        "Company,sentiment,Headline\n\
         Reliance Industries,0.10,Retail arm expands\n\
         Reliance Industries,-0.20,Refining margins <slip>\n"
    );
}

#[tokio::test]
async fn export_applies_threshold() {
    let (_, _, body) = get(loaded_state(), "/export.csv?company=Reliance+Industries&min_sentiment=0").await;
    assert_eq!(body.lines().count(), 2);
}

#[tokio::test]
async fn export_without_data_is_unavailable() {
    let (status, _, _) = get(failed_state(), "/export.csv?company=A").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// GET /api/view, /healthz
// =============================================================================

#[tokio::test]
async fn view_json_mirrors_page_model() {
    let (status, _, body) = get(loaded_state(), "/api/view?company=Infosys").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["body"]["state"], "ready");
    assert_eq!(json["body"]["selected_company"], "Infosys");
    assert_eq!(json["body"]["metrics"]["filtered_articles"], 1);
    assert_eq!(json["body"]["export"]["filename"], "Infosys_sentiment.csv");
}

#[tokio::test]
async fn view_json_reports_load_error() {
    let (_, _, body) = get(failed_state(), "/api/view").await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["body"]["state"], "unavailable");
    assert!(json["load_error"].as_str().unwrap().starts_with("Error loading data:"));
}

#[tokio::test]
async fn healthz_is_ok() {
    let (status, _, _) = get(loaded_state(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
}

#[test]
fn page_model_splits_chart_panel() {
    let state = loaded_state();
    let view = render_dashboard(&state.data, &state.config, &FilterQuery::default());
    let page = DashboardPage::new(&view);
    assert!(page.ready.is_some());
    assert!(page.chart.is_some());
    assert!(page.chart_message.is_none());
    assert!(page.top_table.is_some());
    assert!(page.missing_columns.is_empty());
}
