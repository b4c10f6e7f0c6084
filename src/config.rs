//! Dashboard configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = ".";
pub const DEFAULT_ARTICLES_FILE: &str = "sentiment_analysis_results.csv";
pub const DEFAULT_TOP_COMPANIES_FILE: &str = "selected_5_companies.csv";
pub const DEFAULT_POSITIVE_CUTOFF: f64 = 0.05;
pub const DEFAULT_PREVIEW_ROWS: usize = 10;
pub const DEFAULT_TITLE: &str = "Nifty 50 News Sentiment Analysis Dashboard";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: expected {expected}")]
    Invalid { key: &'static str, value: String, expected: &'static str },
}

/// Whether the "positive articles" metric is shown, and its cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositiveMetric {
    Hidden,
    /// Count rows with sentiment strictly above the cutoff.
    Above(f64),
}

/// Category axis of the sentiment bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartAxis {
    Company,
    /// Publish date; rows without one fall back to their company.
    Published,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub articles_path: PathBuf,
    pub top_companies_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub port: u16,
    pub title: String,
    pub data: DataConfig,
    pub positive_metric: PositiveMetric,
    pub chart_axis: ChartAxis,
    /// Rows shown before "show all" is toggled; `None` always shows every row.
    pub preview_rows: Option<usize>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            port: DEFAULT_PORT,
            title: DEFAULT_TITLE.to_owned(),
            data: DataConfig {
                articles_path: data_dir.join(DEFAULT_ARTICLES_FILE),
                top_companies_path: data_dir.join(DEFAULT_TOP_COMPANIES_FILE),
            },
            positive_metric: PositiveMetric::Above(DEFAULT_POSITIVE_CUTOFF),
            chart_axis: ChartAxis::Company,
            preview_rows: Some(DEFAULT_PREVIEW_ROWS),
        }
    }
}

impl DashboardConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DASHBOARD_DATA_DIR`: directory holding both files, default `.`
    /// - `DASHBOARD_ARTICLES_FILE`: default `sentiment_analysis_results.csv`
    /// - `DASHBOARD_TOP_COMPANIES_FILE`: default `selected_5_companies.csv`
    /// - `DASHBOARD_POSITIVE_METRIC`: `on` (default) or `off`
    /// - `DASHBOARD_POSITIVE_CUTOFF`: default 0.05
    /// - `DASHBOARD_CHART_AXIS`: `company` (default) or `published`
    /// - `DASHBOARD_PREVIEW_ROWS`: default 10, `0` disables the preview
    /// - `DASHBOARD_TITLE`: page heading
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for any value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Same as `from_env`, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for any value that does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|raw| raw.trim().to_owned()).filter(|raw| !raw.is_empty());

        let port = match var("PORT") {
            Some(raw) => parse_value("PORT", &raw, "a port number")?,
            None => defaults.port,
        };

        let data_dir = var("DASHBOARD_DATA_DIR").map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let articles_file = var("DASHBOARD_ARTICLES_FILE").unwrap_or_else(|| DEFAULT_ARTICLES_FILE.to_owned());
        let top_file = var("DASHBOARD_TOP_COMPANIES_FILE").unwrap_or_else(|| DEFAULT_TOP_COMPANIES_FILE.to_owned());

        let show_positive = match var("DASHBOARD_POSITIVE_METRIC") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| invalid("DASHBOARD_POSITIVE_METRIC", &raw, "on or off"))?,
            None => true,
        };
        let cutoff = match var("DASHBOARD_POSITIVE_CUTOFF") {
            Some(raw) => parse_finite("DASHBOARD_POSITIVE_CUTOFF", &raw)?,
            None => DEFAULT_POSITIVE_CUTOFF,
        };
        let positive_metric = if show_positive { PositiveMetric::Above(cutoff) } else { PositiveMetric::Hidden };

        let chart_axis = match var("DASHBOARD_CHART_AXIS") {
            Some(raw) => parse_chart_axis(&raw)?,
            None => defaults.chart_axis,
        };

        let preview_rows = match var("DASHBOARD_PREVIEW_ROWS") {
            Some(raw) => match parse_value::<usize>("DASHBOARD_PREVIEW_ROWS", &raw, "a row count")? {
                0 => None,
                n => Some(n),
            },
            None => defaults.preview_rows,
        };

        Ok(Self {
            port,
            title: var("DASHBOARD_TITLE").unwrap_or(defaults.title),
            data: DataConfig { articles_path: data_dir.join(articles_file), top_companies_path: data_dir.join(top_file) },
            positive_metric,
            chart_axis,
            preview_rows,
        })
    }
}

fn invalid(key: &'static str, raw: &str, expected: &'static str) -> ConfigError {
    ConfigError::Invalid { key, value: raw.to_owned(), expected }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str, expected: &'static str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| invalid(key, raw, expected))
}

fn parse_finite(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid(key, raw, "a finite number")),
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_chart_axis(raw: &str) -> Result<ChartAxis, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "company" => Ok(ChartAxis::Company),
        "published" => Ok(ChartAxis::Published),
        _ => Err(invalid("DASHBOARD_CHART_AXIS", raw, "company or published")),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
