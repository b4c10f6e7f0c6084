//! Loaded datasets.
//!
//! DESIGN
//! ======
//! Both input files are read once at start-up into a `DataContext` that is
//! never mutated afterwards. The article file is kept as its raw rows so
//! every column passes through to the table and the CSV export untouched;
//! the typed fields the filter needs (`Company`, `sentiment`, `Published`)
//! are extracted next to each raw row.
//!
//! ERROR HANDLING
//! ==============
//! A failed read or a sentiment cell holding text that is not a number never
//! reaches request handlers. `DataContext::load` downgrades it to empty tables plus a
//! user-visible message. A table without rows or without the required
//! columns is a valid state, reported through `SchemaError`. A blank
//! sentiment cell is a missing score, not a malformed file: the row is kept
//! for display and export of the full data but never passes the filter.

pub mod loader;

use std::collections::HashSet;

use serde::Serialize;

pub use loader::{DataLoadError, load_table};

use crate::config::DataConfig;

pub const COMPANY_COLUMN: &str = "Company";
pub const SENTIMENT_COLUMN: &str = "sentiment";
pub const PUBLISHED_COLUMN: &str = "Published";

// =============================================================================
// TABLE
// =============================================================================

/// A header row plus string cells, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header, matched exactly.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}

// =============================================================================
// ARTICLES
// =============================================================================

/// Why the article table cannot drive the dashboard.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("article table has no rows")]
    NoRows,
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("row {row}: sentiment value {value:?} is not a finite number")]
    InvalidSentiment { row: usize, value: String },
}

/// One analyzed news article.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub company: String,
    /// `Published` cell, when the column exists and the cell is not blank.
    pub published: Option<String>,
    /// `None` for a blank cell.
    pub sentiment: Option<f64>,
    /// The complete source row, aligned with `ArticleTable::headers`.
    pub cells: Vec<String>,
}

/// Article rows with the filter fields parsed out.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleTable {
    headers: Vec<String>,
    records: Vec<ArticleRecord>,
}

impl ArticleTable {
    /// Validate the schema and parse every sentiment cell.
    ///
    /// # Errors
    ///
    /// `NoRows` and `MissingColumns` describe a table the dashboard cannot
    /// filter. `InvalidSentiment` (1-based data row) marks a malformed file;
    /// blank cells are accepted as missing scores.
    pub fn from_table(table: Table) -> Result<Self, SchemaError> {
        let missing: Vec<String> = [COMPANY_COLUMN, SENTIMENT_COLUMN]
            .into_iter()
            .filter(|name| table.column_index(name).is_none())
            .map(str::to_owned)
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns(missing));
        }
        if table.is_empty() {
            return Err(SchemaError::NoRows);
        }

        let (Some(company_idx), Some(sentiment_idx)) =
            (table.column_index(COMPANY_COLUMN), table.column_index(SENTIMENT_COLUMN))
        else {
            return Err(SchemaError::MissingColumns(vec![COMPANY_COLUMN.into(), SENTIMENT_COLUMN.into()]));
        };
        let published_idx = table.column_index(PUBLISHED_COLUMN);

        let mut records = Vec::with_capacity(table.rows.len());
        for (i, cells) in table.rows.into_iter().enumerate() {
            let raw = cells.get(sentiment_idx).map_or("", String::as_str);
            let sentiment = parse_sentiment(raw).map_err(|()| SchemaError::InvalidSentiment {
                row: i + 1,
                value: raw.to_owned(),
            })?;
            let company = cells.get(company_idx).cloned().unwrap_or_default();
            let published = published_idx
                .and_then(|idx| cells.get(idx))
                .map(|cell| cell.trim())
                .filter(|cell| !cell.is_empty())
                .map(str::to_owned);
            records.push(ArticleRecord { company, published, sentiment, cells });
        }

        Ok(Self { headers: table.headers, records })
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    #[must_use]
    pub fn has_published(&self) -> bool {
        self.headers.iter().any(|header| header == PUBLISHED_COLUMN)
    }

    /// Distinct company values in order of first appearance.
    #[must_use]
    pub fn companies(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|record| seen.insert(record.company.as_str()))
            .map(|record| record.company.clone())
            .collect()
    }

    /// Observed `(min, max)` sentiment over scored rows, `None` when no row
    /// has a score.
    #[must_use]
    pub fn sentiment_bounds(&self) -> Option<(f64, f64)> {
        self.records.iter().filter_map(|record| record.sentiment).fold(None, |acc, s| match acc {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        })
    }

    /// The rows as a plain table, for full-data display.
    #[must_use]
    pub fn to_table(&self) -> Table {
        Table::new(self.headers.clone(), self.records.iter().map(|record| record.cells.clone()).collect())
    }
}

/// Blank is a missing score; anything else must be a finite number.
fn parse_sentiment(raw: &str) -> Result<Option<f64>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(()),
    }
}

// =============================================================================
// DATA CONTEXT
// =============================================================================

/// Immutable, once-loaded dashboard inputs.
#[derive(Debug, Clone)]
pub struct DataContext {
    articles: Result<ArticleTable, SchemaError>,
    top_companies: Table,
    load_error: Option<String>,
}

impl DataContext {
    /// Read both files. Never fails: a load error yields empty tables and a
    /// message for the page.
    #[must_use]
    pub fn load(config: &DataConfig) -> Self {
        match Self::try_load(config) {
            Ok(ctx) => {
                match &ctx.articles {
                    Ok(articles) => tracing::info!(
                        articles = articles.records().len(),
                        companies = articles.companies().len(),
                        top_companies = ctx.top_companies.rows.len(),
                        "datasets loaded"
                    ),
                    Err(issue) => tracing::warn!(%issue, "article table unusable"),
                }
                ctx
            }
            Err(err) => {
                tracing::error!(error = %err, "data load failed; serving empty datasets");
                Self::failed(&err)
            }
        }
    }

    fn try_load(config: &DataConfig) -> Result<Self, DataLoadError> {
        let articles = load_table(&config.articles_path)?;
        let top_companies = load_table(&config.top_companies_path)?;
        Self::from_tables(articles, top_companies)
            .map_err(|source| DataLoadError::Schema { path: config.articles_path.clone(), source })
    }

    /// Build a context from tables already in memory.
    ///
    /// # Errors
    ///
    /// Only `SchemaError::InvalidSentiment` is returned; the other schema
    /// issues are kept inside the context as renderable states.
    pub fn from_tables(articles: Table, top_companies: Table) -> Result<Self, SchemaError> {
        let articles = match ArticleTable::from_table(articles) {
            Err(err @ SchemaError::InvalidSentiment { .. }) => return Err(err),
            other => other,
        };
        Ok(Self { articles, top_companies, load_error: None })
    }

    /// The degraded context served after a load failure.
    #[must_use]
    pub fn failed(err: &DataLoadError) -> Self {
        Self {
            articles: Err(SchemaError::NoRows),
            top_companies: Table::default(),
            load_error: Some(format!("Error loading data: {err}")),
        }
    }

    /// # Errors
    ///
    /// Returns the reason the article table cannot be filtered.
    pub fn articles(&self) -> Result<&ArticleTable, &SchemaError> {
        self.articles.as_ref()
    }

    #[must_use]
    pub fn top_companies(&self) -> &Table {
        &self.top_companies
    }

    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
