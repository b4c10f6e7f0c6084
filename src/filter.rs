//! Row filter: company equality plus a minimum sentiment.

use serde::Deserialize;

use crate::config::parse_bool;
use crate::data::{ArticleRecord, ArticleTable};

/// Granularity of the threshold control.
pub const THRESHOLD_STEP: f64 = 0.01;

/// Filter controls as submitted by the browser. Every field is optional and
/// untrusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    pub company: Option<String>,
    pub min_sentiment: Option<String>,
    pub show_all: Option<String>,
}

impl FilterQuery {
    /// Checkbox semantics: present and truthy (`on`, `true`, `1`, ...).
    #[must_use]
    pub fn show_all(&self) -> bool {
        self.show_all.as_deref().and_then(parse_bool).unwrap_or(false)
    }
}

/// A company and threshold the UI controls could have produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    pub company: String,
    pub threshold: f64,
}

impl FilterParams {
    /// Map a query onto the table's choices.
    ///
    /// An unknown or absent company selects the first company in the table.
    /// An absent, unparseable or non-finite threshold selects the observed
    /// minimum; other values are clamped into the observed range.
    /// Returns `None` only for an empty table.
    #[must_use]
    pub fn resolve(table: &ArticleTable, query: &FilterQuery) -> Option<Self> {
        let companies = table.companies();
        let (lo, hi) = table.sentiment_bounds()?;

        let company = match query.company.as_deref() {
            Some(wanted) if companies.iter().any(|c| c == wanted) => wanted.to_owned(),
            _ => companies.into_iter().next()?,
        };

        let threshold = match query.min_sentiment.as_deref().map(str::trim).map(str::parse::<f64>) {
            Some(Ok(value)) if value.is_finite() => value.clamp(lo, hi),
            _ => lo,
        };

        Some(Self { company, threshold })
    }
}

/// Rows of an `ArticleTable` that passed the filter, in source order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    headers: &'a [String],
    rows: Vec<&'a ArticleRecord>,
}

impl<'a> FilteredView<'a> {
    #[must_use]
    pub fn headers(&self) -> &'a [String] {
        self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[&'a ArticleRecord] {
        &self.rows
    }

    /// Rows paired with their score. Every filtered row has one.
    pub fn scored(&self) -> impl Iterator<Item = (&'a ArticleRecord, f64)> + '_ {
        self.rows.iter().filter_map(|record| record.sentiment.map(|s| (*record, s)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows whose company equals `company` and whose sentiment is at least
/// `threshold`. Rows without a score never match. Any combination is legal,
/// including ones matching nothing.
#[must_use]
pub fn filter_articles<'a>(table: &'a ArticleTable, company: &str, threshold: f64) -> FilteredView<'a> {
    let rows = table
        .records()
        .iter()
        .filter(|record| record.company == company && record.sentiment.is_some_and(|s| s >= threshold))
        .collect();
    FilteredView { headers: table.headers(), rows }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
