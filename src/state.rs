//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! data context is loaded once before the listener starts and is read-only
//! afterwards, so concurrent requests share it without locking.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::DataContext;

/// Clone is required by Axum; both fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<DataContext>,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(data: DataContext, config: DashboardConfig) -> Self {
        Self { data: Arc::new(data), config: Arc::new(config) }
    }
}
