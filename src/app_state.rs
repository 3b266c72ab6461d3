//! Implements a struct that holds the state of the web server.

use std::sync::Arc;

use crate::{
    backend::BackendClient,
    pagination::PaginationConfig,
    spending::{ChartConfig, RequestGenerations},
    viewer::TransactionCache,
};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the transaction backend.
    pub backend: BackendClient,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// The config that controls how the spending chart is drawn.
    pub chart_config: ChartConfig,

    /// Hands out chart IDs and tracks the latest request for each chart so older responses can be dropped.
    pub chart_generations: Arc<RequestGenerations>,

    /// The transactions on the most recently rendered page.
    pub transaction_cache: Arc<TransactionCache>,
}

impl AppState {
    /// Create a new [AppState] that fetches its data from `backend`.
    pub fn new(
        backend: BackendClient,
        pagination_config: PaginationConfig,
        chart_config: ChartConfig,
    ) -> Self {
        Self {
            backend,
            pagination_config,
            chart_config,
            chart_generations: Arc::new(RequestGenerations::new()),
            transaction_cache: Arc::new(TransactionCache::new()),
        }
    }
}
