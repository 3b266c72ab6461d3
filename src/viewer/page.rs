//! The route handler for the transactions page.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState, Error,
    backend::{BackendClient, CategorySummary, TransactionPage},
    pagination::PaginationConfig,
    spending::RequestGenerations,
};

use super::{
    category_edit::TransactionCache,
    query::{ViewerOptions, ViewerQuery},
    view::{ViewerPage, transactions_page_view},
};

const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";
const NO_CATEGORY_TRANSACTIONS_MESSAGE: &str = "No transactions found for this category";

/// The state needed to render the transactions page.
#[derive(Debug, Clone)]
pub struct ViewerState {
    /// The client for categories and transactions.
    pub backend: BackendClient,
    /// The page sizes on offer.
    pub pagination_config: PaginationConfig,
    /// Holds the rendered page for category edits.
    pub cache: Arc<TransactionCache>,
    /// Hands out the ID of the chart on each rendered page.
    pub chart_generations: Arc<RequestGenerations>,
}

impl FromRef<AppState> for ViewerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            pagination_config: state.pagination_config.clone(),
            cache: state.transaction_cache.clone(),
            chart_generations: state.chart_generations.clone(),
        }
    }
}

/// Render the page listing one category's transactions.
///
/// When no category is given, redirects to the first category the backend
/// knows about.
pub async fn get_transactions_page(
    State(state): State<ViewerState>,
    Query(query): Query<ViewerQuery>,
) -> Response {
    let options = ViewerOptions::from_query(query, &state.pagination_config);
    let render = |categories: &[CategorySummary],
                  page: Option<&TransactionPage>,
                  error_message: Option<String>,
                  empty_message: &str| {
        transactions_page_view(&ViewerPage {
            options: &options,
            chart_id: state.chart_generations.next_chart_id(),
            page_size_options: &state.pagination_config.page_size_options,
            categories,
            transactions: page.map(|page| page.data.as_slice()).unwrap_or_default(),
            metadata: page.map(|page| page.metadata),
            error_message,
            empty_message,
        })
        .into_response()
    };

    if let Err(error) = options.dates.validate() {
        tracing::debug!("rejected transactions page request: {error}");
        return render(&[], None, Some(error.user_message()), NO_TRANSACTIONS_MESSAGE);
    }

    let categories = match state.backend.get_categories(&options.category_filter()).await {
        Ok(categories) => categories,
        Err(error) => {
            return render(&[], None, Some(error.user_message()), NO_TRANSACTIONS_MESSAGE);
        }
    };

    let Some(category) = options.category.as_deref() else {
        return match categories.first() {
            Some(first) => Redirect::to(&options.with_category(&first.name).to_url()).into_response(),
            None => render(&categories, None, None, NO_TRANSACTIONS_MESSAGE),
        };
    };

    let page = match state
        .backend
        .get_transactions(&options.transaction_query(category))
        .await
    {
        Ok(page) => page,
        Err(Error::BackendStatus(404)) => {
            return render(&categories, None, None, NO_CATEGORY_TRANSACTIONS_MESSAGE);
        }
        Err(error) => {
            return render(
                &categories,
                None,
                Some(error.user_message()),
                NO_TRANSACTIONS_MESSAGE,
            );
        }
    };

    let category_names = categories
        .iter()
        .map(|category| category.name.clone())
        .collect();
    if let Err(error) = state.cache.replace(page.data.clone(), category_names) {
        tracing::warn!("rendering transactions page without caching it: {error}");
    }

    render(&categories, Some(&page), None, NO_TRANSACTIONS_MESSAGE)
}
