//! Inline re-categorization of a single transaction.
//!
//! The new category is applied to the cached row straight away and then sent
//! to the backend. If the backend rejects the change, the cached row goes
//! back to its previous category and the user sees an alert.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HX_TRIGGER;
use maud::html;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    backend::{BackendClient, Transaction, TransactionId},
};

use super::view::transaction_row_view;

/// The event sent to the page when spending totals have changed.
pub const SPENDING_CHANGED_EVENT: &str = "spending-changed";

#[derive(Debug, Default, Clone)]
struct CachedPage {
    transactions: Vec<Transaction>,
    categories: Vec<String>,
}

/// The rows and category names of the most recently rendered page of transactions.
#[derive(Debug, Default)]
pub struct TransactionCache {
    page: Mutex<CachedPage>,
}

/// A category change that has been applied to the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEdit {
    /// The edited transaction.
    pub id: TransactionId,
    /// The category before the edit.
    pub previous: Option<String>,
    /// The transaction after the edit.
    pub updated: Transaction,
}

impl TransactionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, CachedPage>, Error> {
        self.page
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire transaction cache lock: {error}"))
            .map_err(|_| Error::CacheLockError)
    }

    /// Replace the cached page with `transactions`.
    pub fn replace(
        &self,
        transactions: Vec<Transaction>,
        categories: Vec<String>,
    ) -> Result<(), Error> {
        *self.lock()? = CachedPage {
            transactions,
            categories,
        };

        Ok(())
    }

    /// The category names offered on the cached page.
    pub fn categories(&self) -> Result<Vec<String>, Error> {
        Ok(self.lock()?.categories.clone())
    }

    /// Set the category of the cached transaction `id`.
    ///
    /// # Errors
    /// Returns [Error::UnknownTransaction] if `id` is not on the cached page.
    pub fn apply_category(&self, id: &TransactionId, category: &str) -> Result<CategoryEdit, Error> {
        let mut page = self.lock()?;
        let transaction = page
            .transactions
            .iter_mut()
            .find(|transaction| transaction.id == *id)
            .ok_or_else(|| Error::UnknownTransaction(id.to_string()))?;

        let previous = transaction.category.replace(category.to_owned());

        Ok(CategoryEdit {
            id: id.clone(),
            previous,
            updated: transaction.clone(),
        })
    }

    /// Undo `edit`, returning the transaction as it is now.
    ///
    /// The category is only restored if it has not been changed again since
    /// `edit` was applied.
    pub fn revert(&self, edit: &CategoryEdit) -> Result<Transaction, Error> {
        let mut page = self.lock()?;

        match page
            .transactions
            .iter_mut()
            .find(|transaction| transaction.id == edit.id)
        {
            Some(transaction) => {
                if transaction.category == edit.updated.category {
                    transaction.category = edit.previous.clone();
                }

                Ok(transaction.clone())
            }
            // The page was reloaded in the meantime, so there is nothing to restore.
            None => Ok(Transaction {
                category: edit.previous.clone(),
                ..edit.updated.clone()
            }),
        }
    }
}

/// The state needed to change a transaction's category.
#[derive(Debug, Clone)]
pub struct CategoryEditState {
    /// The client the change is sent with.
    pub backend: BackendClient,
    /// The page the edited transaction is on.
    pub cache: Arc<TransactionCache>,
}

impl FromRef<AppState> for CategoryEditState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            cache: state.transaction_cache.clone(),
        }
    }
}

/// The form submitted by the category selector in a transaction row.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    /// The new category name.
    pub category: String,
}

/// Change the category of a transaction, responding with the updated table row.
pub async fn update_category_endpoint(
    Path(transaction_id): Path<String>,
    State(state): State<CategoryEditState>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let category = form.category.trim();

    if category.is_empty() {
        return Error::EmptyCategory.into_alert_response();
    }

    let id = TransactionId::from_path_segment(&transaction_id);

    let edit = match state.cache.apply_category(&id, category) {
        Ok(edit) => edit,
        Err(error) => {
            tracing::warn!("could not update category of transaction {id}: {error}");
            return error.into_alert_response();
        }
    };

    let categories = match state.cache.categories() {
        Ok(categories) => categories,
        Err(error) => return error.into_alert_response(),
    };

    match state.backend.update_category(&id, category).await {
        Ok(()) => {
            tracing::info!("changed category of transaction {id} to {category:?}");

            let alert = Alert::Success {
                message: "Category updated".to_owned(),
                details: format!(
                    "\"{}\" is now in {category}.",
                    edit.updated.description_1
                ),
            };

            (
                [(HX_TRIGGER, SPENDING_CHANGED_EVENT)],
                html! {
                    (transaction_row_view(&edit.updated, &categories))
                    (alert.into_html())
                },
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("backend rejected category change for transaction {id}: {error}");

            let reverted = match state.cache.revert(&edit) {
                Ok(transaction) => transaction,
                Err(revert_error) => return revert_error.into_alert_response(),
            };

            let alert = Alert::Error {
                message: "Could not update category".to_owned(),
                details: error.user_message(),
            };

            html! {
                (transaction_row_view(&reverted, &categories))
                (alert.into_html())
            }
            .into_response()
        }
    }
}
