//! The transactions page.
//!
//! This module contains:
//! - Parsing and normalizing the page's query parameters
//! - The route handler and HTML views for the table of transactions
//! - Inline editing of a transaction's category

mod category_edit;
mod page;
mod query;
mod view;

pub use category_edit::{TransactionCache, update_category_endpoint};
pub use page::get_transactions_page;
pub use query::category_url;

pub(crate) use query::url_with_query;
