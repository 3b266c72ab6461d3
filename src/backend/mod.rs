//! The transaction backend that owns all transaction data.
//!
//! This module contains:
//! - The JSON models the backend serves
//! - The query parameters for filtering, sorting, and paging transactions
//! - [BackendClient], which makes the HTTP requests

mod client;
mod models;
mod query;

pub use client::BackendClient;
pub use models::{
    ALL_CATEGORIES, CategorySummary, PageMetadata, Transaction, TransactionId, TransactionPage,
};
pub use query::{
    CategoryFilter, DateFilter, SortBy, SortOrder, TransactionQuery, TransactionType,
};

pub(crate) use query::deserialize_optional_date;

#[cfg(test)]
pub(crate) use models::{UNCATEGORIZED_LABEL, test_transaction};
