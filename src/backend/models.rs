//! The JSON shapes served by the transaction backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The label used for transactions that have no category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The pseudo-category that matches every transaction.
pub const ALL_CATEGORIES: &str = "All";

/// The backend identifies transactions by either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    /// A numeric ID, e.g., a database row ID.
    Number(i64),
    /// An opaque string ID.
    Text(String),
}

impl TransactionId {
    /// Parse an ID taken from a URL path segment.
    ///
    /// Segments that are valid integers are treated as numeric IDs so that they
    /// match the IDs decoded from the backend's JSON.
    pub fn from_path_segment(segment: &str) -> Self {
        match segment.parse::<i64>() {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Text(segment.to_owned()),
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionId::Number(number) => write!(f, "{number}"),
            TransactionId::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<i64> for TransactionId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// A transaction as returned by the backend.
///
/// `cad_amount` is required: a missing or non-numeric amount fails to decode
/// instead of being treated as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The backend's ID for the transaction.
    pub id: TransactionId,
    /// The user-assigned category, `None` or empty when uncategorized.
    #[serde(default)]
    pub category: Option<String>,
    /// The signed amount in Canadian dollars, negative for expenses.
    pub cad_amount: f64,
    /// The date the transaction occurred, as formatted by the bank export.
    pub transaction_date: String,
    /// The primary description.
    #[serde(default)]
    pub description_1: String,
    /// An optional secondary description.
    #[serde(default)]
    pub description_2: Option<String>,
    /// The type of account, e.g., "Chequing" or "Visa".
    #[serde(default)]
    pub account_type: String,
}

impl Transaction {
    /// The category to display and group by, substituting
    /// [UNCATEGORIZED_LABEL] when the category is absent or empty.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => category,
            _ => UNCATEGORIZED_LABEL,
        }
    }

    /// Whether the transaction is money going out.
    pub fn is_expense(&self) -> bool {
        self.cad_amount < 0.0
    }
}

/// A category along with the number of transactions and their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// The category name.
    pub name: String,
    /// The number of transactions in the category.
    pub transaction_count: u64,
    /// The signed sum of the transactions in the category.
    pub total: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct CategoriesResponse {
    pub categories: Vec<CategorySummary>,
}

/// Paging details that accompany a page of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// The 1-based page number.
    pub page: u64,
    /// The number of pages available for the query.
    pub total_pages: u64,
    /// The number of transactions matching the query across all pages.
    pub total_items: u64,
    /// The signed sum of every transaction matching the query.
    pub category_total: f64,
}

/// One page of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPage {
    /// The transactions on this page.
    pub data: Vec<Transaction>,
    /// Paging details for the query.
    pub metadata: PageMetadata,
}

/// The `{ data }` envelope used when only the transactions are needed.
#[derive(Debug, Deserialize)]
pub(super) struct TransactionsEnvelope {
    pub data: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
pub(super) struct CategoryUpdate<'a> {
    pub category: &'a str,
}

#[cfg(test)]
pub(crate) fn test_transaction(id: i64, category: &str, cad_amount: f64) -> Transaction {
    Transaction {
        id: TransactionId::Number(id),
        category: Some(category.to_owned()),
        cad_amount,
        transaction_date: "2024-01-15".to_owned(),
        description_1: format!("Transaction {id}"),
        description_2: None,
        account_type: "Chequing".to_owned(),
    }
}
