//! Query parameters shared by the backend requests and the viewer's URLs.

use serde::{Deserialize, Deserializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The format for dates in query strings, e.g., "2024-01-31".
const ISO_DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Which direction of money movement to include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money going out.
    #[default]
    Debit,
    /// Money coming in.
    Credit,
    /// Both debits and credits.
    All,
}

impl TransactionType {
    /// Every transaction type, in display order.
    pub const ALL_TYPES: [TransactionType; 3] = [Self::Debit, Self::Credit, Self::All];

    /// The value the backend expects in the `transaction_type` parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
            Self::All => "all",
        }
    }

    /// The name shown next to the filter's radio button.
    pub fn label(self) -> &'static str {
        match self {
            Self::Debit => "Expenses",
            Self::Credit => "Income",
            Self::All => "All",
        }
    }
}

/// The column to sort transactions by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// The transaction date.
    #[default]
    Date,
    /// The amount in CAD.
    Amount,
}

impl SortBy {
    /// The value the backend expects in the `sort_by` parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
        }
    }
}

/// The order to sort transactions in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    #[serde(rename = "asc")]
    Ascending,
    /// Sort in order of decreasing value.
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// The value the backend expects in the `sort_order` parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// The opposite order.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// An optional, inclusive date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
    /// The earliest date to include.
    pub start_date: Option<Date>,
    /// The latest date to include.
    pub end_date: Option<Date>,
}

impl DateFilter {
    /// Whether neither date is set.
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }

    /// Check that the start date falls on or before the end date.
    ///
    /// Open-ended ranges are always valid.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if the range is reversed.
    pub fn validate(&self) -> Result<(), Error> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(Error::InvalidDateRange(start, end)),
            _ => Ok(()),
        }
    }

    pub(crate) fn push_query_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
        if let Some(start_date) = self.start_date {
            pairs.push(("start_date", start_date.to_string()));
        }

        if let Some(end_date) = self.end_date {
            pairs.push(("end_date", end_date.to_string()));
        }
    }
}

/// The filter for listing categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    /// Only count transactions of this type.
    pub transaction_type: TransactionType,
    /// Only count transactions in this range.
    pub dates: DateFilter,
}

impl CategoryFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![(
            "transaction_type",
            self.transaction_type.as_query_value().to_owned(),
        )];
        self.dates.push_query_pairs(&mut pairs);
        pairs
    }
}

/// A request for one page of transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Which direction of money movement to include.
    pub transaction_type: TransactionType,
    /// The category name, or "All".
    pub category: String,
    /// The 1-based page number.
    pub page: u64,
    /// The number of transactions per page.
    pub page_size: u64,
    /// The column to sort by.
    pub sort_by: SortBy,
    /// The direction to sort in.
    pub sort_order: SortOrder,
    /// The inclusive date range.
    pub dates: DateFilter,
}

impl TransactionQuery {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (
                "transaction_type",
                self.transaction_type.as_query_value().to_owned(),
            ),
            ("category", self.category.clone()),
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("sort_by", self.sort_by.as_query_value().to_owned()),
            ("sort_order", self.sort_order.as_query_value().to_owned()),
        ];
        self.dates.push_query_pairs(&mut pairs);
        pairs
    }
}

/// Deserialize an ISO date where a missing or blank value means no date.
///
/// HTML date inputs submit an empty string when cleared.
pub(crate) fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let text = text.trim();

    if text.is_empty() {
        return Ok(None);
    }

    Date::parse(text, ISO_DATE_FORMAT)
        .map(Some)
        .map_err(serde::de::Error::custom)
}
