//! The viewer's URL query parameters and the links built from them.

use serde::Deserialize;
use time::Date;

use crate::{
    backend::{
        CategoryFilter, DateFilter, SortBy, SortOrder, TransactionQuery, TransactionType,
        deserialize_optional_date,
    },
    endpoints,
    pagination::PaginationConfig,
};

/// The query parameters for the transactions page, exactly as the browser sent them.
#[derive(Debug, Default, Deserialize)]
pub struct ViewerQuery {
    /// The category to list, "All" for every category.
    pub category: Option<String>,
    /// Expenses, income or both.
    pub transaction_type: Option<TransactionType>,
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The number of rows per page.
    pub page_size: Option<u64>,
    /// The column to sort by.
    pub sort_by: Option<SortBy>,
    /// The direction to sort in.
    pub sort_order: Option<SortOrder>,
    /// The earliest date to include. Blank means no limit.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<Date>,
    /// The latest date to include. Blank means no limit.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<Date>,
}

/// The viewer's filters after defaults have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    /// `None` until a category has been chosen.
    pub category: Option<String>,
    /// Expenses, income or both.
    pub transaction_type: TransactionType,
    /// The 1-based page number.
    pub page: u64,
    /// One of the configured page sizes.
    pub page_size: u64,
    /// The column to sort by.
    pub sort_by: SortBy,
    /// The direction to sort in.
    pub sort_order: SortOrder,
    /// The inclusive date range.
    pub dates: DateFilter,
}

impl ViewerOptions {
    /// Fill in defaults for anything missing from `query`.
    ///
    /// Page sizes that are not one of the configured options fall back to the
    /// default, and page numbers start at 1.
    pub fn from_query(query: ViewerQuery, config: &PaginationConfig) -> Self {
        Self {
            category: query.category.filter(|category| !category.trim().is_empty()),
            transaction_type: query.transaction_type.unwrap_or_default(),
            page: query.page.unwrap_or(1).max(1),
            page_size: config.normalize_page_size(query.page_size),
            sort_by: query.sort_by.unwrap_or_default(),
            sort_order: query.sort_order.unwrap_or_default(),
            dates: DateFilter {
                start_date: query.start_date,
                end_date: query.end_date,
            },
        }
    }

    /// The same filters on another page.
    pub fn with_page(&self, page: u64) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// The same filters for another category, starting from the first page.
    pub fn with_category(&self, category: &str) -> Self {
        Self {
            category: Some(category.to_owned()),
            page: 1,
            ..self.clone()
        }
    }

    /// The options after clicking the header for `column`.
    ///
    /// Clicking the current sort column flips the order, clicking another
    /// column sorts by it in descending order. Either way the page resets.
    pub fn with_sort(&self, column: SortBy) -> Self {
        let sort_order = if column == self.sort_by {
            self.sort_order.reversed()
        } else {
            SortOrder::Descending
        };

        Self {
            sort_by: column,
            sort_order,
            page: 1,
            ..self.clone()
        }
    }

    /// The same filters across all dates, starting from the first page.
    pub fn without_dates(&self) -> Self {
        Self {
            dates: DateFilter::default(),
            page: 1,
            ..self.clone()
        }
    }

    /// The backend request for the page of transactions in `category`.
    pub fn transaction_query(&self, category: &str) -> TransactionQuery {
        TransactionQuery {
            transaction_type: self.transaction_type,
            category: category.to_owned(),
            page: self.page,
            page_size: self.page_size,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            dates: self.dates,
        }
    }

    /// The backend request for the category list.
    pub fn category_filter(&self) -> CategoryFilter {
        CategoryFilter {
            transaction_type: self.transaction_type,
            dates: self.dates,
        }
    }

    /// The link to the transactions page with these options.
    pub fn to_url(&self) -> String {
        let mut pairs = Vec::with_capacity(8);

        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }

        pairs.extend([
            (
                "transaction_type",
                self.transaction_type.as_query_value().to_owned(),
            ),
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("sort_by", self.sort_by.as_query_value().to_owned()),
            ("sort_order", self.sort_order.as_query_value().to_owned()),
        ]);
        self.dates.push_query_pairs(&mut pairs);

        url_with_query(endpoints::TRANSACTIONS_VIEW, &pairs)
    }
}

/// The link to the transactions page for `category`, keeping `dates` and
/// leaving everything else at its default.
pub fn category_url(category: &str, dates: &DateFilter) -> String {
    let mut pairs = vec![("category", category.to_owned())];
    dates.push_query_pairs(&mut pairs);

    url_with_query(endpoints::TRANSACTIONS_VIEW, &pairs)
}

/// Append `pairs` to `route` as a URL-encoded query string.
pub(crate) fn url_with_query(route: &str, pairs: &[(&'static str, String)]) -> String {
    if pairs.is_empty() {
        return route.to_owned();
    }

    match serde_urlencoded::to_string(pairs) {
        Ok(query) => format!("{route}?{query}"),
        Err(error) => {
            tracing::error!("could not encode query string for {route}: {error}");
            route.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        backend::{DateFilter, SortBy, SortOrder, TransactionType},
        pagination::PaginationConfig,
    };

    use super::{ViewerOptions, ViewerQuery, category_url};

    fn parse(query: &str) -> ViewerOptions {
        let query: ViewerQuery = serde_urlencoded::from_str(query).unwrap();
        ViewerOptions::from_query(query, &PaginationConfig::default())
    }

    #[test]
    fn applies_defaults() {
        let options = parse("");

        assert_eq!(
            options,
            ViewerOptions {
                category: None,
                transaction_type: TransactionType::Debit,
                page: 1,
                page_size: 10,
                sort_by: SortBy::Date,
                sort_order: SortOrder::Descending,
                dates: DateFilter::default(),
            }
        );
    }

    #[test]
    fn parses_every_parameter() {
        let options = parse(
            "category=Food&transaction_type=credit&page=3&page_size=50&sort_by=amount\
            &sort_order=asc&start_date=2024-01-01&end_date=",
        );

        assert_eq!(options.category.as_deref(), Some("Food"));
        assert_eq!(options.transaction_type, TransactionType::Credit);
        assert_eq!(options.page, 3);
        assert_eq!(options.page_size, 50);
        assert_eq!(options.sort_by, SortBy::Amount);
        assert_eq!(options.sort_order, SortOrder::Ascending);
        assert_eq!(options.dates.start_date, Some(date!(2024 - 01 - 01)));
        assert_eq!(options.dates.end_date, None);
    }

    #[test]
    fn invalid_page_size_and_page_fall_back() {
        let options = parse("page=0&page_size=13&category=");

        assert_eq!(options.page, 1);
        assert_eq!(options.page_size, 10);
        assert_eq!(options.category, None);
    }

    #[test]
    fn sorting_same_column_flips_order() {
        let options = parse("category=Food&page=4&sort_by=date&sort_order=desc");

        let sorted = options.with_sort(SortBy::Date);

        assert_eq!(sorted.sort_by, SortBy::Date);
        assert_eq!(sorted.sort_order, SortOrder::Ascending);
        assert_eq!(sorted.page, 1);
    }

    #[test]
    fn sorting_new_column_starts_descending() {
        let options = parse("sort_by=date&sort_order=asc");

        let sorted = options.with_sort(SortBy::Amount);

        assert_eq!(sorted.sort_by, SortBy::Amount);
        assert_eq!(sorted.sort_order, SortOrder::Descending);
    }

    #[test]
    fn changing_category_resets_page() {
        let options = parse("category=Food&page=4");

        let changed = options.with_category("Gas");

        assert_eq!(changed.category.as_deref(), Some("Gas"));
        assert_eq!(changed.page, 1);
    }

    #[test]
    fn clearing_dates_resets_page() {
        let options = parse("page=2&start_date=2024-01-01&end_date=2024-02-01");

        let cleared = options.without_dates();

        assert!(cleared.dates.is_empty());
        assert_eq!(cleared.page, 1);
    }

    #[test]
    fn url_round_trips_through_query() {
        let options = parse("category=Food %26 Drink&page=2&start_date=2024-01-01");

        let url = options.to_url();

        assert_eq!(
            url,
            "/transactions?category=Food+%26+Drink&transaction_type=debit&page=2&page_size=10\
            &sort_by=date&sort_order=desc&start_date=2024-01-01"
        );
        let query = url.split_once('?').unwrap().1;
        assert_eq!(parse(query), options);
    }

    #[test]
    fn category_url_keeps_dates() {
        let dates = DateFilter {
            start_date: None,
            end_date: Some(date!(2024 - 06 - 30)),
        };

        assert_eq!(
            category_url("Gas", &dates),
            "/transactions?category=Gas&end_date=2024-06-30"
        );
    }
}
