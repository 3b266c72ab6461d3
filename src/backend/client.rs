//! HTTP client for the external transaction backend.
//!
//! Every request is made once: failures are returned to the caller to be shown
//! to the user, there are no retries.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::Error;

use super::{
    models::{
        ALL_CATEGORIES, CategoriesResponse, CategorySummary, CategoryUpdate, Transaction,
        TransactionId, TransactionPage, TransactionsEnvelope,
    },
    query::{CategoryFilter, DateFilter, TransactionQuery, TransactionType},
};

/// A page size large enough for the backend to return every match in one page.
pub const FETCH_ALL_PAGE_SIZE: u64 = 10_000_000;

/// Client for the transaction backend's JSON API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`, e.g. "http://localhost:8000".
    ///
    /// # Errors
    /// Returns [Error::InvalidBackendUrl] if `base_url` cannot be parsed or cannot
    /// have path segments appended to it.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)
            .map_err(|error| Error::InvalidBackendUrl(format!("{base_url}: {error}")))?;

        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBackendUrl(base_url.to_string()));
        }

        let http = Client::builder()
            .user_agent(concat!("spendview/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|error| Error::BackendUnavailable(error.to_string()))?;

        Ok(Self { http, base_url })
    }

    /// List the categories with their transaction counts and totals.
    pub async fn get_categories(
        &self,
        filter: &CategoryFilter,
    ) -> Result<Vec<CategorySummary>, Error> {
        let url = self.endpoint(&["categories"])?;
        let response: CategoriesResponse = self.get_json(url, &filter.query_pairs()).await?;

        Ok(response.categories)
    }

    /// Get one page of transactions.
    pub async fn get_transactions(&self, query: &TransactionQuery) -> Result<TransactionPage, Error> {
        let url = self.endpoint(&["transactions"])?;

        self.get_json(url, &query.query_pairs()).await
    }

    /// Get every debit transaction in `dates`, across all categories, in one request.
    pub async fn fetch_expenses(&self, dates: &DateFilter) -> Result<Vec<Transaction>, Error> {
        let url = self.endpoint(&["transactions"])?;
        let mut pairs = vec![
            ("category", ALL_CATEGORIES.to_owned()),
            (
                "transaction_type",
                TransactionType::Debit.as_query_value().to_owned(),
            ),
            ("page", "1".to_owned()),
            ("page_size", FETCH_ALL_PAGE_SIZE.to_string()),
        ];
        dates.push_query_pairs(&mut pairs);

        let envelope: TransactionsEnvelope = self.get_json(url, &pairs).await?;

        Ok(envelope.data)
    }

    /// Change the category of a single transaction.
    pub async fn update_category(&self, id: &TransactionId, category: &str) -> Result<(), Error> {
        let url = self.endpoint(&["transactions", &id.to_string()])?;

        self.http
            .patch(url.clone())
            .json(&CategoryUpdate { category })
            .send()
            .await
            .inspect_err(|error| tracing::error!("PATCH {url} failed: {error}"))?
            .error_for_status()
            .inspect_err(|error| tracing::error!("PATCH {url} was rejected: {error}"))?;

        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> Result<T, Error> {
        let response = self
            .http
            .get(url.clone())
            .query(query)
            .send()
            .await
            .inspect_err(|error| tracing::error!("GET {url} failed: {error}"))?
            .error_for_status()
            .inspect_err(|error| tracing::error!("GET {url} was rejected: {error}"))?;

        response
            .json::<T>()
            .await
            .inspect_err(|error| tracing::error!("could not decode response from {url}: {error}"))
            .map_err(Error::from)
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| Error::InvalidBackendUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::{Method::GET, Method::PATCH, MockServer};
    use serde_json::json;
    use time::macros::date;

    use crate::{
        Error,
        backend::{
            CategoryFilter, DateFilter, SortBy, SortOrder, TransactionId, TransactionQuery,
            TransactionType,
        },
    };

    use super::{BackendClient, FETCH_ALL_PAGE_SIZE};

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(&server.base_url(), Duration::from_secs(5))
            .expect("Could not create backend client")
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = BackendClient::new("not a url", Duration::from_secs(1));

        assert!(matches!(result, Err(Error::InvalidBackendUrl(_))));
    }

    #[tokio::test]
    async fn get_categories_sends_filter() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/categories")
                    .query_param("transaction_type", "debit")
                    .query_param("start_date", "2024-01-01");
                then.status(200).json_body(json!({
                    "categories": [
                        { "name": "Food", "transaction_count": 3, "total": -45.5 },
                        { "name": "Gas", "transaction_count": 1, "total": -60.0 }
                    ]
                }));
            })
            .await;
        let filter = CategoryFilter {
            transaction_type: TransactionType::Debit,
            dates: DateFilter {
                start_date: Some(date!(2024 - 01 - 01)),
                end_date: None,
            },
        };

        let categories = client_for(&server).get_categories(&filter).await.unwrap();

        mock.assert_async().await;
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Food");
        assert_eq!(categories[0].transaction_count, 3);
        assert_eq!(categories[1].total, -60.0);
    }

    #[tokio::test]
    async fn get_transactions_decodes_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/transactions")
                    .query_param("category", "Food")
                    .query_param("page", "2")
                    .query_param("page_size", "10")
                    .query_param("sort_by", "amount")
                    .query_param("sort_order", "asc");
                then.status(200).json_body(json!({
                    "data": [{
                        "id": 7,
                        "category": "Food",
                        "cad_amount": -12.34,
                        "transaction_date": "2024-01-05",
                        "description_1": "GROCER",
                        "description_2": null,
                        "account_type": "Chequing"
                    }],
                    "metadata": {
                        "page": 2,
                        "page_size": 10,
                        "total_pages": 3,
                        "total_items": 21,
                        "category_total": -250.0
                    }
                }));
            })
            .await;
        let query = TransactionQuery {
            transaction_type: TransactionType::Debit,
            category: "Food".to_owned(),
            page: 2,
            page_size: 10,
            sort_by: SortBy::Amount,
            sort_order: SortOrder::Ascending,
            dates: DateFilter::default(),
        };

        let page = client_for(&server).get_transactions(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, TransactionId::Number(7));
        assert_eq!(page.metadata.total_pages, 3);
        assert_eq!(page.metadata.total_items, 21);
    }

    #[tokio::test]
    async fn fetch_expenses_requests_everything_in_one_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/transactions")
                    .query_param("category", "All")
                    .query_param("transaction_type", "debit")
                    .query_param("page", "1")
                    .query_param("page_size", FETCH_ALL_PAGE_SIZE.to_string())
                    .query_param("end_date", "2024-06-30");
                then.status(200).json_body(json!({
                    "data": [
                        { "id": "a", "category": "Food", "cad_amount": -5.0, "transaction_date": "2024-06-01" },
                        { "id": "b", "category": "Pay", "cad_amount": 500.0, "transaction_date": "2024-06-02" }
                    ],
                    "metadata": { "page": 1, "total_pages": 1, "total_items": 2, "category_total": 495.0 }
                }));
            })
            .await;
        let dates = DateFilter {
            start_date: None,
            end_date: Some(date!(2024 - 06 - 30)),
        };

        let transactions = client_for(&server).fetch_expenses(&dates).await.unwrap();

        mock.assert_async().await;
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].id, TransactionId::Text("a".to_owned()));
    }

    #[tokio::test]
    async fn malformed_amount_is_invalid_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/transactions");
                then.status(200).json_body(json!({
                    "data": [{ "id": 1, "category": "Food", "cad_amount": null, "transaction_date": "2024-06-01" }]
                }));
            })
            .await;

        let result = client_for(&server)
            .fetch_expenses(&DateFilter::default())
            .await;

        assert!(matches!(result, Err(Error::InvalidBackendResponse(_))));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/categories");
                then.status(500);
            })
            .await;

        let result = client_for(&server)
            .get_categories(&CategoryFilter::default())
            .await;

        assert_eq!(result, Err(Error::BackendStatus(500)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_unavailable() {
        // Nothing listens on port 9 (discard) in the test environment.
        let client = BackendClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();

        let result = client.get_categories(&CategoryFilter::default()).await;

        assert!(matches!(result, Err(Error::BackendUnavailable(_))));
    }

    #[tokio::test]
    async fn update_category_sends_patch() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/transactions/42")
                    .json_body(json!({ "category": "Groceries" }));
                then.status(200).json_body(json!({ "ok": true }));
            })
            .await;

        client_for(&server)
            .update_category(&TransactionId::Number(42), "Groceries")
            .await
            .unwrap();

        mock.assert_async().await;
    }
}
