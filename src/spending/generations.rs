//! Discards the results of requests that were overtaken by a newer one.

use std::{
    collections::HashMap,
    future::Future,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

/// Identifies the chart on one rendered page.
///
/// Requests for different charts never supersede each other, so two browser
/// tabs each keep their own latest response.
pub type ChartId = u64;

/// Identifies one request issued by [RequestGenerations::begin].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Tracks the requests for each chart where only the most recent request's
/// result is kept.
///
/// Each request takes a ticket for its chart before starting its fetch. Once
/// the fetch completes, the result is only used if no other request for the
/// same chart has taken a ticket in the meantime.
#[derive(Debug, Default)]
pub struct RequestGenerations {
    next_chart: AtomicU64,
    next_ticket: AtomicU64,
    /// The latest ticket of each chart with a request in flight.
    latest: Mutex<HashMap<ChartId, u64>>,
}

impl RequestGenerations {
    /// Create a counter with no requests started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the ID for a newly rendered chart.
    pub fn next_chart_id(&self) -> ChartId {
        self.next_chart.fetch_add(1, Ordering::SeqCst) + 1
    }

    // The map only holds integers, so a poisoned lock still holds valid data.
    fn latest(&self) -> MutexGuard<'_, HashMap<ChartId, u64>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new request for `chart`, superseding its earlier requests.
    pub fn begin(&self, chart: ChartId) -> Ticket {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest().insert(chart, ticket);

        Ticket(ticket)
    }

    /// Whether `ticket` belongs to the most recently started request for `chart`.
    pub fn is_current(&self, chart: ChartId, ticket: Ticket) -> bool {
        self.latest().get(&chart) == Some(&ticket.0)
    }

    /// Finish the request holding `ticket`, returning whether it was current.
    fn finish(&self, chart: ChartId, ticket: Ticket) -> bool {
        let mut latest = self.latest();

        if latest.get(&chart) == Some(&ticket.0) {
            latest.remove(&chart);
            true
        } else {
            false
        }
    }

    /// Run `future` as a new request for `chart` and return its output, or
    /// `None` if a newer request for `chart` was started before it finished.
    pub async fn run_latest<F, T>(&self, chart: ChartId, future: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.begin(chart);
        let output = future.await;

        if self.finish(chart, ticket) {
            Some(output)
        } else {
            tracing::debug!("discarding result of superseded request {ticket:?} for chart {chart}");
            None
        }
    }
}
