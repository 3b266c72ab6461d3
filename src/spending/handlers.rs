//! The route handler for the spending by category chart.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState,
    backend::{ALL_CATEGORIES, BackendClient, DateFilter, deserialize_optional_date},
    endpoints,
    viewer::url_with_query,
};

use super::{
    aggregation::{Palette, aggregate},
    chart::{chart_error_view, pie_chart_view},
    generations::{ChartId, RequestGenerations},
    geometry::{PieGeometry, build_slices},
};

/// How the pie chart is drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartConfig {
    /// The slice colors.
    pub palette: Palette,
    /// The circle the slices are drawn on.
    pub geometry: PieGeometry,
}

/// The state needed to draw the spending chart.
#[derive(Debug, Clone)]
pub struct SpendingChartState {
    /// The client used to fetch expenses.
    pub backend: BackendClient,
    /// The latest request for each chart.
    pub generations: Arc<RequestGenerations>,
    /// How the chart is drawn.
    pub chart_config: ChartConfig,
}

impl FromRef<AppState> for SpendingChartState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            generations: state.chart_generations.clone(),
            chart_config: state.chart_config.clone(),
        }
    }
}

/// The query parameters for the spending chart.
#[derive(Debug, Default, Deserialize)]
pub struct SpendingQuery {
    /// The chart being drawn. Requests without one share a single chart.
    pub chart: Option<ChartId>,
    /// The earliest transaction date to include.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<Date>,
    /// The latest transaction date to include.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<Date>,
    /// The category to emphasize.
    pub highlight: Option<String>,
}

/// The link to the chart `chart` for `dates`, highlighting `highlight`.
pub fn spending_chart_url(chart: ChartId, dates: &DateFilter, highlight: Option<&str>) -> String {
    let mut pairs = Vec::with_capacity(4);
    pairs.push(("chart", chart.to_string()));
    dates.push_query_pairs(&mut pairs);

    if let Some(highlight) = highlight {
        pairs.push(("highlight", highlight.to_owned()));
    }

    url_with_query(endpoints::SPENDING_CHART, &pairs)
}

/// Render the pie chart of expenses by category.
///
/// If another request for the same chart starts before this one has its
/// transactions, this response is dropped with `204 No Content` so that an older date
/// range can never overwrite a newer one.
pub async fn get_spending_chart(
    State(state): State<SpendingChartState>,
    Query(query): Query<SpendingQuery>,
) -> Response {
    let dates = DateFilter {
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let fetch = async {
        match dates.validate() {
            Ok(()) => state.backend.fetch_expenses(&dates).await,
            Err(error) => Err(error),
        }
    };

    let chart = query.chart.unwrap_or_default();
    let Some(result) = state.generations.run_latest(chart, fetch).await else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let totals = match result.and_then(|transactions| {
        aggregate(&transactions, &state.chart_config.palette)
    }) {
        Ok(totals) => totals,
        Err(error) => {
            tracing::error!("could not build spending chart: {error}");
            return chart_error_view(&error.user_message()).into_response();
        }
    };

    let highlight = query
        .highlight
        .as_deref()
        .filter(|category| !category.is_empty() && *category != ALL_CATEGORIES);
    let geometry = state.chart_config.geometry;
    let slices = build_slices(&totals, geometry, highlight);

    pie_chart_view(&slices, geometry, &dates).into_response()
}
