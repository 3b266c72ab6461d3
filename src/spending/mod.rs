//! The spending by category pie chart.
//!
//! This module contains:
//! - Aggregation of expense transactions into per-category totals
//! - The geometry for laying out the totals as SVG pie slices
//! - The guard that drops responses for superseded requests for the same chart
//! - The route handler and HTML views for the chart

mod aggregation;
mod chart;
mod generations;
mod geometry;
mod handlers;

pub use aggregation::{CategoryTotal, DEFAULT_PALETTE, Palette, aggregate};
pub use generations::{ChartId, RequestGenerations, Ticket};
pub use geometry::{
    PieGeometry, PieSlice, Point, START_ANGLE_DEGREES, build_slices, describe_arc,
    polar_to_cartesian,
};
pub use handlers::{
    ChartConfig, SpendingChartState, SpendingQuery, get_spending_chart, spending_chart_url,
};

pub(crate) use chart::chart_container;
