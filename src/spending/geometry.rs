//! Converts category shares into SVG pie slices.
//!
//! Angles are in degrees, with 0° along +x and angles increasing clockwise
//! because +y points down in SVG. The first slice starts at 12 o'clock.

use svg::node::{Value, element::path::Data};

use super::aggregation::CategoryTotal;

/// The angle of the 12 o'clock position.
pub const START_ANGLE_DEGREES: f64 = -90.0;

/// Sweeps within this many degrees of a full turn are drawn as a whole circle.
const FULL_CIRCLE_EPSILON: f64 = 1e-9;

/// The circle the pie is drawn on, in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieGeometry {
    /// The x coordinate of the center.
    pub cx: f64,
    /// The y coordinate of the center.
    pub cy: f64,
    /// The radius.
    pub radius: f64,
}

impl Default for PieGeometry {
    /// A circle centered in a 200x200 view box.
    fn default() -> Self {
        Self {
            cx: 100.0,
            cy: 100.0,
            radius: 80.0,
        }
    }
}

/// A point in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// The horizontal position, increasing to the right.
    pub x: f64,
    /// The vertical position, increasing downwards.
    pub y: f64,
}

/// One wedge of the pie chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    /// The category the wedge stands for.
    pub category: String,
    /// The category's total expenses.
    pub total: f64,
    /// The category's share of all expenses in the range 0 to 100.
    pub percentage: f64,
    /// The fill color.
    pub color: String,
    /// Where the wedge begins, in degrees.
    pub start_angle: f64,
    /// Where the wedge ends, in degrees. Equal to the next slice's `start_angle`.
    pub end_angle: f64,
    /// Whether the wedge spans more than half the circle.
    pub large_arc: bool,
    /// The SVG path data, e.g., "M100,100 L...".
    pub path: String,
    /// Whether this is the selected category.
    pub is_highlighted: bool,
}

/// The point on the circle at `angle` degrees.
pub fn polar_to_cartesian(geometry: PieGeometry, angle: f64) -> Point {
    let radians = angle.to_radians();

    Point {
        x: geometry.cx + geometry.radius * radians.cos(),
        y: geometry.cy + geometry.radius * radians.sin(),
    }
}

/// Build the closed path for the wedge between `start_angle` and `end_angle`.
///
/// The arc is drawn from the end point back to the start point with the
/// sweep flag off, which traces the wedge clockwise on screen. A sweep of a
/// full turn is drawn as two half circles since an arc whose endpoints
/// coincide is not drawn at all.
pub fn describe_arc(geometry: PieGeometry, start_angle: f64, end_angle: f64) -> String {
    let sweep = end_angle - start_angle;
    let radius = geometry.radius;

    let data = if sweep >= 360.0 - FULL_CIRCLE_EPSILON {
        let top = polar_to_cartesian(geometry, start_angle);
        let bottom = polar_to_cartesian(geometry, start_angle + 180.0);

        Data::new()
            .move_to((top.x, top.y))
            .elliptical_arc_to((radius, radius, 0.0, 1.0, 1.0, bottom.x, bottom.y))
            .elliptical_arc_to((radius, radius, 0.0, 1.0, 1.0, top.x, top.y))
            .close()
    } else {
        let start = polar_to_cartesian(geometry, start_angle);
        let end = polar_to_cartesian(geometry, end_angle);
        let large_arc_flag = if sweep > 180.0 { 1.0 } else { 0.0 };

        Data::new()
            .move_to((geometry.cx, geometry.cy))
            .line_to((end.x, end.y))
            .elliptical_arc_to((radius, radius, 0.0, large_arc_flag, 0.0, start.x, start.y))
            .close()
    };

    Value::from(data).to_string()
}

/// Lay out `totals` around the circle in order, starting at 12 o'clock.
///
/// `highlighted` names the selected category, if any.
pub fn build_slices(
    totals: &[CategoryTotal],
    geometry: PieGeometry,
    highlighted: Option<&str>,
) -> Vec<PieSlice> {
    let mut angle = START_ANGLE_DEGREES;

    totals
        .iter()
        .map(|total| {
            let sweep = total.percentage / 100.0 * 360.0;
            let start_angle = angle;
            let end_angle = angle + sweep;
            angle = end_angle;

            PieSlice {
                category: total.category.clone(),
                total: total.total,
                percentage: total.percentage,
                color: total.color.clone(),
                start_angle,
                end_angle,
                large_arc: sweep > 180.0,
                path: describe_arc(geometry, start_angle, end_angle),
                is_highlighted: highlighted == Some(total.category.as_str()),
            }
        })
        .collect()
}
