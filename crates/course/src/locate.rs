//! Distance → coordinate lookups (the inverse of [`crate::Profile`]).
//!
//! Two variants share one contract:
//! - [`locate_at_distance`] recomputes cumulative distances and scans
//!   linearly. Used for discrete placements such as markers.
//! - [`locate_at_distance_precise`] takes the distance series of an already
//!   built profile and binary-searches it. Used on every hover frame.
//!
//! Boundary policy (both variants):
//! - `target <= 0` returns the first point, `target >= total` the last.
//! - A non-finite total (a NaN or infinite coordinate somewhere on the
//!   route) has no usable interior, so every positive target gets the last
//!   point.
//! - A target within the snap epsilon of a sample returns that sample as-is.
//! - Otherwise the result is a lerp between the bracketing samples.

use foundation::math::{Coordinate, haversine_m, lerp_coordinate};
use foundation::units::UnitSystem;

use crate::route::Route;

/// Snap tolerance, in distance units (km or mi).
pub const SNAP_EPSILON: f64 = 0.01;

/// Cumulative distance of every route point in `units`.
///
/// Same series as [`crate::Profile::distance`] for non-degenerate routes,
/// but also defined for degenerate ones (a single point yields `[0]`).
pub fn cumulative_distances(route: &Route, units: UnitSystem) -> Vec<f64> {
    let mut out = Vec::with_capacity(route.len());
    if route.is_empty() {
        return out;
    }
    let mut total_m = 0.0;
    out.push(0.0);
    for (a, b) in route.segments() {
        total_m += haversine_m(a, b);
        out.push(units.distance_from_meters(total_m));
    }
    out
}

/// Coordinate at `target` distance along `route`. `None` for an empty route.
pub fn locate_at_distance(target: f64, route: &Route, units: UnitSystem) -> Option<Coordinate> {
    locate_at_distance_with_epsilon(target, route, units, SNAP_EPSILON)
}

pub fn locate_at_distance_with_epsilon(
    target: f64,
    route: &Route,
    units: UnitSystem,
    snap_epsilon: f64,
) -> Option<Coordinate> {
    let distances = cumulative_distances(route, units);
    let points = route.points();
    if let Some(c) = clamp_to_ends(target, points, &distances) {
        return Some(c);
    }
    let upper = distances.iter().position(|&d| d >= target)?;
    Some(interpolate(target, points, &distances, upper, snap_epsilon))
}

/// Coordinate at `target` using a precomputed distance series.
///
/// # Panics
///
/// If `distances.len() != route.len()`: the series must come from a profile
/// of this exact route.
pub fn locate_at_distance_precise(
    target: f64,
    route: &Route,
    distances: &[f64],
) -> Option<Coordinate> {
    locate_at_distance_precise_with_epsilon(target, route, distances, SNAP_EPSILON)
}

pub fn locate_at_distance_precise_with_epsilon(
    target: f64,
    route: &Route,
    distances: &[f64],
    snap_epsilon: f64,
) -> Option<Coordinate> {
    assert_eq!(
        distances.len(),
        route.len(),
        "distance series length must match route length"
    );
    let points = route.points();
    if let Some(c) = clamp_to_ends(target, points, distances) {
        return Some(c);
    }
    let upper = distances.partition_point(|&d| d < target);
    if upper >= distances.len() {
        return points.last().copied();
    }
    Some(interpolate(target, points, distances, upper, snap_epsilon))
}

/// Handles empty routes, singletons, NaN targets, non-finite totals and both
/// out-of-range ends.
///
/// Returns `None` when `target` is strictly inside the course.
fn clamp_to_ends(target: f64, points: &[Coordinate], distances: &[f64]) -> Option<Coordinate> {
    let first = *points.first()?;
    let total = distances.last().copied().unwrap_or(0.0);
    if points.len() == 1 || target.is_nan() || target <= 0.0 {
        return Some(first);
    }
    if !total.is_finite() || target >= total {
        return points.last().copied();
    }
    None
}

/// `upper` is the first index with `distances[upper] >= target`, and `upper > 0`
/// because `target > 0 == distances[0]`.
fn interpolate(
    target: f64,
    points: &[Coordinate],
    distances: &[f64],
    upper: usize,
    snap_epsilon: f64,
) -> Coordinate {
    let lower = upper.saturating_sub(1);
    let (d0, d1) = (distances[lower], distances[upper]);

    if (d1 - target).abs() <= snap_epsilon {
        return points[upper];
    }
    if (target - d0).abs() <= snap_epsilon {
        return points[lower];
    }

    let span = d1 - d0;
    if span <= 0.0 {
        return points[upper];
    }
    lerp_coordinate(points[lower], points[upper], (target - d0) / span)
}
