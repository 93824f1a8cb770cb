use foundation::math::haversine_m;
use foundation::units::UnitSystem;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::route::Route;

/// Cumulative distance, elevation and grade series aligned to a route.
///
/// Invariants:
/// - `distance`, `elevation` and `grade` have equal length (the route length,
///   or zero for a degenerate route).
/// - `distance[0] == 0` and `distance` is non-decreasing.
/// - `grade` is a signed percentage; first and last samples are `0`.
///
/// A profile is an immutable snapshot for one `(route, units)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub units: UnitSystem,
    pub distance: Vec<f64>,
    pub elevation: Vec<f64>,
    pub grade: Vec<f64>,
}

impl Profile {
    pub fn empty(units: UnitSystem) -> Self {
        Self {
            units,
            distance: Vec::new(),
            elevation: Vec::new(),
            grade: Vec::new(),
        }
    }

    /// Build the profile of `route` in `units`.
    ///
    /// Distances accumulate in meters and are converted once per sample, so
    /// unit conversion error does not compound along the course.
    pub fn build(route: &Route, units: UnitSystem) -> Self {
        if route.is_degenerate() {
            if !route.is_empty() {
                warn!(points = route.len(), "degenerate route, building empty profile");
            }
            return Self::empty(units);
        }

        let points = route.points();
        let n = points.len();

        let mut segment_m = Vec::with_capacity(n - 1);
        let mut cumulative_m = Vec::with_capacity(n);
        let mut total_m = 0.0;
        cumulative_m.push(0.0);
        for (a, b) in route.segments() {
            let d = haversine_m(a, b);
            segment_m.push(d);
            total_m += d;
            cumulative_m.push(total_m);
        }

        let mut grade = vec![0.0; n];
        for i in 1..n - 1 {
            let run_m = segment_m[i - 1] + segment_m[i];
            if run_m > 0.0 {
                let rise_m = points[i + 1].ele - points[i - 1].ele;
                grade[i] = rise_m / run_m * 100.0;
            }
        }

        Self {
            units,
            distance: cumulative_m
                .iter()
                .map(|&m| units.distance_from_meters(m))
                .collect(),
            elevation: points
                .iter()
                .map(|c| units.elevation_from_meters(c.ele))
                .collect(),
            grade,
        }
    }

    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    /// Total course distance in `self.units`; `0` for an empty profile.
    pub fn total_distance(&self) -> f64 {
        self.distance.last().copied().unwrap_or(0.0)
    }

    /// Sum of positive elevation changes.
    pub fn ascent(&self) -> f64 {
        self.elevation
            .windows(2)
            .map(|w| (w[1] - w[0]).max(0.0))
            .sum()
    }

    /// Sum of negative elevation changes, as a positive number.
    pub fn descent(&self) -> f64 {
        self.elevation
            .windows(2)
            .map(|w| (w[0] - w[1]).max(0.0))
            .sum()
    }

    pub fn min_elevation(&self) -> Option<f64> {
        self.elevation.iter().copied().reduce(f64::min)
    }

    pub fn max_elevation(&self) -> Option<f64> {
        self.elevation.iter().copied().reduce(f64::max)
    }

    /// Re-express this profile in another unit system.
    ///
    /// Grade is a ratio and is carried over unchanged.
    pub fn to_units(&self, units: UnitSystem) -> Self {
        if units == self.units {
            return self.clone();
        }
        let from = self.units;
        Self {
            units,
            distance: self
                .distance
                .iter()
                .map(|&d| units.distance_from_meters(from.distance_to_meters(d)))
                .collect(),
            elevation: self
                .elevation
                .iter()
                .map(|&e| units.elevation_from_meters(from.elevation_to_meters(e)))
                .collect(),
            grade: self.grade.clone(),
        }
    }

    /// Distance at a fractional sample index `i + t`, clamped to the series.
    pub fn distance_at_fractional_index(&self, fractional_index: f64) -> Option<f64> {
        let last = self.distance.len().checked_sub(1)?;
        if fractional_index.is_nan() {
            return None;
        }
        let fi = fractional_index.clamp(0.0, last as f64);
        let i = (fi.floor() as usize).min(last);
        if i == last {
            return Some(self.distance[last]);
        }
        let t = fi - i as f64;
        let (d0, d1) = (self.distance[i], self.distance[i + 1]);
        Some(d0 + (d1 - d0) * t)
    }

    /// Index of the sample whose distance is closest to `target`.
    ///
    /// Ties resolve to the lower index. `None` for an empty profile or a NaN
    /// target.
    pub fn nearest_index(&self, target: f64) -> Option<usize> {
        if self.distance.is_empty() || target.is_nan() {
            return None;
        }
        let upper = self.distance.partition_point(|&d| d < target);
        if upper == 0 {
            return Some(0);
        }
        if upper == self.distance.len() {
            return Some(upper - 1);
        }
        let below = target - self.distance[upper - 1];
        let above = self.distance[upper] - target;
        if above < below {
            Some(upper)
        } else {
            Some(upper - 1)
        }
    }
}
