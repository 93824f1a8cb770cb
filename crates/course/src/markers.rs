use foundation::math::Coordinate;
use foundation::units::UnitSystem;
use serde::{Deserialize, Serialize};

use crate::locate::{cumulative_distances, locate_at_distance};
use crate::route::Route;

pub const HALFWAY_LABEL: &str = "Halfway";

/// A labelled point at a given distance along the course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Distance from the start, in the plan's units.
    pub distance: f64,
    pub coordinate: Coordinate,
    pub label: String,
}

/// Distance markers for one `(route, units, interval)` triple.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkerPlan {
    pub halfway: Option<Marker>,
    pub regular: Vec<Marker>,
}

impl MarkerPlan {
    pub fn is_empty(&self) -> bool {
        self.halfway.is_none() && self.regular.is_empty()
    }

    /// Regular markers followed by the halfway marker, ordered by distance.
    pub fn all(&self) -> Vec<&Marker> {
        let mut out: Vec<&Marker> = self.regular.iter().chain(self.halfway.as_ref()).collect();
        out.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        out
    }
}

/// Place a marker every `interval` units plus one at the halfway point.
///
/// Regular markers sit at `interval, 2 * interval, ...` strictly before the
/// finish; the last partial interval stays unmarked. `interval` is relative
/// to `units` ("every 5" means 5 km or 5 mi), so a unit change needs a new
/// plan.
pub fn plan_markers(route: &Route, units: UnitSystem, interval: f64) -> MarkerPlan {
    if route.is_degenerate() {
        return MarkerPlan::default();
    }

    let total = cumulative_distances(route, units)
        .last()
        .copied()
        .unwrap_or(0.0);
    if total.is_nan() || total <= 0.0 {
        return MarkerPlan::default();
    }

    let halfway_distance = total / 2.0;
    let halfway = locate_at_distance(halfway_distance, route, units).map(|coordinate| Marker {
        distance: halfway_distance,
        coordinate,
        label: HALFWAY_LABEL.to_string(),
    });

    let mut regular = Vec::new();
    if interval.is_finite() && interval > 0.0 {
        for k in 1u32.. {
            let distance = interval * f64::from(k);
            if distance >= total {
                break;
            }
            let Some(coordinate) = locate_at_distance(distance, route, units) else {
                break;
            };
            regular.push(Marker {
                distance,
                coordinate,
                label: distance_label(distance, units),
            });
        }
    }

    MarkerPlan { halfway, regular }
}

/// `"5 km"`, `"2.5 mi"`; values are rounded to two decimals.
pub fn distance_label(distance: f64, units: UnitSystem) -> String {
    let rounded = (distance * 100.0).round() / 100.0;
    format!("{rounded} {}", units.distance_label())
}
