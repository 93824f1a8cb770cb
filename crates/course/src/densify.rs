use foundation::math::{haversine_m, lerp_coordinate};
use foundation::units::METERS_PER_KM;
use tracing::debug;

use crate::route::Route;

/// Default resampling density used by the hover path.
pub const DEFAULT_POINTS_PER_KM: f64 = 100.0;

/// Insert linearly interpolated points so each segment carries roughly
/// `points_per_km` samples per kilometer.
///
/// Every original point is kept, bit-for-bit and in order; new points only
/// appear strictly between two originals. A segment of `L` km is split into
/// `max(1, ceil(L * points_per_km))` pieces.
///
/// Interpolation is linear in lng/lat/ele, which is sub-meter accurate at the
/// densities this is used with.
pub fn densify(route: &Route, points_per_km: f64) -> Route {
    if route.is_degenerate() || !points_per_km.is_finite() || points_per_km <= 0.0 {
        return route.clone();
    }

    let points = route.points();
    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);

    for (a, b) in route.segments() {
        let seg_km = haversine_m(a, b) / METERS_PER_KM;
        let pieces = (seg_km * points_per_km).ceil().max(1.0) as usize;
        for j in 1..pieces {
            let t = j as f64 / pieces as f64;
            out.push(lerp_coordinate(a, b, t));
        }
        out.push(b);
    }

    debug!(
        original = points.len(),
        densified = out.len(),
        points_per_km,
        "densified route"
    );
    Route::new(out)
}
