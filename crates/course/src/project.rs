use foundation::math::precision::{clamp_unit, stable_total_cmp_f64};
use foundation::math::{Coordinate, Vec2, lerp_coordinate};

use crate::route::Route;

/// Closest point on a route to some query position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionResult {
    /// Projected point; elevation interpolated along the segment.
    pub coordinate: Coordinate,
    /// `segment_index + t` with `t` in `[0, 1]`.
    pub fractional_index: f64,
}

impl ProjectionResult {
    pub fn segment_index(&self) -> usize {
        self.fractional_index.floor() as usize
    }
}

/// Snap `query` onto the nearest point of `route`.
///
/// Distances are planar in (lng, lat) degrees. That is not geodesically
/// exact, but it is stable for cursor snapping at course scale and matches
/// how the map reports pointer positions.
///
/// Ordering contract:
/// - The globally closest segment wins; on exact ties the earlier segment
///   wins.
///
/// Returns `None` for routes with fewer than two points.
pub fn project(query: Coordinate, route: &Route) -> Option<ProjectionResult> {
    if route.len() < 2 {
        return None;
    }
    let q = Vec2::from_lng_lat(query);

    let mut best: Option<(f64, usize, f64)> = None;
    for (i, (a, b)) in route.segments().enumerate() {
        let (t, dist2) = project_onto_segment(q, Vec2::from_lng_lat(a), Vec2::from_lng_lat(b));
        let better = match best {
            None => true,
            Some((best_dist2, _, _)) => stable_total_cmp_f64(dist2, best_dist2).is_lt(),
        };
        if better {
            best = Some((dist2, i, t));
        }
    }

    let (_, i, t) = best?;
    let points = route.points();
    Some(ProjectionResult {
        coordinate: lerp_coordinate(points[i], points[i + 1], t),
        fractional_index: i as f64 + t,
    })
}

/// Nearest route vertex by planar distance, ignoring in-segment positions.
///
/// Coarse fallback for low-precision consumers; hover snapping uses
/// [`project`].
pub fn nearest_vertex(query: Coordinate, route: &Route) -> Option<(usize, Coordinate)> {
    let q = Vec2::from_lng_lat(query);
    route
        .points()
        .iter()
        .enumerate()
        .map(|(i, c)| (i, *c, (Vec2::from_lng_lat(*c) - q).length_squared()))
        .min_by(|a, b| stable_total_cmp_f64(a.2, b.2).then_with(|| a.0.cmp(&b.0)))
        .map(|(i, c, _)| (i, c))
}

/// Returns `(t, squared distance)` for the closest point on `[a, b]` to `q`.
///
/// Zero-length segments project to `t = 0`.
fn project_onto_segment(q: Vec2, a: Vec2, b: Vec2) -> (f64, f64) {
    let ab = b - a;
    let len2 = ab.length_squared();
    let t = if len2 > 0.0 {
        clamp_unit((q - a).dot(ab) / len2)
    } else {
        0.0
    };
    let p = a + ab.scale(t);
    (t, (q - p).length_squared())
}

#[cfg(test)]
mod tests {
    use super::{nearest_vertex, project};
    use crate::route::Route;
    use foundation::math::{Coordinate, lerp_coordinate};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn route(points: &[[f64; 3]]) -> Route {
        points.iter().copied().map(Coordinate::from).collect()
    }

    fn zigzag() -> Route {
        route(&[
            [0.0, 0.0, 0.0],
            [0.01, 0.0, 10.0],
            [0.01, 0.01, 30.0],
            [0.02, 0.01, 20.0],
        ])
    }

    #[test]
    fn segment_midpoint_projects_to_half_index() {
        let r = zigzag();
        for seg in 0..r.len() - 1 {
            let mid = lerp_coordinate(r.points()[seg], r.points()[seg + 1], 0.5);
            let hit = project(mid, &r).unwrap();
            assert_close(hit.fractional_index, seg as f64 + 0.5, 1e-9);
            assert_close(hit.coordinate.lng, mid.lng, 1e-12);
            assert_close(hit.coordinate.lat, mid.lat, 1e-12);
            assert_close(hit.coordinate.ele, mid.ele, 1e-9);
            assert_eq!(hit.segment_index(), seg);
        }
    }

    #[test]
    fn off_route_query_snaps_perpendicular() {
        let r = zigzag();
        // Beside the first segment, a quarter of the way along.
        let hit = project(Coordinate::flat(0.0025, -0.001), &r).unwrap();
        assert_close(hit.fractional_index, 0.25, 1e-9);
        assert_close(hit.coordinate.lat, 0.0, 1e-12);
        assert_close(hit.coordinate.ele, 2.5, 1e-9);
    }

    #[test]
    fn projection_is_clamped_to_segment_ends() {
        let r = zigzag();
        let before = project(Coordinate::flat(-1.0, 0.0), &r).unwrap();
        assert_eq!(before.fractional_index, 0.0);
        assert_eq!(before.coordinate, r.points()[0]);

        let after = project(Coordinate::flat(5.0, 0.01), &r).unwrap();
        assert_close(after.fractional_index, 3.0, 1e-12);
        assert_eq!(after.coordinate, r.points()[3]);
    }

    #[test]
    fn vertex_query_hits_that_vertex() {
        let r = zigzag();
        let hit = project(r.points()[2], &r).unwrap();
        assert_eq!(hit.coordinate, r.points()[2]);
        // Shared vertex: the earlier segment's end wins the tie.
        assert_close(hit.fractional_index, 2.0, 1e-12);
    }

    #[test]
    fn zero_length_segments_are_harmless() {
        let r = route(&[[0.0, 0.0, 0.0], [0.0, 0.0, 5.0], [0.0, 0.01, 15.0]]);
        let hit = project(Coordinate::flat(0.0, 0.005), &r).unwrap();
        assert_close(hit.fractional_index, 1.5, 1e-9);
        assert_close(hit.coordinate.ele, 10.0, 1e-9);
    }

    #[test]
    fn needs_at_least_two_points() {
        assert_eq!(project(Coordinate::flat(0.0, 0.0), &Route::empty()), None);
        let single = route(&[[1.0, 1.0, 1.0]]);
        assert_eq!(project(Coordinate::flat(0.0, 0.0), &single), None);
    }

    #[test]
    fn nearest_vertex_ignores_segment_interiors() {
        let r = zigzag();
        let (i, c) = nearest_vertex(Coordinate::flat(0.0098, 0.004), &r).unwrap();
        assert_eq!(i, 1);
        assert_eq!(c, r.points()[1]);
        assert_eq!(nearest_vertex(Coordinate::flat(0.0, 0.0), &Route::empty()), None);
        let single = route(&[[1.0, 1.0, 1.0]]);
        assert_eq!(nearest_vertex(Coordinate::flat(0.0, 0.0), &single).map(|v| v.0), Some(0));
    }
}
