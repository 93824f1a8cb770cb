use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances (meters).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic sample: longitude/latitude in degrees, elevation in meters.
///
/// Elevation defaults to `0.0` when the source omits it.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
    #[serde(default)]
    pub ele: f64,
}

impl Coordinate {
    pub fn new(lng: f64, lat: f64, ele: f64) -> Self {
        Self { lng, lat, ele }
    }

    /// A coordinate without elevation.
    pub fn flat(lng: f64, lat: f64) -> Self {
        Self::new(lng, lat, 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite() && self.ele.is_finite()
    }

    /// Same horizontal position, elevation ignored.
    pub fn same_position(&self, other: &Self) -> bool {
        self.lng == other.lng && self.lat == other.lat
    }

    pub fn as_array(self) -> [f64; 3] {
        [self.lng, self.lat, self.ele]
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(v: [f64; 2]) -> Self {
        Self::flat(v[0], v[1])
    }
}

impl From<[f64; 3]> for Coordinate {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Great-circle distance in meters (Haversine), elevation ignored.
///
/// Non-finite inputs yield NaN rather than a panic so that corrupt tracks
/// surface as NaN totals downstream.
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push `h` past 1 for antipodal points; NaN stays NaN.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Linear interpolation of all three components.
///
/// Flat-Earth approximation: only valid for short segments that do not
/// cross the antimeridian. `t == 1` returns `b` exactly.
#[inline]
pub fn lerp_coordinate(a: Coordinate, b: Coordinate, t: f64) -> Coordinate {
    if t == 1.0 {
        return b;
    }
    Coordinate::new(
        a.lng + (b.lng - a.lng) * t,
        a.lat + (b.lat - a.lat) * t,
        a.ele + (b.ele - a.ele) * t,
    )
}
