use crate::math::Coordinate;

/// Axis-aligned lon/lat bounding box (degrees).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LngLatBounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl LngLatBounds {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        LngLatBounds { min, max }
    }

    /// Bounds of a single point.
    pub fn point(c: Coordinate) -> Self {
        LngLatBounds::new([c.lng, c.lat], [c.lng, c.lat])
    }

    /// Bounds enclosing all finite coordinates, `None` if there are none.
    pub fn from_coordinates<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let mut out: Option<Self> = None;
        for c in coords {
            if !c.lng.is_finite() || !c.lat.is_finite() {
                continue;
            }
            match out.as_mut() {
                Some(b) => b.extend(*c),
                None => out = Some(Self::point(*c)),
            }
        }
        out
    }

    pub fn extend(&mut self, c: Coordinate) {
        self.min[0] = self.min[0].min(c.lng);
        self.min[1] = self.min[1].min(c.lat);
        self.max[0] = self.max[0].max(c.lng);
        self.max[1] = self.max[1].max(c.lat);
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::flat(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        )
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        c.lng >= self.min[0] && c.lng <= self.max[0] && c.lat >= self.min[1] && c.lat <= self.max[1]
    }
}
