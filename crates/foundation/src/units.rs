use serde::{Deserialize, Serialize};

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;
/// Meters in one kilometer.
pub const METERS_PER_KM: f64 = 1000.0;
/// Feet in one meter.
pub const FEET_PER_METER: f64 = 3.28084;

/// Display unit system for distances and elevations.
///
/// Distances are kilometers or miles; elevations are meters or feet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn from_metric_flag(use_metric: bool) -> Self {
        if use_metric {
            UnitSystem::Metric
        } else {
            UnitSystem::Imperial
        }
    }

    pub fn is_metric(self) -> bool {
        self == UnitSystem::Metric
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    /// Meters per distance unit (km or mi).
    pub fn meters_per_distance_unit(self) -> f64 {
        match self {
            UnitSystem::Metric => METERS_PER_KM,
            UnitSystem::Imperial => METERS_PER_MILE,
        }
    }

    pub fn distance_from_meters(self, meters: f64) -> f64 {
        meters / self.meters_per_distance_unit()
    }

    pub fn distance_to_meters(self, value: f64) -> f64 {
        value * self.meters_per_distance_unit()
    }

    pub fn elevation_from_meters(self, meters: f64) -> f64 {
        match self {
            UnitSystem::Metric => meters,
            UnitSystem::Imperial => meters * FEET_PER_METER,
        }
    }

    pub fn elevation_to_meters(self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => value / FEET_PER_METER,
        }
    }

    pub fn distance_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }

    pub fn elevation_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "ft",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FEET_PER_METER, UnitSystem};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn metric_flag_maps_to_units() {
        assert_eq!(UnitSystem::from_metric_flag(true), UnitSystem::Metric);
        assert_eq!(UnitSystem::from_metric_flag(false), UnitSystem::Imperial);
        assert_eq!(UnitSystem::Metric.toggled(), UnitSystem::Imperial);
    }

    #[test]
    fn marathon_in_miles() {
        assert_close(UnitSystem::Imperial.distance_from_meters(42_195.0), 26.219, 1e-3);
        assert_close(UnitSystem::Metric.distance_from_meters(42_195.0), 42.195, 1e-12);
    }

    #[test]
    fn conversions_round_trip() {
        for units in [UnitSystem::Metric, UnitSystem::Imperial] {
            let d = units.distance_from_meters(1234.5);
            assert_close(units.distance_to_meters(d), 1234.5, 1e-9);
            let e = units.elevation_from_meters(87.0);
            assert_close(units.elevation_to_meters(e), 87.0, 1e-9);
        }
        assert_eq!(UnitSystem::Imperial.elevation_from_meters(1.0), FEET_PER_METER);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&UnitSystem::Imperial).unwrap();
        assert_eq!(json, "\"imperial\"");
    }
}
