use std::path::Path;

use foundation::units::UnitSystem;
use serde::{Deserialize, Serialize};

use crate::densify::DEFAULT_POINTS_PER_KM;
use crate::error::ConfigError;
use crate::locate::SNAP_EPSILON;

pub const DEFAULT_MARKER_INTERVAL: f64 = 5.0;

/// Course pipeline settings. Every field has a default, so `{}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CourseConfig {
    /// Densification target used before profiling.
    pub points_per_km: f64,
    /// Regular marker spacing, in `units` (km or mi).
    pub marker_interval: f64,
    pub units: UnitSystem,
    /// Locator snap tolerance, in distance units.
    pub snap_epsilon: f64,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            points_per_km: DEFAULT_POINTS_PER_KM,
            marker_interval: DEFAULT_MARKER_INTERVAL,
            units: UnitSystem::Metric,
            snap_epsilon: SNAP_EPSILON,
        }
    }
}

impl CourseConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("points_per_km", self.points_per_km)?;
        positive("marker_interval", self.marker_interval)?;
        if !self.snap_epsilon.is_finite() || self.snap_epsilon < 0.0 {
            return Err(ConfigError::Invalid {
                field: "snap_epsilon",
                reason: format!("must be a finite, non-negative number (got {})", self.snap_epsilon),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a finite, positive number (got {v})"),
        })
    }
}
