use std::sync::Arc;

use foundation::math::Coordinate;
use foundation::units::UnitSystem;
use tracing::debug;

use crate::config::CourseConfig;
use crate::densify::densify;
use crate::locate::locate_at_distance_precise_with_epsilon;
use crate::markers::{MarkerPlan, plan_markers};
use crate::profile::Profile;
use crate::project::{ProjectionResult, project};
use crate::route::Route;

/// Everything derived from one `(route, units, interval)` input, built in a
/// single batch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSnapshot {
    /// Densified route; profile samples align with its points.
    pub route: Route,
    pub profile: Profile,
    pub markers: MarkerPlan,
    pub units: UnitSystem,
    pub snap_epsilon: f64,
}

impl CourseSnapshot {
    pub fn build(raw: &Route, config: &CourseConfig) -> Self {
        let route = densify(raw, config.points_per_km);
        let profile = Profile::build(&route, config.units);
        let markers = plan_markers(&route, config.units, config.marker_interval);
        Self {
            route,
            profile,
            markers,
            units: config.units,
            snap_epsilon: config.snap_epsilon,
        }
    }

    /// Same course in other units: the profile is rescaled, not re-measured,
    /// and markers are re-planned since the interval is unit-relative.
    pub fn with_units(&self, config: &CourseConfig) -> Self {
        Self {
            route: self.route.clone(),
            profile: self.profile.to_units(config.units),
            markers: plan_markers(&self.route, config.units, config.marker_interval),
            units: config.units,
            snap_epsilon: config.snap_epsilon,
        }
    }

    /// Hover-path lookup: distance → coordinate against the prebuilt profile.
    pub fn coordinate_at_distance(&self, distance: f64) -> Option<Coordinate> {
        if self.profile.is_empty() {
            return None;
        }
        locate_at_distance_precise_with_epsilon(
            distance,
            &self.route,
            &self.profile.distance,
            self.snap_epsilon,
        )
    }

    /// Hover-path lookup: map position → projection onto the course.
    pub fn project(&self, query: Coordinate) -> Option<ProjectionResult> {
        if self.profile.is_empty() {
            return None;
        }
        project(query, &self.route)
    }

    /// Chart sample nearest to the projection of `query`, with the projection.
    pub fn chart_index_for(&self, query: Coordinate) -> Option<(usize, ProjectionResult)> {
        let hit = self.project(query)?;
        let distance = self.profile.distance_at_fractional_index(hit.fractional_index)?;
        let index = self.profile.nearest_index(distance)?;
        Some((index, hit))
    }
}

/// Owns the raw course and recomputes its [`CourseSnapshot`] when inputs
/// change.
///
/// Recomputation happens only on route switch, unit toggle or interval
/// change; pointer frames read the current snapshot. Readers holding an
/// older `Arc<CourseSnapshot>` keep a consistent view.
#[derive(Debug)]
pub struct CourseModel {
    raw: Arc<Route>,
    config: CourseConfig,
    snapshot: Arc<CourseSnapshot>,
    generation: u64,
}

impl CourseModel {
    pub fn new(raw: Arc<Route>, config: CourseConfig) -> Self {
        let snapshot = Arc::new(CourseSnapshot::build(&raw, &config));
        Self {
            raw,
            config,
            snapshot,
            generation: 0,
        }
    }

    pub fn snapshot(&self) -> Arc<CourseSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn config(&self) -> &CourseConfig {
        &self.config
    }

    pub fn raw_route(&self) -> &Arc<Route> {
        &self.raw
    }

    /// Bumped on every recomputation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` if the snapshot was rebuilt.
    pub fn set_units(&mut self, units: UnitSystem) -> bool {
        if self.config.units == units {
            return false;
        }
        self.config.units = units;
        let snapshot = self.snapshot.with_units(&self.config);
        self.replace(snapshot, "units");
        true
    }

    /// Returns `true` if the snapshot was rebuilt.
    pub fn set_marker_interval(&mut self, interval: f64) -> bool {
        if self.config.marker_interval == interval {
            return false;
        }
        self.config.marker_interval = interval;
        self.rebuild("marker_interval");
        true
    }

    /// Returns `true` if the snapshot was rebuilt.
    pub fn set_route(&mut self, raw: Arc<Route>) -> bool {
        if Arc::ptr_eq(&self.raw, &raw) {
            return false;
        }
        self.raw = raw;
        self.rebuild("route");
        true
    }

    fn rebuild(&mut self, reason: &'static str) {
        let snapshot = CourseSnapshot::build(&self.raw, &self.config);
        self.replace(snapshot, reason);
    }

    fn replace(&mut self, snapshot: CourseSnapshot, reason: &'static str) {
        self.snapshot = Arc::new(snapshot);
        self.generation += 1;
        debug!(
            reason,
            generation = self.generation,
            points = self.snapshot.route.len(),
            units = %self.config.units,
            "rebuilt course snapshot"
        );
    }
}
