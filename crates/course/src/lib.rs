//! Course geometry: profiles, resampling, distance lookups, nearest-point
//! projection and distance markers for a single race route.

pub mod cache;
pub mod config;
pub mod densify;
pub mod error;
pub mod locate;
pub mod markers;
pub mod model;
pub mod profile;
pub mod project;
pub mod route;
pub mod source;

pub use cache::{MemoryRouteStore, RouteCache, RouteStore};
pub use config::CourseConfig;
pub use densify::densify;
pub use error::{ConfigError, RouteSourceError};
pub use locate::{cumulative_distances, locate_at_distance, locate_at_distance_precise};
pub use markers::{Marker, MarkerPlan, plan_markers};
pub use model::{CourseModel, CourseSnapshot};
pub use profile::Profile;
pub use project::{ProjectionResult, nearest_vertex, project};
pub use route::Route;
pub use source::parse_geojson_route;
