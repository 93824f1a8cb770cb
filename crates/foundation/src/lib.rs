pub mod bounds;
pub mod math;
pub mod time;
pub mod units;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use math::{Coordinate, haversine_m, lerp_coordinate};
pub use time::*;
pub use units::*;
