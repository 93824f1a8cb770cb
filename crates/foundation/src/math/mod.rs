pub mod geo;
pub mod precision;
pub mod vec;

pub use geo::*;
pub use precision::*;
pub use vec::*;
