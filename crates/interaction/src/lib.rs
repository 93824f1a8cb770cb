//! Pointer-driven coupling between the elevation chart and the route map.

pub mod hover;
pub mod sink;

pub use hover::{HoverConfig, HoverPhase, HoverSync, SyncEvent, SyncState};
pub use sink::{RecordingSink, RenderCall, RenderSink, Surface};
