use course::MarkerPlan;
use foundation::math::Coordinate;
use serde::{Deserialize, Serialize};

/// One of the two synchronized views of a course.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Chart,
    Map,
}

impl Surface {
    pub fn other(self) -> Self {
        match self {
            Surface::Chart => Surface::Map,
            Surface::Map => Surface::Chart,
        }
    }
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Surface::Chart => write!(f, "chart"),
            Surface::Map => write!(f, "map"),
        }
    }
}

/// Rendering side of hover sync: the map cursor, the chart highlight and
/// the marker layer.
///
/// Every update carries the `origin` surface whose pointer caused it.
/// Implementations whose toolkit re-emits hover callbacks for programmatic
/// updates must pass that origin back with the re-emitted event, which is
/// how the coordinator recognizes and drops the echo.
pub trait RenderSink {
    fn set_cursor(&mut self, coordinate: Coordinate, origin: Surface);
    fn clear_cursor(&mut self);
    fn set_highlight(&mut self, index: usize, origin: Surface);
    fn clear_highlight(&mut self);
    fn set_markers(&mut self, markers: &MarkerPlan);
}

/// A call made on a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    SetCursor { coordinate: Coordinate, origin: Surface },
    ClearCursor,
    SetHighlight { index: usize, origin: Surface },
    ClearHighlight,
    SetMarkers { regular: usize, halfway: bool },
}

/// Sink that records calls instead of drawing; for headless hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<RenderCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    pub fn take(&mut self) -> Vec<RenderCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn cursor_updates(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::SetCursor { .. }))
            .count()
    }

    pub fn highlight_updates(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::SetHighlight { .. }))
            .count()
    }
}

impl RenderSink for RecordingSink {
    fn set_cursor(&mut self, coordinate: Coordinate, origin: Surface) {
        self.calls.push(RenderCall::SetCursor { coordinate, origin });
    }

    fn clear_cursor(&mut self) {
        self.calls.push(RenderCall::ClearCursor);
    }

    fn set_highlight(&mut self, index: usize, origin: Surface) {
        self.calls.push(RenderCall::SetHighlight { index, origin });
    }

    fn clear_highlight(&mut self) {
        self.calls.push(RenderCall::ClearHighlight);
    }

    fn set_markers(&mut self, markers: &MarkerPlan) {
        self.calls.push(RenderCall::SetMarkers {
            regular: markers.regular.len(),
            halfway: markers.halfway.is_some(),
        });
    }
}
