//! Bidirectional hover sync between the elevation chart and the route map.
//!
//! States:
//! - `Idle`: nothing highlighted.
//! - `Hovering { origin }`: the pointer on `origin` drives the other view.
//!
//! Transitions:
//! - chart pointer → `Hovering(Chart)`; sample index → distance → map cursor.
//! - map pointer → `Hovering(Map)`; projection → distance → chart highlight.
//!   The map itself is never written to from a map event.
//! - pointer left → once the pointer is over neither surface, a clear is
//!   scheduled `settle_delay_s` later; any pointer event before it fires
//!   cancels it.
//!
//! Echo contract: an event reported by surface X whose `origin` is not X was
//! caused by one of our own updates and is dropped without touching state
//! or the sink.

use std::sync::Arc;

use course::CourseSnapshot;
use foundation::math::Coordinate;
use foundation::time::Time;
use runtime::{EventBus, Stamped, TimerId, TimerQueue};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::sink::{RenderSink, Surface};

pub const DEFAULT_SETTLE_DELAY_S: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Delay between the pointer leaving a surface and the hover clearing.
    pub settle_delay_s: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            settle_delay_s: DEFAULT_SETTLE_DELAY_S,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum HoverPhase {
    #[default]
    Idle,
    Hovering {
        origin: Surface,
    },
}

/// Transient hover state. Never persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SyncState {
    pub phase: HoverPhase,
    /// Surface the pointer is currently over, if any.
    pub pointer_over: Option<Surface>,
    pub pending_clear: Option<TimerId>,
}

impl SyncState {
    pub fn origin(&self) -> Option<Surface> {
        match self.phase {
            HoverPhase::Idle => None,
            HoverPhase::Hovering { origin } => Some(origin),
        }
    }
}

/// Trace of what the coordinator did, recorded on its [`EventBus`].
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    HoverStarted { origin: Surface },
    /// Chart sample drove the map cursor.
    CursorMoved { index: usize, coordinate: Coordinate },
    /// Map position drove the chart highlight.
    HighlightMoved { index: usize, fractional_index: f64 },
    /// Nothing to project onto or look up (course still loading).
    Skipped { surface: Surface },
    EchoSuppressed { surface: Surface, origin: Surface },
    ClearScheduled { surface: Surface },
    ClearCancelled,
    Cleared,
    CourseReplaced,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct ClearHover;

pub struct HoverSync {
    config: HoverConfig,
    course: Arc<CourseSnapshot>,
    state: SyncState,
    timers: TimerQueue<ClearHover>,
    events: EventBus<SyncEvent>,
}

impl HoverSync {
    pub fn new(course: Arc<CourseSnapshot>, config: HoverConfig) -> Self {
        Self {
            config,
            course,
            state: SyncState::default(),
            timers: TimerQueue::new(),
            events: EventBus::new(),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn course(&self) -> &Arc<CourseSnapshot> {
        &self.course
    }

    pub fn events(&self) -> &[Stamped<SyncEvent>] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Stamped<SyncEvent>> {
        self.events.drain()
    }

    /// When the host next needs to call [`HoverSync::tick`], if ever.
    pub fn next_deadline(&self) -> Option<Time> {
        self.state.pending_clear.and_then(|id| self.timers.deadline(id))
    }

    /// Swap in a rebuilt course (unit toggle, route switch).
    ///
    /// Hover state refers to the old geometry, so it is dropped immediately
    /// rather than debounced; the new markers are pushed to the sink.
    pub fn set_course(&mut self, now: Time, course: Arc<CourseSnapshot>, sink: &mut dyn RenderSink) {
        self.course = course;
        self.timers.clear();
        let was_hovering = self.state.phase != HoverPhase::Idle;
        self.state = SyncState::default();
        if was_hovering {
            sink.clear_cursor();
            sink.clear_highlight();
        }
        sink.set_markers(&self.course.markers);
        self.events.emit(now, SyncEvent::CourseReplaced);
    }

    /// Pointer at chart sample `index`.
    ///
    /// `origin` is the surface whose interaction produced this event:
    /// `Surface::Chart` for real pointer input, or whatever origin the chart
    /// was handed when it echoes one of our highlights.
    ///
    /// Returns `true` if the map cursor was updated.
    pub fn chart_pointer(
        &mut self,
        now: Time,
        index: usize,
        origin: Surface,
        sink: &mut dyn RenderSink,
    ) -> bool {
        if self.is_echo(now, Surface::Chart, origin) {
            return false;
        }
        self.on_user_input(now, Surface::Chart);

        let profile = &self.course.profile;
        let Some(last) = profile.len().checked_sub(1) else {
            self.events.emit(now, SyncEvent::Skipped { surface: Surface::Chart });
            return false;
        };
        let index = index.min(last);
        let Some(coordinate) = self.course.coordinate_at_distance(profile.distance[index]) else {
            self.events.emit(now, SyncEvent::Skipped { surface: Surface::Chart });
            return false;
        };

        self.enter(now, Surface::Chart);
        sink.set_cursor(coordinate, Surface::Chart);
        trace!(index, lng = coordinate.lng, lat = coordinate.lat, "chart drove map cursor");
        self.events.emit(now, SyncEvent::CursorMoved { index, coordinate });
        true
    }

    /// Pointer at map position `query`.
    ///
    /// Returns `true` if the chart highlight was updated.
    pub fn map_pointer(
        &mut self,
        now: Time,
        query: Coordinate,
        origin: Surface,
        sink: &mut dyn RenderSink,
    ) -> bool {
        if self.is_echo(now, Surface::Map, origin) {
            return false;
        }
        self.on_user_input(now, Surface::Map);

        let Some((index, hit)) = self.course.chart_index_for(query) else {
            self.events.emit(now, SyncEvent::Skipped { surface: Surface::Map });
            return false;
        };

        self.enter(now, Surface::Map);
        sink.set_highlight(index, Surface::Map);
        trace!(index, fractional_index = hit.fractional_index, "map drove chart highlight");
        self.events.emit(
            now,
            SyncEvent::HighlightMoved {
                index,
                fractional_index: hit.fractional_index,
            },
        );
        true
    }

    /// Pointer left `surface`; clears after the settle delay unless the
    /// pointer comes back first.
    ///
    /// A stale leave for a surface the pointer already moved off of (the
    /// chart's leave arriving after the map's first move) is ignored.
    pub fn pointer_left(&mut self, now: Time, surface: Surface) {
        match self.state.pointer_over {
            Some(over) if over != surface => {
                trace!(%surface, %over, "ignored leave, pointer is on the other surface");
                return;
            }
            Some(_) => self.state.pointer_over = None,
            None => {}
        }
        if self.state.phase == HoverPhase::Idle {
            return;
        }
        if let Some(id) = self.state.pending_clear.take() {
            self.timers.cancel(id);
        }
        let id = self.timers.schedule(now, self.config.settle_delay_s, ClearHover);
        self.state.pending_clear = Some(id);
        trace!(%surface, "hover clear scheduled");
        self.events.emit(now, SyncEvent::ClearScheduled { surface });
    }

    /// Fire due timers. Returns `true` if the hover was cleared.
    pub fn tick(&mut self, now: Time, sink: &mut dyn RenderSink) -> bool {
        let mut cleared = false;
        for (id, ClearHover) in self.timers.fire_due(now) {
            if self.state.pending_clear != Some(id) {
                continue;
            }
            self.state = SyncState {
                phase: HoverPhase::Idle,
                pointer_over: self.state.pointer_over,
                pending_clear: None,
            };
            sink.clear_cursor();
            sink.clear_highlight();
            trace!("hover cleared");
            self.events.emit(now, SyncEvent::Cleared);
            cleared = true;
        }
        cleared
    }

    fn is_echo(&mut self, now: Time, surface: Surface, origin: Surface) -> bool {
        if origin == surface {
            return false;
        }
        trace!(%surface, %origin, "suppressed echo");
        self.events.emit(now, SyncEvent::EchoSuppressed { surface, origin });
        true
    }

    fn on_user_input(&mut self, now: Time, surface: Surface) {
        self.state.pointer_over = Some(surface);
        if let Some(id) = self.state.pending_clear.take() {
            if self.timers.cancel(id) {
                self.events.emit(now, SyncEvent::ClearCancelled);
            }
        }
    }

    fn enter(&mut self, now: Time, origin: Surface) {
        if self.state.origin() != Some(origin) {
            self.state.phase = HoverPhase::Hovering { origin };
            trace!(%origin, "hover started");
            self.events.emit(now, SyncEvent::HoverStarted { origin });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{HoverConfig, HoverPhase, HoverSync, SyncEvent};
    use crate::sink::{RecordingSink, RenderCall, RenderSink, Surface};
    use course::{CourseConfig, CourseSnapshot, MarkerPlan, Route};
    use foundation::math::Coordinate;
    use foundation::time::Time;
    use pretty_assertions::assert_eq;

    fn snapshot() -> Arc<CourseSnapshot> {
        let raw = Route::new(vec![
            Coordinate::new(0.0, 0.0, 0.0),
            Coordinate::new(0.0, 0.009, 100.0),
            Coordinate::new(0.009, 0.009, 40.0),
            Coordinate::new(0.009, 0.018, 60.0),
        ]);
        let config = CourseConfig {
            points_per_km: 10.0,
            ..CourseConfig::default()
        };
        Arc::new(CourseSnapshot::build(&raw, &config))
    }

    fn sync() -> HoverSync {
        HoverSync::new(snapshot(), HoverConfig::default())
    }

    /// A chart/map pair whose toolkits re-emit hover callbacks for
    /// programmatic updates, tagged with the origin they were given.
    #[derive(Default)]
    struct EchoingSink {
        inner: RecordingSink,
        chart_echoes: Vec<(usize, Surface)>,
        map_echoes: Vec<(Coordinate, Surface)>,
    }

    impl RenderSink for EchoingSink {
        fn set_cursor(&mut self, coordinate: Coordinate, origin: Surface) {
            self.inner.set_cursor(coordinate, origin);
            self.map_echoes.push((coordinate, origin));
        }
        fn clear_cursor(&mut self) {
            self.inner.clear_cursor();
        }
        fn set_highlight(&mut self, index: usize, origin: Surface) {
            self.inner.set_highlight(index, origin);
            self.chart_echoes.push((index, origin));
        }
        fn clear_highlight(&mut self) {
            self.inner.clear_highlight();
        }
        fn set_markers(&mut self, markers: &MarkerPlan) {
            self.inner.set_markers(markers);
        }
    }

    #[test]
    fn chart_pointer_moves_map_cursor_to_sample() {
        let mut hs = sync();
        let mut sink = RecordingSink::new();
        let course = Arc::clone(hs.course());

        assert!(hs.chart_pointer(Time(0.0), 5, Surface::Chart, &mut sink));
        assert_eq!(
            sink.calls(),
            &[RenderCall::SetCursor {
                coordinate: course.route.points()[5],
                origin: Surface::Chart,
            }]
        );
        assert_eq!(hs.state().phase, HoverPhase::Hovering { origin: Surface::Chart });
        assert_eq!(hs.state().pointer_over, Some(Surface::Chart));
    }

    #[test]
    fn chart_index_past_the_end_clamps_to_finish() {
        let mut hs = sync();
        let mut sink = RecordingSink::new();
        let finish = hs.course().route.last().unwrap();
        assert!(hs.chart_pointer(Time(0.0), 10_000, Surface::Chart, &mut sink));
        assert_eq!(
            sink.calls()[0],
            RenderCall::SetCursor { coordinate: finish, origin: Surface::Chart }
        );
    }

    #[test]
    fn map_pointer_on_vertex_selects_matching_chart_index() {
        let mut hs = sync();
        let mut sink = RecordingSink::new();
        let course = Arc::clone(hs.course());
        let query = course.route.points()[3];
        let expected = course.profile.nearest_index(course.profile.distance[3]).unwrap();
        assert_eq!(expected, 3);

        assert!(hs.map_pointer(Time(0.0), query, Surface::Map, &mut sink));
        assert_eq!(
            sink.calls(),
            &[RenderCall::SetHighlight { index: 3, origin: Surface::Map }]
        );
        assert_eq!(hs.state().phase, HoverPhase::Hovering { origin: Surface::Map });
    }

    #[test]
    fn map_origin_chart_echo_does_not_loop_back() {
        let mut hs = sync();
        let mut sink = EchoingSink::default();
        let query = hs.course().route.points()[3];

        assert!(hs.map_pointer(Time(0.0), query, Surface::Map, &mut sink));
        assert_eq!(sink.inner.cursor_updates(), 0);
        assert_eq!(sink.inner.highlight_updates(), 1);

        // The chart reports the highlight we just set as a hover, tagged Map.
        assert_eq!(sink.chart_echoes, vec![(3, Surface::Map)]);

        // Keep feeding every re-emitted callback from both views back in
        // until nothing new is produced.
        let mut accepted = 0;
        for round in 1..=5 {
            let chart = std::mem::take(&mut sink.chart_echoes);
            let map = std::mem::take(&mut sink.map_echoes);
            if chart.is_empty() && map.is_empty() {
                break;
            }
            let now = Time(0.01 * f64::from(round));
            for (index, origin) in chart {
                accepted += usize::from(hs.chart_pointer(now, index, origin, &mut sink));
            }
            for (coordinate, origin) in map {
                accepted += usize::from(hs.map_pointer(now, coordinate, origin, &mut sink));
            }
        }
        assert_eq!(accepted, 0);
        assert!(sink.chart_echoes.is_empty());
        assert!(sink.map_echoes.is_empty());
        assert_eq!(sink.inner.cursor_updates(), 0);
        assert_eq!(sink.inner.highlight_updates(), 1);
        assert_eq!(hs.state().phase, HoverPhase::Hovering { origin: Surface::Map });
        assert!(hs.events().iter().any(|e| e.event
            == SyncEvent::EchoSuppressed { surface: Surface::Chart, origin: Surface::Map }));
    }

    #[test]
    fn chart_origin_map_echo_does_not_loop_back() {
        let mut hs = sync();
        let mut sink = EchoingSink::default();

        assert!(hs.chart_pointer(Time(0.0), 7, Surface::Chart, &mut sink));
        let echoes = std::mem::take(&mut sink.map_echoes);
        assert_eq!(echoes.len(), 1);
        for (coordinate, origin) in echoes {
            assert!(!hs.map_pointer(Time(0.001), coordinate, origin, &mut sink));
        }
        assert_eq!(sink.inner.highlight_updates(), 0);
        assert_eq!(hs.state().phase, HoverPhase::Hovering { origin: Surface::Chart });
    }

    #[test]
    fn leaving_clears_after_settle_delay() {
        let mut hs = sync();
        let mut sink = RecordingSink::new();
        hs.chart_pointer(Time(1.0), 2, Surface::Chart, &mut sink);
        sink.take();

        hs.pointer_left(Time(1.0), Surface::Chart);
        assert_eq!(hs.state().pointer_over, None);
        assert_eq!(hs.next_deadline(), Some(Time(1.0).after(0.05)));

        assert!(!hs.tick(Time(1.02), &mut sink));
        assert!(sink.calls().is_empty());
        assert_eq!(hs.state().phase, HoverPhase::Hovering { origin: Surface::Chart });

        assert!(hs.tick(Time(1.1), &mut sink));
        assert_eq!(sink.calls(), &[RenderCall::ClearCursor, RenderCall::ClearHighlight]);
        assert_eq!(hs.state().phase, HoverPhase::Idle);
        assert_eq!(hs.next_deadline(), None);
    }

    #[test]
    fn crossing_the_gap_cancels_the_clear() {
        let mut hs = sync();
        let mut sink = RecordingSink::new();
        hs.chart_pointer(Time(1.0), 2, Surface::Chart, &mut sink);
        hs.pointer_left(Time(1.0), Surface::Chart);

        // Arrive on the map before the settle delay elapses.
        let on_map = hs.course().route.points()[4];
        assert!(hs.map_pointer(Time(1.03), on_map, Surface::Map, &mut sink));
        sink.take();

        assert!(!hs.tick(Time(5.0), &mut sink));
        assert!(sink.calls().is_empty());
        assert_eq!(hs.state().phase, HoverPhase::Hovering { origin: Surface::Map });

        let kinds: Vec<SyncEvent> = hs.drain_events().into_iter().map(|e| e.event).collect();
        assert!(kinds.contains(&SyncEvent::ClearCancelled));
        assert!(kinds.contains(&SyncEvent::HoverStarted { origin: Surface::Map }));
    }

    #[test]
    fn late_chart_leave_does_not_clear_map_hover() {
        let mut hs = sync();
        let mut sink = RecordingSink::new();
        hs.chart_pointer(Time(1.0), 2, Surface::Chart, &mut sink);
        let on_map = hs.course().route.points()[4];
        assert!(hs.map_pointer(Time(1.01), on_map, Surface::Map, &mut sink));
        sink.take();

        // The chart's leave is delivered after the map already saw the pointer.
        hs.pointer_left(Time(1.02), Surface::Chart);
        assert_eq!(hs.state().pointer_over, Some(Surface::Map));
        assert_eq!(hs.next_deadline(), None);

        assert!(!hs.tick(Time(2.0), &mut sink));
        assert!(sink.calls().is_empty());
        assert_eq!(hs.state().phase, HoverPhase::Hovering { origin: Surface::Map });

        // Leaving the map as well clears after the settle delay.
        hs.pointer_left(Time(3.0), Surface::Map);
        assert_eq!(hs.state().pointer_over, None);
        assert!(hs.tick(Time(3.5), &mut sink));
        assert_eq!(sink.calls(), &[RenderCall::ClearCursor, RenderCall::ClearHighlight]);
        assert_eq!(hs.state().phase, HoverPhase::Idle);
    }

    #[test]
    fn leaving_while_idle_schedules_nothing() {
        let mut hs = sync();
        hs.pointer_left(Time(0.0), Surface::Map);
        assert_eq!(hs.next_deadline(), None);
        assert!(hs.events().is_empty());
    }

    #[test]
    fn repeated_leaves_keep_one_pending_clear() {
        let mut hs = sync();
        let mut sink = RecordingSink::new();
        hs.chart_pointer(Time(0.0), 1, Surface::Chart, &mut sink);
        hs.pointer_left(Time(0.0), Surface::Chart);
        hs.pointer_left(Time(0.5), Surface::Map);
        assert_eq!(hs.next_deadline(), Some(Time(0.5).after(0.05)));
        sink.take();
        assert!(!hs.tick(Time(0.3), &mut sink));
        assert!(hs.tick(Time(1.0), &mut sink));
        assert_eq!(sink.calls().len(), 2);
    }

    #[test]
    fn empty_course_skips_without_changing_state() {
        let empty = Arc::new(CourseSnapshot::build(&Route::empty(), &CourseConfig::default()));
        let mut hs = HoverSync::new(empty, HoverConfig::default());
        let mut sink = RecordingSink::new();
        assert!(!hs.chart_pointer(Time(0.0), 0, Surface::Chart, &mut sink));
        assert!(!hs.map_pointer(Time(0.0), Coordinate::flat(0.0, 0.0), Surface::Map, &mut sink));
        assert!(sink.calls().is_empty());
        assert_eq!(hs.state().phase, HoverPhase::Idle);
    }

    #[test]
    fn replacing_course_resets_hover_and_pushes_markers() {
        let mut hs = sync();
        let mut sink = RecordingSink::new();
        hs.chart_pointer(Time(0.0), 1, Surface::Chart, &mut sink);
        hs.pointer_left(Time(0.0), Surface::Chart);
        sink.take();

        hs.set_course(Time(0.01), snapshot(), &mut sink);
        assert_eq!(
            sink.calls(),
            &[
                RenderCall::ClearCursor,
                RenderCall::ClearHighlight,
                RenderCall::SetMarkers { regular: 0, halfway: true },
            ]
        );
        assert_eq!(hs.state().phase, HoverPhase::Idle);
        assert_eq!(hs.next_deadline(), None);
        sink.take();
        assert!(!hs.tick(Time(1.0), &mut sink));
    }
}
