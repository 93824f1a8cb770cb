/// Caller-supplied clock reading, in seconds.
///
/// Nothing in the engine reads wall-clock time; hosts pass `Time` with each
/// event so timers are deterministic and replayable.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }

    pub fn after(self, delay_s: f64) -> Self {
        Time(self.0 + delay_s.max(0.0))
    }

    /// `true` once `self` has reached `deadline`.
    pub fn reached(self, deadline: Time) -> bool {
        self.0 >= deadline.0
    }
}
