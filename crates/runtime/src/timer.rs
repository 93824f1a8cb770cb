use foundation::math::precision::stable_total_cmp_f64;
use foundation::time::Time;

/// Handle to a scheduled timer. Ids are never reused within a queue.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Pending<T> {
    id: TimerId,
    deadline: Time,
    payload: T,
}

/// Cancellable one-shot timers driven by an external clock.
///
/// The queue never sleeps or spawns; the host calls [`TimerQueue::fire_due`]
/// with the current time (typically once per frame or per input event).
///
/// Ordering contract:
/// - Due timers fire in `(deadline, id)` order, so timers with equal
///   deadlines fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire `delay_s` seconds after `now`.
    pub fn schedule(&mut self, now: Time, delay_s: f64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(Pending {
            id,
            deadline: now.after(delay_s),
            payload,
        });
        id
    }

    /// Cancel a pending timer.
    ///
    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn deadline(&self, id: TimerId) -> Option<Time> {
        self.pending.iter().find(|p| p.id == id).map(|p| p.deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove and return every timer whose deadline is `<= now`.
    pub fn fire_due(&mut self, now: Time) -> Vec<(TimerId, T)> {
        let (mut due, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| now.reached(p.deadline));
        self.pending = keep;

        due.sort_by(|a, b| {
            stable_total_cmp_f64(a.deadline.0, b.deadline.0).then_with(|| a.id.cmp(&b.id))
        });
        due.into_iter().map(|p| (p.id, p.payload)).collect()
    }
}
