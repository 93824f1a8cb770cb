use foundation::time::Time;

/// An event stamped with the clock reading it was emitted at.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<E> {
    pub time: Time,
    pub event: E,
}

/// Append-only trace of typed events, in emission order.
///
/// Hosts drain it once per frame (or tests inspect it) to see what a state
/// machine did and when.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<Stamped<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, time: Time, event: E) {
        self.events.push(Stamped { time, event });
    }

    pub fn events(&self) -> &[Stamped<E>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Stamped<E>> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
