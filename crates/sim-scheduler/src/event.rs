//! A scheduled event and the handle used to cancel it.

use sim_types::SimTime;
use std::cell::Cell;
use std::rc::Rc;

/// A pending or fired event.
///
/// `insertion_seq` is the scheduler-assigned tie-break for events sharing a
/// `fire_time`; events are dispatched in strict FIFO order among
/// simultaneous entries.
#[derive(Debug)]
pub struct Event<P> {
    pub fire_time: SimTime,
    pub insertion_seq: u64,
    pub payload: P,
    pub(crate) ignored: Rc<Cell<bool>>,
}

impl<P> Event<P> {
    pub fn is_ignored(&self) -> bool {
        self.ignored.get()
    }
}

/// A cancellable reference to a previously scheduled event.
///
/// Setting the flag does not remove the event from the queue; the
/// scheduler discards it silently when it would otherwise be popped. This
/// is how mining abandonment cancels a pending `ValidationComplete`.
#[derive(Clone, Debug)]
pub struct EventHandle {
    ignored: Rc<Cell<bool>>,
}

impl EventHandle {
    pub(crate) fn new(ignored: Rc<Cell<bool>>) -> Self {
        Self { ignored }
    }

    pub fn cancel(&self) {
        self.ignored.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.ignored.get()
    }
}
