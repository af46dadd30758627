//! The discrete-event scheduling substrate.
//!
//! A single logical clock `current_time` advances monotonically as events
//! are popped off an ordered priority queue. The scheduler is deliberately
//! payload-agnostic (`Scheduler<P>`): it knows nothing about transactions,
//! blocks, or nodes. `sim-runtime` instantiates it with the concrete event
//! payload enum that ties the rest of the system together.
//!
//! Cancellation is via a shared `ignored` flag rather than queue removal,
//! per the design note that a discrete-event simulator should decouple
//! cancellation from queue-entry lookup: the scheduler never searches the
//! heap, it just skips ignored entries as they reach the front.

mod event;
mod scheduler;

pub use event::{Event, EventHandle};
pub use scheduler::{Scheduler, StopReason};
