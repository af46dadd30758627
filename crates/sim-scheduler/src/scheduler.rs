//! The ordered event queue and the `run_until` drive loop.

use crate::event::{Event, EventHandle};
use sim_types::SimTime;
use std::cell::Cell;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::rc::Rc;

/// Why `run_until` stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The next pending event's `fire_time` is past the configured horizon.
    MaxTimeReached,
    /// The queue drained with nothing left to dispatch.
    QueueEmpty,
    /// The dispatched-event cap was hit.
    MaxEventsReached,
}

struct QueueEntry<P> {
    event: Event<P>,
}

impl<P> PartialEq for QueueEntry<P> {
    fn eq(&self, other: &Self) -> bool {
        self.event.fire_time == other.event.fire_time
            && self.event.insertion_seq == other.event.insertion_seq
    }
}
impl<P> Eq for QueueEntry<P> {}

impl<P> PartialOrd for QueueEntry<P> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for QueueEntry<P> {
    /// Orders by `(fire_time, insertion_seq)` ascending, so that wrapping
    /// this in `Reverse` turns `BinaryHeap` (a max-heap) into the min-heap
    /// the scheduler needs.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.event
            .fire_time
            .cmp(&other.event.fire_time)
            .then_with(|| self.event.insertion_seq.cmp(&other.event.insertion_seq))
    }
}

/// A payload-agnostic discrete-event scheduler.
///
/// `P` is whatever event payload type the caller wants to dispatch; this
/// crate never inspects it.
pub struct Scheduler<P> {
    queue: BinaryHeap<Reverse<QueueEntry<P>>>,
    current_time: SimTime,
    next_seq: u64,
}

impl<P> Default for Scheduler<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Scheduler<P> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            current_time: SimTime::ZERO,
            next_seq: 0,
        }
    }

    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Schedules `payload` to fire at `fire_time`, which must be `>=
    /// current_time` (the caller is responsible for never scheduling into
    /// the past; the scheduler trusts it rather than silently clamping).
    pub fn schedule(&mut self, fire_time: SimTime, payload: P) -> EventHandle {
        let ignored = Rc::new(Cell::new(false));
        let seq = self.next_seq;
        self.next_seq += 1;
        let event = Event {
            fire_time,
            insertion_seq: seq,
            payload,
            ignored: ignored.clone(),
        };
        self.queue.push(Reverse(QueueEntry { event }));
        EventHandle::new(ignored)
    }

    /// Drains the queue, invoking `dispatch` for every non-ignored event in
    /// `(fire_time, insertion_seq)` order, until one of the three
    /// termination conditions fires.
    ///
    /// `dispatch` receives `&mut self` so handlers can schedule further
    /// events (always `>= current_time`, enforced by construction since
    /// `current_time` only ever moves forward to a popped event's
    /// `fire_time`).
    pub fn run_until(
        &mut self,
        max_time: SimTime,
        max_events: Option<usize>,
        mut dispatch: impl FnMut(&mut Scheduler<P>, P, SimTime),
    ) -> StopReason {
        let mut dispatched = 0usize;
        loop {
            let Some(Reverse(top)) = self.queue.peek() else {
                return StopReason::QueueEmpty;
            };
            if top.event.fire_time.as_f64() > max_time.as_f64() {
                return StopReason::MaxTimeReached;
            }

            let Reverse(entry) = self.queue.pop().expect("peeked entry must be present");
            if entry.event.is_ignored() {
                continue;
            }

            self.current_time = entry.event.fire_time;
            let fire_time = entry.event.fire_time;
            dispatch(self, entry.event.payload, fire_time);
            dispatched += 1;

            if let Some(cap) = max_events {
                if dispatched >= cap {
                    return StopReason::MaxEventsReached;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_in_fire_time_order() {
        let mut sched: Scheduler<&'static str> = Scheduler::new();
        sched.schedule(SimTime(3.0), "third");
        sched.schedule(SimTime(1.0), "first");
        sched.schedule(SimTime(2.0), "second");

        let mut order = Vec::new();
        sched.run_until(SimTime(100.0), None, |_, p, _| order.push(p));
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn simultaneous_events_fire_in_insertion_order() {
        let mut sched: Scheduler<u32> = Scheduler::new();
        sched.schedule(SimTime(5.0), 1);
        sched.schedule(SimTime(5.0), 2);
        sched.schedule(SimTime(5.0), 3);

        let mut order = Vec::new();
        sched.run_until(SimTime(100.0), None, |_, p, _| order.push(p));
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn cancelled_event_is_skipped_silently() {
        let mut sched: Scheduler<&'static str> = Scheduler::new();
        let handle = sched.schedule(SimTime(1.0), "cancel me");
        sched.schedule(SimTime(2.0), "keep me");
        handle.cancel();

        let mut order = Vec::new();
        sched.run_until(SimTime(100.0), None, |_, p, _| order.push(p));
        assert_eq!(order, vec!["keep me"]);
    }

    #[test]
    fn stops_at_max_time_without_consuming_future_events() {
        let mut sched: Scheduler<u32> = Scheduler::new();
        sched.schedule(SimTime(10.0), 1);
        sched.schedule(SimTime(20.0), 2);

        let mut order = Vec::new();
        let reason = sched.run_until(SimTime(15.0), None, |_, p, _| order.push(p));
        assert_eq!(order, vec![1]);
        assert_eq!(reason, StopReason::MaxTimeReached);
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn stops_at_max_events_cap() {
        let mut sched: Scheduler<u32> = Scheduler::new();
        for i in 0..5 {
            sched.schedule(SimTime(i as f64), i);
        }
        let mut count = 0;
        let reason = sched.run_until(SimTime(100.0), Some(2), |_, _, _| count += 1);
        assert_eq!(count, 2);
        assert_eq!(reason, StopReason::MaxEventsReached);
    }

    #[test]
    fn handler_can_schedule_further_events() {
        let mut sched: Scheduler<u32> = Scheduler::new();
        sched.schedule(SimTime(1.0), 1);
        let mut order = Vec::new();
        sched.run_until(SimTime(100.0), None, |s, p, t| {
            order.push(p);
            if p == 1 {
                s.schedule(t + 1.0, 2);
            }
        });
        assert_eq!(order, vec![1, 2]);
    }
}
