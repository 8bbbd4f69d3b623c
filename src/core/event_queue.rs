use super::errors::SimError;
use super::event::{Event, EventKind};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct QueuedEvent(Event);

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.0.time == other.0.time && self.0.seq == other.0.seq
    }
}

impl Eq for QueuedEvent {}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for a min-heap (BinaryHeap is max-heap by default).
        // Ties break on insertion sequence: same-instant events stay FIFO,
        // which keeps execution deterministic and reproducible.
        other
            .0
            .time
            .total_cmp(&self.0.time)
            .then_with(|| other.0.seq.cmp(&self.0.seq))
    }
}

/// Time-ordered queue of pending events; the single source of "what happens
/// next". Events are only ever removed by `pop_next` — cancellation is not
/// supported, handlers design around idempotent no-ops instead.
pub struct EventQueue {
    heap: BinaryHeap<QueuedEvent>,
    sequence_counter: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Insert an event at `time`. Rejects negative and NaN times.
    pub fn schedule(&mut self, time: f64, kind: EventKind) -> Result<(), SimError> {
        if time.is_nan() || time < 0.0 {
            return Err(SimError::InvalidTime(time));
        }
        self.heap.push(QueuedEvent(Event {
            time,
            kind,
            seq: self.sequence_counter,
        }));
        self.sequence_counter += 1;
        Ok(())
    }

    /// Remove and return the earliest event, insertion order breaking ties.
    pub fn pop_next(&mut self) -> Option<Event> {
        self.heap.pop().map(|queued| queued.0)
    }

    /// Time of the earliest pending event without removing it.
    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|queued| queued.0.time)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
