use super::errors::SimError;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct SlotTime(f64);

impl PartialEq for SlotTime {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SlotTime {}

impl PartialOrd for SlotTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SlotTime {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for a min-heap: only the earliest free time matters.
        other.0.total_cmp(&self.0)
    }
}

/// Capacity-constrained repair slot tracker.
///
/// Slots have no identity; the scheduler is a min-heap of "earliest time a
/// slot becomes free", sized to the configured slot count, so each call is
/// O(log C) regardless of total load.
///
/// `assign` must be invoked across all ready parts in non-decreasing order of
/// `ready_time` — the scheduler performs no correction for out-of-order
/// calls. The engine guarantees this by sorting every pending-ready part
/// chronologically before each assignment pass. Every `assign` must be
/// followed by a `release(start + duration)` once the repair duration is
/// known; the split exists because the duration is sampled by the caller
/// after assignment.
pub struct DepotScheduler {
    free_at: BinaryHeap<SlotTime>,
    capacity: usize,
}

impl DepotScheduler {
    /// Create a scheduler with `capacity` slots, all free at time zero.
    pub fn new(capacity: usize) -> Self {
        let mut free_at = BinaryHeap::with_capacity(capacity);
        for _ in 0..capacity {
            free_at.push(SlotTime(0.0));
        }
        Self { free_at, capacity }
    }

    /// Claim the earliest free slot for a part ready at `ready_time`.
    ///
    /// Returns the repair start time: `max(ready_time, earliest free slot)`.
    /// The claimed slot stays out of the pool until `release` is called.
    pub fn assign(&mut self, ready_time: f64) -> Result<f64, SimError> {
        let SlotTime(earliest) = self.free_at.pop().ok_or(SimError::DepotExhausted)?;
        Ok(ready_time.max(earliest))
    }

    /// Return a claimed slot to the pool, free again at `free_time`.
    pub fn release(&mut self, free_time: f64) {
        self.free_at.push(SlotTime(free_time));
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently in the pool (not claimed by an in-flight `assign`).
    pub fn idle_slots(&self) -> usize {
        self.free_at.len()
    }
}
