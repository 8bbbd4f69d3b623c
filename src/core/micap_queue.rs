use super::errors::SimError;
use super::types::{AcId, DesId};
use std::collections::{HashMap, HashSet, VecDeque};

/// The slice of an aircraft cycle a queued backorder needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicapEntry {
    pub ac_id: AcId,
    pub des_id: DesId,
    pub micap_start: f64,
}

/// Selection policy for pulling queued aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectStrategy {
    /// Oldest entries first (FIFO order).
    First,
    /// Longest accumulated wait first; needs the current simulation time.
    LongestWaiting,
}

/// FIFO queue of aircraft currently without a part.
///
/// Three structures carry the same membership: the ordered queue for FIFO
/// iteration, a lookup by `ac_id` for O(1) removal, and a membership set for
/// O(1) duplicate detection. No single structure gives all three, so every
/// mutating operation updates all of them or none of them before returning —
/// callers can never observe a torn update.
pub struct MicapQueue {
    queue: VecDeque<MicapEntry>,
    lookup: HashMap<AcId, MicapEntry>,
    active_ids: HashSet<AcId>,
}

impl MicapQueue {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            lookup: HashMap::new(),
            active_ids: HashSet::new(),
        }
    }

    /// Append an entry. Rejects a second entry for the same aircraft without
    /// touching any of the three structures.
    pub fn add(&mut self, entry: MicapEntry) -> Result<(), SimError> {
        if self.active_ids.contains(&entry.ac_id) {
            return Err(SimError::DuplicateBackorder(entry.ac_id));
        }
        self.queue.push_back(entry);
        self.lookup.insert(entry.ac_id, entry);
        self.active_ids.insert(entry.ac_id);
        Ok(())
    }

    /// Remove an aircraft by id. Lookup and membership drop in O(1); the
    /// ordered queue is rebuilt, the only O(n) step, bounded by the active
    /// backorder count.
    pub fn remove_by_id(&mut self, ac_id: AcId) -> Option<MicapEntry> {
        let entry = self.lookup.remove(&ac_id)?;
        self.active_ids.remove(&ac_id);
        self.queue.retain(|queued| queued.ac_id != ac_id);
        Some(entry)
    }

    /// FIFO removal of the oldest entry.
    pub fn pop_first(&mut self) -> Option<MicapEntry> {
        let entry = self.queue.pop_front()?;
        self.lookup.remove(&entry.ac_id);
        self.active_ids.remove(&entry.ac_id);
        Some(entry)
    }

    /// Oldest entry without removing it.
    pub fn peek_first(&self) -> Option<&MicapEntry> {
        self.queue.front()
    }

    /// Pull up to `count` entries by `strategy` without removing them.
    ///
    /// `LongestWaiting` ranks by `now - micap_start` descending and fails
    /// with `MissingClock` when `now` is absent.
    pub fn select(
        &self,
        count: usize,
        strategy: SelectStrategy,
        now: Option<f64>,
    ) -> Result<Vec<MicapEntry>, SimError> {
        let available = count.min(self.queue.len());
        match strategy {
            SelectStrategy::First => Ok(self.queue.iter().take(available).copied().collect()),
            SelectStrategy::LongestWaiting => {
                let now = now.ok_or(SimError::MissingClock)?;
                let mut ranked: Vec<MicapEntry> = self.queue.iter().copied().collect();
                // Stable sort keeps queue order among equal waits.
                ranked.sort_by(|a, b| {
                    (now - b.micap_start).total_cmp(&(now - a.micap_start))
                });
                ranked.truncate(available);
                Ok(ranked)
            }
        }
    }

    pub fn contains(&self, ac_id: AcId) -> bool {
        self.active_ids.contains(&ac_id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether the three structures agree on membership.
    pub fn is_synchronized(&self) -> bool {
        if self.queue.len() != self.lookup.len() || self.lookup.len() != self.active_ids.len() {
            return false;
        }
        self.queue
            .iter()
            .all(|entry| self.lookup.contains_key(&entry.ac_id) && self.active_ids.contains(&entry.ac_id))
    }
}

impl Default for MicapQueue {
    fn default() -> Self {
        Self::new()
    }
}
