use super::aircraft::{AircraftCycle, EventPath};
use super::errors::SimError;
use super::micap_queue::{MicapEntry, MicapQueue};
use super::output::{MicapResolution, ResolvedBy};
use super::types::{AcId, DesId, PartId, SimId, Stage};
use std::collections::HashMap;

/// Owner of every in-flight aircraft cycle and of the backorder queue.
pub struct AircraftManager {
    active: HashMap<DesId, AircraftCycle>,
    log: Vec<AircraftCycle>,
    micap_queue: MicapQueue,
    micap_history: Vec<MicapResolution>,
    next_des_id: DesId,
}

impl AircraftManager {
    pub fn new() -> Self {
        Self {
            active: HashMap::new(),
            log: Vec::new(),
            micap_queue: MicapQueue::new(),
            micap_history: Vec::new(),
            next_des_id: 0,
        }
    }

    /// Open a cycle that starts flying at `start` with `part_sim` installed.
    pub fn begin_fleet_cycle(
        &mut self,
        ac_id: AcId,
        start: f64,
        duration: f64,
        part_sim: SimId,
        path: EventPath,
    ) -> DesId {
        let des_id = self.next_des_id;
        self.next_des_id += 1;
        let mut record = AircraftCycle::new(des_id, ac_id, path);
        record.fleet_start = Some(start);
        record.fleet_duration = Some(duration);
        record.fleet_part = Some(part_sim);
        self.active.insert(des_id, record);
        des_id
    }

    /// Open a cycle that starts without a part and queue it immediately.
    pub fn begin_micap_cycle(
        &mut self,
        ac_id: AcId,
        time: f64,
        path: EventPath,
    ) -> Result<DesId, SimError> {
        let des_id = self.next_des_id;
        self.next_des_id += 1;
        self.active
            .insert(des_id, AircraftCycle::new(des_id, ac_id, path));
        self.enter_backorder(des_id, time)?;
        Ok(des_id)
    }

    /// Close the fleet stage of an active cycle.
    pub fn close_fleet(&mut self, des_id: DesId, end: f64) -> Result<(), SimError> {
        let record = self
            .active
            .get_mut(&des_id)
            .ok_or(SimError::UnknownInstance(des_id))?;
        let start = record.fleet_start.unwrap_or(end);
        if end < start {
            return Err(SimError::NonMonotonicTime {
                id: des_id,
                stage: Stage::Fleet,
                start,
                end,
            });
        }
        record.fleet_end = Some(end);
        Ok(())
    }

    /// Record `micap_start` on the cycle and queue the aircraft.
    ///
    /// A duplicate means single-active-instance-per-aircraft was violated
    /// upstream; the queue is left untouched and the error is surfaced rather
    /// than silently dropped.
    pub fn enter_backorder(&mut self, des_id: DesId, time: f64) -> Result<(), SimError> {
        let record = self
            .active
            .get_mut(&des_id)
            .ok_or(SimError::UnknownInstance(des_id))?;
        self.micap_queue.add(MicapEntry {
            ac_id: record.ac_id,
            des_id,
            micap_start: time,
        })?;
        record.micap_start = Some(time);
        Ok(())
    }

    /// Resolve the backorder for `ac_id`, recording end time and duration.
    ///
    /// Returns `None` when the aircraft was never queued; callers treat that
    /// as "not in backorder", not as an error.
    pub fn resolve_backorder(
        &mut self,
        ac_id: AcId,
        end_time: f64,
        resolved_by: ResolvedBy,
    ) -> Result<Option<DesId>, SimError> {
        let entry = match self.micap_queue.remove_by_id(ac_id) {
            Some(entry) => entry,
            None => return Ok(None),
        };
        let record = self
            .active
            .get_mut(&entry.des_id)
            .ok_or(SimError::UnknownInstance(entry.des_id))?;
        let duration = end_time - entry.micap_start;
        record.micap_end = Some(end_time);
        record.micap_duration = Some(duration);
        self.micap_history.push(MicapResolution {
            des_id: entry.des_id,
            ac_id,
            micap_start: entry.micap_start,
            micap_end: end_time,
            micap_duration: duration,
            resolved_by,
        });
        Ok(Some(entry.des_id))
    }

    /// Record the zero-length installation that ends a cycle.
    pub fn install_part(
        &mut self,
        des_id: DesId,
        part: (SimId, PartId),
        time: f64,
    ) -> Result<(), SimError> {
        let record = self
            .active
            .get_mut(&des_id)
            .ok_or(SimError::UnknownInstance(des_id))?;
        record.install_part = Some(part);
        record.install_start = Some(time);
        record.install_end = Some(time);
        Ok(())
    }

    /// Move a finished cycle to the append-only log.
    pub fn complete_cycle(&mut self, des_id: DesId) -> Result<(), SimError> {
        let record = self
            .active
            .remove(&des_id)
            .ok_or(SimError::UnknownInstance(des_id))?;
        self.log.push(record);
        Ok(())
    }

    pub fn get(&self, des_id: DesId) -> Option<&AircraftCycle> {
        self.active.get(&des_id)
    }

    /// Oldest queued backorder without removing it.
    pub fn peek_micap(&self) -> Option<&MicapEntry> {
        self.micap_queue.peek_first()
    }

    pub fn micap_count(&self) -> usize {
        self.micap_queue.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Read-only view of the in-flight cycles.
    pub fn snapshot_active(&self) -> Vec<&AircraftCycle> {
        let mut records: Vec<&AircraftCycle> = self.active.values().collect();
        records.sort_by_key(|record| record.des_id);
        records
    }

    /// Take the completed-cycle log for output assembly. Open cycles stay.
    pub fn drain_log(&mut self) -> Vec<AircraftCycle> {
        std::mem::take(&mut self.log)
    }

    /// Take the resolved-backorder history for output assembly.
    pub fn drain_micap_history(&mut self) -> Vec<MicapResolution> {
        std::mem::take(&mut self.micap_history)
    }
}

impl Default for AircraftManager {
    fn default() -> Self {
        Self::new()
    }
}
