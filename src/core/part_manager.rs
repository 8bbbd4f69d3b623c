use super::errors::SimError;
use super::part::PartCycle;
use super::types::{AcId, DesId, PartId, SimId, Stage};
use std::collections::{HashMap, HashSet};

/// Owner of every in-flight part instance.
///
/// Applies stage transitions, counts repair cycles, flags condemnation, and
/// appends finished instances to an append-only log. Exactly one stage is
/// open per active instance; closed instances are never mutated again.
pub struct PartManager {
    active: HashMap<SimId, PartCycle>,
    /// Active instance per part; a part has at most one instance in flight.
    part_index: HashMap<PartId, SimId>,
    log: Vec<PartCycle>,
    cycles_completed: HashMap<PartId, u32>,
    condemned: HashSet<PartId>,
    condemn_threshold: u32,
    next_sim_id: SimId,
    next_part_id: PartId,
}

impl PartManager {
    pub fn new(condemn_threshold: u32) -> Self {
        Self {
            active: HashMap::new(),
            part_index: HashMap::new(),
            log: Vec::new(),
            cycles_completed: HashMap::new(),
            condemned: HashSet::new(),
            condemn_threshold,
            next_sim_id: 0,
            next_part_id: 0,
        }
    }

    /// Allocate the next persistent part id (initial population and
    /// replacement orders).
    pub fn register_part(&mut self) -> PartId {
        let part_id = self.next_part_id;
        self.next_part_id += 1;
        part_id
    }

    /// Begin a new instance for `part_id`, or open the next stage of its
    /// active instance. The requested stage must legally follow the last
    /// completed one.
    pub fn open_instance(
        &mut self,
        part_id: PartId,
        stage: Stage,
        start_time: f64,
    ) -> Result<SimId, SimError> {
        if self.condemned.contains(&part_id) {
            return Err(SimError::CondemnedPart(part_id));
        }
        if let Some(&sim_id) = self.part_index.get(&part_id) {
            let record = self
                .active
                .get_mut(&sim_id)
                .ok_or(SimError::UnknownInstance(sim_id))?;
            if record.open_stage.is_some() || !stage.may_follow(record.last_closed) {
                return Err(SimError::StageOrderViolation {
                    part_id,
                    requested: stage,
                    completed: record.last_closed,
                });
            }
            record.open_stage = Some(stage);
            record.set_stage_start(stage, start_time);
            Ok(sim_id)
        } else {
            if !stage.may_follow(None) {
                return Err(SimError::StageOrderViolation {
                    part_id,
                    requested: stage,
                    completed: None,
                });
            }
            let sim_id = self.next_sim_id;
            self.next_sim_id += 1;
            let cycle = self.cycles_completed.get(&part_id).copied().unwrap_or(0);
            let mut record = PartCycle::new(sim_id, part_id, cycle);
            record.open_stage = Some(stage);
            record.set_stage_start(stage, start_time);
            self.active.insert(sim_id, record);
            self.part_index.insert(part_id, sim_id);
            Ok(sim_id)
        }
    }

    /// Close the instance's open stage at `end_time`.
    pub fn close_stage(&mut self, sim_id: SimId, end_time: f64) -> Result<(), SimError> {
        let record = self
            .active
            .get_mut(&sim_id)
            .ok_or(SimError::UnknownInstance(sim_id))?;
        let stage = record.open_stage.ok_or(SimError::StageOrderViolation {
            part_id: record.part_id,
            requested: record.last_closed.unwrap_or(Stage::Fleet),
            completed: record.last_closed,
        })?;
        let start = record.stage_start(stage).unwrap_or(end_time);
        if end_time < start {
            return Err(SimError::NonMonotonicTime {
                id: sim_id,
                stage,
                start,
                end: end_time,
            });
        }
        record.set_stage_end(stage, end_time);
        record.open_stage = None;
        record.last_closed = Some(stage);
        Ok(())
    }

    /// Count one completed repair cycle.
    ///
    /// Condemns the part when the count exceeds the configured threshold, or
    /// when the caller's condemnation-fraction draw came up true. A condemned
    /// part id never produces another instance.
    pub fn advance_cycle(&mut self, sim_id: SimId, condemn_draw: bool) -> Result<bool, SimError> {
        let record = self
            .active
            .get_mut(&sim_id)
            .ok_or(SimError::UnknownInstance(sim_id))?;
        record.cycle += 1;
        self.cycles_completed.insert(record.part_id, record.cycle);
        let condemned = record.cycle > self.condemn_threshold || condemn_draw;
        if condemned {
            record.condemned = true;
            self.condemned.insert(record.part_id);
        }
        Ok(condemned)
    }

    /// Record the aircraft cycle this instance flew its fleet stage with.
    pub fn link_fleet(&mut self, sim_id: SimId, des_id: DesId, ac_id: AcId) -> Result<(), SimError> {
        let record = self
            .active
            .get_mut(&sim_id)
            .ok_or(SimError::UnknownInstance(sim_id))?;
        record.fleet_ac = Some((des_id, ac_id));
        Ok(())
    }

    /// Record the aircraft cycle this instance was installed on.
    pub fn link_install(
        &mut self,
        sim_id: SimId,
        des_id: DesId,
        ac_id: AcId,
    ) -> Result<(), SimError> {
        let record = self
            .active
            .get_mut(&sim_id)
            .ok_or(SimError::UnknownInstance(sim_id))?;
        record.install_ac = Some((des_id, ac_id));
        Ok(())
    }

    pub fn set_fleet_duration(&mut self, sim_id: SimId, duration: f64) -> Result<(), SimError> {
        let record = self
            .active
            .get_mut(&sim_id)
            .ok_or(SimError::UnknownInstance(sim_id))?;
        record.fleet_duration = Some(duration);
        Ok(())
    }

    /// Move a finished instance to the append-only log.
    pub fn complete_instance(&mut self, sim_id: SimId) -> Result<(), SimError> {
        let record = self
            .active
            .remove(&sim_id)
            .ok_or(SimError::UnknownInstance(sim_id))?;
        self.part_index.remove(&record.part_id);
        self.log.push(record);
        Ok(())
    }

    pub fn get(&self, sim_id: SimId) -> Option<&PartCycle> {
        self.active.get(&sim_id)
    }

    pub fn is_condemned(&self, part_id: PartId) -> bool {
        self.condemned.contains(&part_id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Read-only view of the in-flight instances.
    pub fn snapshot_active(&self) -> Vec<&PartCycle> {
        let mut records: Vec<&PartCycle> = self.active.values().collect();
        records.sort_by_key(|record| record.sim_id);
        records
    }

    /// Take the completed-cycle log for output assembly. Open instances stay.
    pub fn drain_log(&mut self) -> Vec<PartCycle> {
        std::mem::take(&mut self.log)
    }
}
