use super::types::{AcId, DesId, PartId, SimId, Stage};
use serde::Serialize;

/// One repair/use cycle of a physical part; one output row.
///
/// Timestamps are `None` while a stage has not happened (or not finished).
/// `fleet_ac` is the aircraft cycle the part flew with; `install_ac` is the
/// aircraft cycle it resolved at the end of the repair path — two slots
/// because removal and installation are distinct events, possibly on
/// different aircraft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartCycle {
    pub sim_id: SimId,
    pub part_id: PartId,
    pub fleet_ac: Option<(DesId, AcId)>,
    pub fleet_start: Option<f64>,
    pub fleet_end: Option<f64>,
    pub fleet_duration: Option<f64>,
    pub condition_f_start: Option<f64>,
    pub condition_f_end: Option<f64>,
    pub depot_start: Option<f64>,
    pub depot_end: Option<f64>,
    pub install_ac: Option<(DesId, AcId)>,
    pub condition_a_start: Option<f64>,
    pub condition_a_end: Option<f64>,
    pub install_start: Option<f64>,
    pub install_end: Option<f64>,
    /// Completed repair cycles for this `part_id`, after any depot pass this
    /// row contains.
    pub cycle: u32,
    pub condemned: bool,
    #[serde(skip)]
    pub(crate) open_stage: Option<Stage>,
    #[serde(skip)]
    pub(crate) last_closed: Option<Stage>,
}

impl PartCycle {
    pub(crate) fn new(sim_id: SimId, part_id: PartId, cycle: u32) -> Self {
        Self {
            sim_id,
            part_id,
            fleet_ac: None,
            fleet_start: None,
            fleet_end: None,
            fleet_duration: None,
            condition_f_start: None,
            condition_f_end: None,
            depot_start: None,
            depot_end: None,
            install_ac: None,
            condition_a_start: None,
            condition_a_end: None,
            install_start: None,
            install_end: None,
            cycle,
            condemned: false,
            open_stage: None,
            last_closed: None,
        }
    }

    pub(crate) fn stage_start(&self, stage: Stage) -> Option<f64> {
        match stage {
            Stage::Fleet => self.fleet_start,
            Stage::ConditionF => self.condition_f_start,
            Stage::Depot => self.depot_start,
            Stage::ConditionA => self.condition_a_start,
            Stage::Install => self.install_start,
        }
    }

    pub(crate) fn set_stage_start(&mut self, stage: Stage, time: f64) {
        match stage {
            Stage::Fleet => self.fleet_start = Some(time),
            Stage::ConditionF => self.condition_f_start = Some(time),
            Stage::Depot => self.depot_start = Some(time),
            Stage::ConditionA => self.condition_a_start = Some(time),
            Stage::Install => self.install_start = Some(time),
        }
    }

    pub(crate) fn set_stage_end(&mut self, stage: Stage, time: f64) {
        match stage {
            Stage::Fleet => self.fleet_end = Some(time),
            Stage::ConditionF => self.condition_f_end = Some(time),
            Stage::Depot => self.depot_end = Some(time),
            Stage::ConditionA => self.condition_a_end = Some(time),
            Stage::Install => self.install_end = Some(time),
        }
    }
}
