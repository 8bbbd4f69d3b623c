use super::types::{AcId, DesId, PartId, SimId};
use serde::Serialize;

/// How an aircraft cycle began.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventPath {
    /// Seeded flying at time zero.
    InitialFleet,
    /// Seeded without a part at time zero.
    InitialMicap,
    /// Launched when a part was installed at the end of a prior cycle.
    Relaunch,
}

/// One fleet/backorder cycle of a physical aircraft; one output row.
///
/// `fleet_part` is the part instance flown during the fleet stage;
/// `install_part` is the instance that ended the cycle by being installed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AircraftCycle {
    pub des_id: DesId,
    pub ac_id: AcId,
    pub fleet_part: Option<SimId>,
    pub fleet_start: Option<f64>,
    pub fleet_end: Option<f64>,
    pub fleet_duration: Option<f64>,
    pub micap_start: Option<f64>,
    pub micap_end: Option<f64>,
    pub micap_duration: Option<f64>,
    pub install_part: Option<(SimId, PartId)>,
    pub install_start: Option<f64>,
    pub install_end: Option<f64>,
    pub event_path: EventPath,
}

impl AircraftCycle {
    pub(crate) fn new(des_id: DesId, ac_id: AcId, event_path: EventPath) -> Self {
        Self {
            des_id,
            ac_id,
            fleet_part: None,
            fleet_start: None,
            fleet_end: None,
            fleet_duration: None,
            micap_start: None,
            micap_end: None,
            micap_duration: None,
            install_part: None,
            install_start: None,
            install_end: None,
            event_path,
        }
    }
}
