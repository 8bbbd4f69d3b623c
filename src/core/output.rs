use super::aircraft::AircraftCycle;
use super::part::PartCycle;
use super::types::{AcId, DesId};
use serde::Serialize;
use uuid::Uuid;

/// What freed the part that resolved a backorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolvedBy {
    /// Serviceable stock available at time zero.
    InitialSpare,
    /// A part completing depot repair.
    DepotPart,
    /// A newly ordered replacement part arriving.
    NewPart,
}

/// One resolved backorder, kept separately from the aircraft-cycle log
/// because downstream analysis needs backorder-specific duration statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MicapResolution {
    pub des_id: DesId,
    pub ac_id: AcId,
    pub micap_start: f64,
    pub micap_end: f64,
    pub micap_duration: f64,
    pub resolved_by: ResolvedBy,
}

/// Work-in-progress snapshot taken after each handled event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WipSample {
    pub time: f64,
    pub aircraft_micap: u32,
    pub parts_in_depot: u32,
    pub spares_available: u32,
}

/// Non-fatal anomaly categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    /// Active backorders exceed the aircraft population; should hold by
    /// construction but is cheap to double-check.
    MicapCountExceeded,
    /// An event referenced an entity whose linked instance does not exist.
    MissingLinkage,
    /// An aircraft was pushed into backorder twice; the offending event was
    /// dropped.
    DuplicateBackorder,
}

/// A soft error accumulated alongside continued execution. Distinct from the
/// fatal propagation path; returned to the caller with the output tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunWarning {
    pub time: f64,
    pub kind: WarningKind,
    pub message: String,
}

/// Everything a completed run emits. The tables are append-only snapshots:
/// one row per closed part cycle and per closed aircraft cycle; instances
/// still open at the horizon are excluded, never force-closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    pub run_id: Uuid,
    pub parts: Vec<PartCycle>,
    pub aircraft: Vec<AircraftCycle>,
    pub micap_history: Vec<MicapResolution>,
    pub wip_history: Vec<WipSample>,
    pub warnings: Vec<RunWarning>,
    pub events_processed: u64,
    pub end_time: f64,
}
