use super::types::{DesId, PartId, SimId};

/// Closed set of event kinds; each carries the identity of the entity it
/// targets, so dispatch is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// An aircraft reaches the end of its fleet stage and its part comes off-wing.
    FleetComplete { des_id: DesId },
    /// A part finishes its depot repair.
    DepotComplete { sim_id: SimId },
    /// A replacement part ordered after a condemnation arrives.
    NewPartArrives { part_id: PartId },
}

/// A scheduled occurrence. Immutable once created; consumed exactly once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
    /// Insertion sequence, the tie-break among same-instant events.
    pub seq: u64,
}
