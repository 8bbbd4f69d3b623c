use serde::Serialize;

/// Persistent part identifier, shared by every repair cycle of one physical part.
pub type PartId = u32;

/// Persistent aircraft identifier.
pub type AcId = u32;

/// Unique identifier of one part repair cycle (one output row).
pub type SimId = u64;

/// Unique identifier of one aircraft fleet/backorder cycle (one output row).
pub type DesId = u64;

/// Lifecycle stage of a part instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    /// Installed and flying on an aircraft.
    Fleet,
    /// Off-wing, awaiting a depot repair slot.
    ConditionF,
    /// Under capacity-constrained repair.
    Depot,
    /// Repaired, serviceable stock.
    ConditionA,
    /// Zero-length installation onto an aircraft.
    Install,
}

impl Stage {
    /// Whether this stage may open after `completed` closed.
    ///
    /// A fresh instance may open at any stage except Install (initial seeding
    /// and new-part arrivals start mid-graph); thereafter only the forward
    /// path Fleet -> ConditionF -> Depot -> ConditionA -> Install is legal.
    pub fn may_follow(self, completed: Option<Stage>) -> bool {
        match (completed, self) {
            (None, Stage::Fleet) => true,
            (None, Stage::ConditionF) => true,
            (None, Stage::Depot) => true,
            (None, Stage::ConditionA) => true,
            (Some(Stage::Fleet), Stage::ConditionF) => true,
            (Some(Stage::ConditionF), Stage::Depot) => true,
            (Some(Stage::Depot), Stage::ConditionA) => true,
            (Some(Stage::ConditionA), Stage::Install) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Fleet => "fleet",
            Stage::ConditionF => "condition_f",
            Stage::Depot => "depot",
            Stage::ConditionA => "condition_a",
            Stage::Install => "install",
        };
        write!(f, "{}", name)
    }
}
