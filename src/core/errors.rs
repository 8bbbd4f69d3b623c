use super::types::{AcId, PartId, Stage};

/// Fatal simulation errors.
///
/// Queue- and index-level violations mean the core invariants have already
/// been broken, so the run aborts instead of continuing in a possibly-corrupt
/// state. `DuplicateBackorder` is the one exception: the engine logs it and
/// aborts only the offending event.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Event scheduled at a negative or NaN time.
    InvalidTime(f64),
    /// Requested stage cannot follow the part's last completed stage.
    StageOrderViolation {
        part_id: PartId,
        requested: Stage,
        completed: Option<Stage>,
    },
    /// A stage was closed before it started.
    NonMonotonicTime {
        id: u64,
        stage: Stage,
        start: f64,
        end: f64,
    },
    /// No active instance with this identifier.
    UnknownInstance(u64),
    /// A condemned part was asked to produce a new instance.
    CondemnedPart(PartId),
    /// Aircraft is already queued for a backorder.
    DuplicateBackorder(AcId),
    /// A clock value is required for the requested selection strategy.
    MissingClock,
    /// More repairs in flight than the depot has slots.
    DepotExhausted,
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::InvalidTime(t) => write!(f, "invalid event time {}", t),
            SimError::StageOrderViolation {
                part_id,
                requested,
                completed,
            } => match completed {
                Some(prev) => write!(
                    f,
                    "part {}: stage {} cannot follow {}",
                    part_id, requested, prev
                ),
                None => write!(
                    f,
                    "part {}: stage {} cannot open a fresh instance",
                    part_id, requested
                ),
            },
            SimError::NonMonotonicTime {
                id,
                stage,
                start,
                end,
            } => write!(
                f,
                "instance {}: {} end {} precedes start {}",
                id, stage, end, start
            ),
            SimError::UnknownInstance(id) => write!(f, "no active instance {}", id),
            SimError::CondemnedPart(part_id) => {
                write!(f, "part {} is condemned and cannot be reopened", part_id)
            }
            SimError::DuplicateBackorder(ac_id) => {
                write!(f, "aircraft {} is already in the backorder queue", ac_id)
            }
            SimError::MissingClock => {
                write!(f, "selection strategy requires the current simulation time")
            }
            SimError::DepotExhausted => {
                write!(f, "depot slot requested with every slot already in flight")
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Configuration rejected before the run started. Lists every violated
/// constraint, not just the first.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Invalid(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid(problems) => {
                write!(f, "invalid configuration: {}", problems.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Either failure mode of a complete run attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    Config(ConfigError),
    Sim(SimError),
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<SimError> for RunError {
    fn from(e: SimError) -> Self {
        RunError::Sim(e)
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "{}", e),
            RunError::Sim(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RunError {}
