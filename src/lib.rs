pub mod core;

// Re-export commonly used types
pub use crate::core::config::SimConfig;
pub use crate::core::engine::{run_replications, SimulationEngine};
pub use crate::core::errors::{ConfigError, RunError, SimError};
pub use crate::core::output::{ResolvedBy, RunOutput, RunWarning, WarningKind, WipSample};
pub use crate::core::sampling::DurationDist;
