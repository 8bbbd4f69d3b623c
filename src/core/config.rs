use super::errors::ConfigError;
use super::sampling::DurationDist;
use serde::{Deserialize, Serialize};

/// Complete input bundle for one simulation run.
///
/// Validated before the run starts; `validate` reports every violated
/// constraint at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub n_total_aircraft: u32,
    pub n_total_parts: u32,
    /// Fraction of the fleet that should start mission capable, in [0, 1].
    pub mission_capable_rate: f64,
    pub fleet_dist: DurationDist,
    pub repair_dist: DurationDist,
    /// Concurrent repair slots at the depot.
    pub depot_capacity: usize,
    /// Completed repair cycles a part may reach before condemnation; a part
    /// is condemned when its count exceeds this threshold.
    pub condemn_cycle: u32,
    /// Probability of condemnation at each depot completion, independent of
    /// the cycle threshold.
    pub condemn_fraction: f64,
    /// Lead time between a condemnation and its replacement part arriving.
    pub part_order_lag: f64,
    pub parts_in_depot: u32,
    pub parts_in_cond_f: u32,
    pub parts_in_cond_a: u32,
    /// Simulation horizon; events scheduled past it are never executed.
    pub sim_time: f64,
    pub seed: u64,
}

impl SimConfig {
    /// Aircraft that start time zero with a part installed.
    pub fn aircraft_with_parts(&self) -> u32 {
        let capable = (self.mission_capable_rate * self.n_total_aircraft as f64).ceil() as u32;
        self.n_total_parts.min(capable)
    }

    /// Check every constraint, collecting all violations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        if self.n_total_aircraft == 0 {
            problems.push("n_total_aircraft must be positive".to_string());
        }
        if self.n_total_parts == 0 {
            problems.push("n_total_parts must be positive".to_string());
        }
        let rate_ok =
            self.mission_capable_rate.is_finite() && (0.0..=1.0).contains(&self.mission_capable_rate);
        if !rate_ok {
            problems.push("mission_capable_rate must be within [0, 1]".to_string());
        }
        if self.depot_capacity == 0 {
            problems.push("depot_capacity must be positive".to_string());
        }
        if !self.condemn_fraction.is_finite() || !(0.0..=1.0).contains(&self.condemn_fraction) {
            problems.push("condemn_fraction must be within [0, 1]".to_string());
        }
        if !self.part_order_lag.is_finite() || self.part_order_lag < 0.0 {
            problems.push("part_order_lag must be finite and >= 0".to_string());
        }
        if !self.sim_time.is_finite() || self.sim_time <= 0.0 {
            problems.push("sim_time must be finite and positive".to_string());
        }
        if self.parts_in_depot as usize > self.depot_capacity {
            problems.push(format!(
                "parts_in_depot ({}) exceeds depot_capacity ({})",
                self.parts_in_depot, self.depot_capacity
            ));
        }
        self.fleet_dist.validate("fleet_dist", &mut problems);
        self.repair_dist.validate("repair_dist", &mut problems);
        if rate_ok {
            let allocated = self.parts_in_depot
                + self.parts_in_cond_f
                + self.parts_in_cond_a
                + self.aircraft_with_parts();
            if allocated != self.n_total_parts {
                problems.push(format!(
                    "initial allocation ({} in depot + {} in condition F + {} in condition A \
                     + {} installed) must equal n_total_parts ({})",
                    self.parts_in_depot,
                    self.parts_in_cond_f,
                    self.parts_in_cond_a,
                    self.aircraft_with_parts(),
                    self.n_total_parts
                ));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}
