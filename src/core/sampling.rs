use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Uniform, Weibull};
use serde::{Deserialize, Serialize};

/// Duration distribution for a simulation stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dist", rename_all = "snake_case")]
pub enum DurationDist {
    /// Constant duration; used for deterministic verification scenarios.
    Fixed { value: f64 },
    Uniform { min: f64, max: f64 },
    Normal { mean: f64, sd: f64 },
    Weibull { shape: f64, scale: f64 },
}

impl DurationDist {
    /// Append every parameter problem to `problems`.
    pub(crate) fn validate(&self, label: &str, problems: &mut Vec<String>) {
        match *self {
            DurationDist::Fixed { value } => {
                if !value.is_finite() || value < 0.0 {
                    problems.push(format!("{}: fixed value must be finite and >= 0", label));
                }
            }
            DurationDist::Uniform { min, max } => {
                if !min.is_finite() || !max.is_finite() || min < 0.0 {
                    problems.push(format!("{}: uniform bounds must be finite and >= 0", label));
                } else if min > max {
                    problems.push(format!("{}: uniform min exceeds max", label));
                }
            }
            DurationDist::Normal { mean, sd } => {
                if !mean.is_finite() {
                    problems.push(format!("{}: normal mean must be finite", label));
                }
                if !sd.is_finite() || sd < 0.0 {
                    problems.push(format!("{}: normal sd must be finite and >= 0", label));
                }
            }
            DurationDist::Weibull { shape, scale } => {
                if !shape.is_finite() || shape <= 0.0 {
                    problems.push(format!("{}: weibull shape must be > 0", label));
                }
                if !scale.is_finite() || scale <= 0.0 {
                    problems.push(format!("{}: weibull scale must be > 0", label));
                }
            }
        }
    }
}

enum BuiltDist {
    Fixed(f64),
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
    Weibull(Weibull<f64>),
}

impl BuiltDist {
    fn build(dist: &DurationDist) -> Result<Self, String> {
        match *dist {
            DurationDist::Fixed { value } => Ok(BuiltDist::Fixed(value)),
            DurationDist::Uniform { min, max } => {
                Ok(BuiltDist::Uniform(Uniform::new_inclusive(min, max)))
            }
            DurationDist::Normal { mean, sd } => Normal::new(mean, sd)
                .map(BuiltDist::Normal)
                .map_err(|e| format!("normal distribution: {}", e)),
            DurationDist::Weibull { shape, scale } => Weibull::new(scale, shape)
                .map(BuiltDist::Weibull)
                .map_err(|e| format!("weibull distribution: {}", e)),
        }
    }

    fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            BuiltDist::Fixed(value) => *value,
            BuiltDist::Uniform(dist) => dist.sample(rng),
            // Negative normal draws clamp to zero.
            BuiltDist::Normal(dist) => dist.sample(rng).max(0.0),
            BuiltDist::Weibull(dist) => dist.sample(rng),
        }
    }
}

/// The single source of pseudo-randomness for a run.
///
/// Same seed, same draw order, same output: draws are consumed in a fixed
/// order (fleet durations at each cycle launch, repair durations at each
/// depot assignment pass, one condemnation draw per depot completion), so a
/// seeded run is byte-for-byte reproducible.
pub struct Sampler {
    rng: StdRng,
    fleet: BuiltDist,
    repair: BuiltDist,
}

impl Sampler {
    pub fn new(seed: u64, fleet: &DurationDist, repair: &DurationDist) -> Result<Self, String> {
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            fleet: BuiltDist::build(fleet)?,
            repair: BuiltDist::build(repair)?,
        })
    }

    /// Draw a fleet stage duration.
    pub fn fleet_duration(&mut self) -> f64 {
        self.fleet.sample(&mut self.rng)
    }

    /// Draw a depot repair duration.
    pub fn repair_duration(&mut self) -> f64 {
        self.repair.sample(&mut self.rng)
    }

    /// Condemnation-fraction draw. Always consumes one uniform so the draw
    /// stream does not depend on the configured fraction.
    pub fn condemn_draw(&mut self, fraction: f64) -> bool {
        self.rng.gen::<f64>() < fraction
    }
}
