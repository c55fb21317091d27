//! Input distributions for the Monte Carlo engine.
//!
//! Each continuous input gets a distribution centred on its baseline value.
//! Quality and schedule grades are categorical and never sampled.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, distr::Distribution};
use serde::{Deserialize, Serialize};

use crate::error::SamplingConfigError;
use crate::model::{Parameter, ParameterSet};

/// Relative standard deviation of the first two step probabilities
const STEP_PROB_REL_SD: f64 = 0.03;
/// Floor on the baseline used for the step-probability spread
const STEP_PROB_SD_FLOOR: f64 = 0.01;
/// Half-width of the a3 triangular window, relative to baseline
const FINAL_STEP_SPREAD: f64 = 0.10;
/// Half-width of the cost-ratio and loss-unit triangular windows
const COST_SPREAD: f64 = 0.20;
/// Relative standard deviation of task hours
const TASK_TIME_REL_SD: f64 = 0.10;
/// Sampled task hours never fall below one hour
const TASK_TIME_FLOOR: f64 = 1.0;

/// How the checker's base probability is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckerWindow {
    /// Uniform over `baseline ± half_width`, clipped to [0, 1]
    Relative { half_width: f64 },
    /// Uniform over a fixed window regardless of baseline
    Fixed { low: f64, high: f64 },
}

impl Default for CheckerWindow {
    fn default() -> Self {
        CheckerWindow::Relative { half_width: 0.10 }
    }
}

impl CheckerWindow {
    /// Fixed `[0.70, 0.90]` window of the first dashboard release
    pub const fn dashboard() -> Self {
        CheckerWindow::Fixed {
            low: 0.70,
            high: 0.90,
        }
    }

    /// Reject windows that cannot describe a probability range
    pub fn validate(&self) -> Result<(), SamplingConfigError> {
        let invalid = |reason: String| {
            Err(SamplingConfigError::InvalidDistribution {
                parameter: Parameter::B0.name(),
                reason,
            })
        };
        match *self {
            CheckerWindow::Relative { half_width } => {
                if !half_width.is_finite() || half_width < 0.0 {
                    return invalid(format!("half-width {half_width} must be finite and >= 0"));
                }
            }
            CheckerWindow::Fixed { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    return invalid(format!("window [{low}, {high}] is not finite"));
                }
                if low > high {
                    return invalid(format!("window [{low}, {high}] is inverted"));
                }
            }
        }
        Ok(())
    }

    /// Sampling range for `baseline`, clipped to [0, 1]
    fn bounds(&self, baseline: f64) -> (f64, f64) {
        let (low, high) = match *self {
            CheckerWindow::Relative { half_width } => {
                (baseline - half_width, baseline + half_width)
            }
            CheckerWindow::Fixed { low, high } => (low, high),
        };
        (low.clamp(0.0, 1.0), high.clamp(0.0, 1.0))
    }
}

/// Distribution of one sampled input, with an output clamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParameterDistribution {
    Fixed(f64),
    Normal {
        mean: f64,
        std_dev: f64,
        min: f64,
        max: f64,
    },
    Triangular {
        low: f64,
        mode: f64,
        high: f64,
        min: f64,
        max: f64,
    },
    Uniform {
        low: f64,
        high: f64,
    },
}

impl ParameterDistribution {
    /// Distribution of `parameter` centred on `baseline`
    pub fn for_parameter(parameter: Parameter, baseline: f64, window: &CheckerWindow) -> Self {
        match parameter {
            Parameter::A1 | Parameter::A2 => ParameterDistribution::Normal {
                mean: baseline,
                std_dev: STEP_PROB_REL_SD * baseline.max(STEP_PROB_SD_FLOOR),
                min: 0.0,
                max: 1.0,
            },
            Parameter::A3 => triangular(baseline, FINAL_STEP_SPREAD, 1.0),
            Parameter::B0 => {
                let (low, high) = window.bounds(baseline);
                if high > low {
                    ParameterDistribution::Uniform { low, high }
                } else {
                    ParameterDistribution::Fixed(low)
                }
            }
            Parameter::CrossCheckRatio | Parameter::PrepPostRatio | Parameter::LossUnit => {
                triangular(baseline, COST_SPREAD, f64::INFINITY)
            }
            Parameter::T1 | Parameter::T2 | Parameter::T3 => {
                if baseline == 0.0 {
                    ParameterDistribution::Fixed(0.0)
                } else {
                    ParameterDistribution::Normal {
                        mean: baseline,
                        std_dev: TASK_TIME_REL_SD * baseline,
                        min: TASK_TIME_FLOOR,
                        max: f64::INFINITY,
                    }
                }
            }
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, ParameterDistribution::Fixed(_))
    }

    pub fn sample<R: Rng + ?Sized>(
        &self,
        parameter: Parameter,
        rng: &mut R,
    ) -> Result<f64, SamplingConfigError> {
        let invalid = |reason: String| SamplingConfigError::InvalidDistribution {
            parameter: parameter.name(),
            reason,
        };
        match *self {
            ParameterDistribution::Fixed(value) => Ok(value),
            ParameterDistribution::Normal {
                mean,
                std_dev,
                min,
                max,
            } => rand_distr::Normal::new(mean, std_dev)
                .map(|d| d.sample(rng).clamp(min, max))
                .map_err(|e| invalid(e.to_string())),
            ParameterDistribution::Triangular {
                low,
                mode,
                high,
                min,
                max,
            } => rand_distr::Triangular::new(low, high, mode)
                .map(|d| d.sample(rng).clamp(min, max))
                .map_err(|e| invalid(e.to_string())),
            ParameterDistribution::Uniform { low, high } => {
                rand::distr::Uniform::new_inclusive(low, high)
                    .map(|d| d.sample(rng))
                    .map_err(|e| invalid(e.to_string()))
            }
        }
    }
}

/// Triangular window `baseline·(1 ± spread)`; a zero baseline stays fixed
fn triangular(baseline: f64, spread: f64, max: f64) -> ParameterDistribution {
    if baseline == 0.0 {
        return ParameterDistribution::Fixed(0.0);
    }
    ParameterDistribution::Triangular {
        low: baseline * (1.0 - spread),
        mode: baseline,
        high: baseline * (1.0 + spread),
        min: 0.0,
        max,
    }
}

/// One distribution per continuous input, built once per run
#[derive(Debug, Clone)]
pub struct SamplingPlan {
    baseline: ParameterSet,
    distributions: [(Parameter, ParameterDistribution); 10],
}

impl SamplingPlan {
    pub fn new(baseline: &ParameterSet, window: &CheckerWindow) -> Self {
        let distributions = Parameter::ALL.map(|p| {
            let dist = ParameterDistribution::for_parameter(p, baseline.get(p), window);
            if dist.is_fixed() {
                tracing::debug!(parameter = p.name(), "held fixed during sampling");
            }
            (p, dist)
        });
        Self {
            baseline: *baseline,
            distributions,
        }
    }

    pub fn distribution(&self, parameter: Parameter) -> ParameterDistribution {
        self.distributions[parameter as usize].1
    }

    /// Draw one parameter set. Grades are copied from the baseline.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ParameterSet, SamplingConfigError> {
        let mut params = self.baseline;
        for (parameter, dist) in &self.distributions {
            params = params.with(*parameter, dist.sample(*parameter, rng)?);
        }
        Ok(params)
    }
}

/// Deterministic sub-seed for one batch of a seeded run.
///
/// Derived by hashing, so a batch's stream does not depend on which thread
/// runs it or in what order.
pub fn batch_seed(seed: u64, batch: u64) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"crosscheck-monte-carlo");
    hasher.update(&seed.to_le_bytes());
    hasher.update(&batch.to_le_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

pub fn batch_rng(seed: u64, batch: u64) -> StdRng {
    StdRng::seed_from_u64(batch_seed(seed, batch))
}
