//! Variance-based global sensitivity (Sobol indices, Saltelli sampling).
//!
//! Each input is drawn uniformly from a box around its baseline. The design
//! uses a Sobol sequence of dimension 2D: the first D columns form matrix A,
//! the last D form B, and AB_i is A with column i taken from B. Indices use
//! the Saltelli (2010) first-order and Jansen total-order estimators.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::descending_nan_last;
use super::sobol_sequence::SobolSequence;
use crate::error::{AnalysisError, DomainError, SamplingConfigError};
use crate::evaluate::{checked, compute};
use crate::model::{Parameter, ParameterKind, ParameterSet};
use crate::stats::{mean, variance};

/// Two-sided 95 % normal quantile
const CONFIDENCE_Z: f64 = 1.959_963_984_540_054;

/// Largest base sample count accepted. With all ten inputs active the design
/// holds `base · 10 · 12` values, about 250 MB at this limit.
pub const MAX_BASE_SAMPLES: usize = 1 << 18;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SobolConfig {
    /// Requested base sample count, rounded up to a power of two
    pub num_samples: usize,
    /// Bootstrap resamples for confidence intervals; 0 disables them
    pub bootstrap_resamples: usize,
    pub bootstrap_seed: u64,
}

impl Default for SobolConfig {
    fn default() -> Self {
        Self {
            num_samples: 1_024,
            bootstrap_resamples: 100,
            bootstrap_seed: 0,
        }
    }
}

/// Sampling box of one input around its baseline
pub fn sobol_bounds(parameter: Parameter, baseline: f64) -> (f64, f64) {
    let spread = match parameter.kind() {
        ParameterKind::Probability | ParameterKind::Time => 0.10,
        ParameterKind::Ratio | ParameterKind::Cost => 0.20,
    };
    let kind = parameter.kind();
    (
        kind.clamp(baseline * (1.0 - spread)),
        kind.clamp(baseline * (1.0 + spread)),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SobolRow {
    pub parameter: Parameter,
    pub lower: f64,
    pub upper: f64,
    pub first_order: f64,
    pub total_order: f64,
    /// Half-width of the 95 % bootstrap interval
    pub first_order_conf: Option<f64>,
    pub total_order_conf: Option<f64>,
    /// Zero-width range; not sampled, indices reported as 0
    pub held_fixed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SobolReport {
    pub requested_samples: usize,
    /// Power-of-two base sample count actually used
    pub base_samples: usize,
    /// Model evaluations performed, `base_samples · (D + 2)`
    pub evaluations: usize,
    pub output_variance: f64,
    /// Ranked by total-order index, largest first
    pub rows: Vec<SobolRow>,
}

impl SobolReport {
    pub fn was_rounded(&self) -> bool {
        self.base_samples != self.requested_samples
    }

    pub fn row(&self, parameter: Parameter) -> Option<&SobolRow> {
        self.rows.iter().find(|r| r.parameter == parameter)
    }

    pub fn ranking(&self) -> Vec<Parameter> {
        self.rows.iter().map(|r| r.parameter).collect()
    }
}

/// Sobol analysis with default bootstrap settings
pub fn global_sensitivity(
    params: &ParameterSet,
    num_samples: usize,
) -> Result<SobolReport, AnalysisError> {
    global_sensitivity_with(
        params,
        &SobolConfig {
            num_samples,
            ..Default::default()
        },
    )
}

pub fn global_sensitivity_with(
    params: &ParameterSet,
    config: &SobolConfig,
) -> Result<SobolReport, AnalysisError> {
    if config.num_samples < 1 {
        return Err(SamplingConfigError::ZeroSamples.into());
    }
    if config.num_samples > MAX_BASE_SAMPLES {
        return Err(SamplingConfigError::TooManySamples {
            requested: config.num_samples,
            max: MAX_BASE_SAMPLES,
        }
        .into());
    }
    params.validate()?;

    let base = config.num_samples.next_power_of_two();
    if base != config.num_samples {
        tracing::info!(
            requested = config.num_samples,
            used = base,
            "Sobol sample count rounded up to a power of two"
        );
    }

    let bounds: Vec<(Parameter, (f64, f64))> = Parameter::ALL
        .into_iter()
        .map(|p| (p, sobol_bounds(p, params.get(p))))
        .collect();
    let active: Vec<(Parameter, (f64, f64))> = bounds
        .iter()
        .copied()
        .filter(|(_, (lo, hi))| hi > lo)
        .collect();
    if active.is_empty() {
        return Err(DomainError::ZeroOutputSpread {
            output: "total_efficiency",
        }
        .into());
    }

    let active_bounds: Vec<(f64, f64)> = active.iter().map(|(_, b)| *b).collect();
    let indices = saltelli_indices(&active_bounds, base, config, |x| {
        let mut point = *params;
        for ((parameter, _), &value) in active.iter().zip(x) {
            point = point.with(*parameter, value);
        }
        let outputs = checked(compute(&point))?;
        if outputs.total_efficiency.is_finite() {
            Ok(outputs.total_efficiency)
        } else {
            Err(DomainError::ZeroSuccessRate)
        }
    })?;

    let mut rows: Vec<SobolRow> = bounds
        .into_iter()
        .map(|(parameter, (lower, upper))| {
            match active.iter().position(|(p, _)| *p == parameter) {
                Some(i) => SobolRow {
                    parameter,
                    lower,
                    upper,
                    first_order: indices.first_order[i],
                    total_order: indices.total_order[i],
                    first_order_conf: indices.first_order_conf.as_ref().map(|c| c[i]),
                    total_order_conf: indices.total_order_conf.as_ref().map(|c| c[i]),
                    held_fixed: false,
                },
                None => SobolRow {
                    parameter,
                    lower,
                    upper,
                    first_order: 0.0,
                    total_order: 0.0,
                    first_order_conf: None,
                    total_order_conf: None,
                    held_fixed: true,
                },
            }
        })
        .collect();
    rows.sort_by(|a, b| descending_nan_last(a.total_order, b.total_order));

    let evaluations = base * (active.len() + 2);
    tracing::debug!(base, evaluations, "Sobol analysis complete");
    Ok(SobolReport {
        requested_samples: config.num_samples,
        base_samples: base,
        evaluations,
        output_variance: indices.variance,
        rows,
    })
}

#[derive(Debug, Clone)]
pub(crate) struct SobolIndices {
    pub first_order: Vec<f64>,
    pub total_order: Vec<f64>,
    pub first_order_conf: Option<Vec<f64>>,
    pub total_order_conf: Option<Vec<f64>>,
    pub variance: f64,
}

/// Estimate Sobol indices of `model` over the box `bounds` with `base` rows per matrix
pub(crate) fn saltelli_indices<F>(
    bounds: &[(f64, f64)],
    base: usize,
    config: &SobolConfig,
    model: F,
) -> Result<SobolIndices, AnalysisError>
where
    F: Fn(&[f64]) -> Result<f64, DomainError> + Sync,
{
    let d = bounds.len();
    let mut sequence = SobolSequence::new(2 * d)?;
    sequence.skip(base as u64);

    // Rows laid out as [A; B; AB_0; ...; AB_{d-1}], each block `base` rows of `d` values
    let mut design = vec![0.0; base * d * (d + 2)];
    let mut point = vec![0.0; 2 * d];
    for row in 0..base {
        sequence.next_into(&mut point);
        for (j, &(lo, hi)) in bounds.iter().enumerate() {
            design[row * d + j] = lo + (hi - lo) * point[j];
            design[(base + row) * d + j] = lo + (hi - lo) * point[d + j];
        }
    }
    for i in 0..d {
        let block = 2 + i;
        for row in 0..base {
            let dst = (block * base + row) * d;
            design.copy_within(row * d..(row + 1) * d, dst);
            design[dst + i] = design[(base + row) * d + i];
        }
    }

    #[cfg(feature = "parallel")]
    let outputs: Vec<f64> = design
        .par_chunks(d)
        .map(|x| model(x))
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let outputs: Vec<f64> = design
        .chunks(d)
        .map(|x| model(x))
        .collect::<Result<_, _>>()?;

    let f_a = &outputs[..base];
    let f_b = &outputs[base..2 * base];
    let f_ab: Vec<&[f64]> = (0..d)
        .map(|i| &outputs[(2 + i) * base..(3 + i) * base])
        .collect();

    let all_rows: Vec<usize> = (0..base).collect();
    let (first_order, total_order, variance) = estimate(f_a, f_b, &f_ab, &all_rows);
    if !variance.is_finite() || variance == 0.0 {
        return Err(DomainError::ZeroOutputSpread {
            output: "total_efficiency",
        }
        .into());
    }

    let (first_order_conf, total_order_conf) = if config.bootstrap_resamples > 0 {
        let (s1, st) = bootstrap(f_a, f_b, &f_ab, config);
        (Some(s1), Some(st))
    } else {
        (None, None)
    };

    Ok(SobolIndices {
        first_order,
        total_order,
        first_order_conf,
        total_order_conf,
        variance,
    })
}

/// First-order and total-order indices over the rows selected by `idx`
fn estimate(f_a: &[f64], f_b: &[f64], f_ab: &[&[f64]], idx: &[usize]) -> (Vec<f64>, Vec<f64>, f64) {
    let pooled: Vec<f64> = idx.iter().map(|&r| f_a[r]).chain(idx.iter().map(|&r| f_b[r])).collect();
    let var = variance(&pooled);
    let n = idx.len() as f64;

    let mut first = Vec::with_capacity(f_ab.len());
    let mut total = Vec::with_capacity(f_ab.len());
    for ab in f_ab {
        let s1 = idx.iter().map(|&r| f_b[r] * (ab[r] - f_a[r])).sum::<f64>() / n;
        let st = 0.5 * idx.iter().map(|&r| (f_a[r] - ab[r]).powi(2)).sum::<f64>() / n;
        first.push(s1 / var);
        total.push(st / var);
    }
    (first, total, var)
}

/// 95 % half-widths from resampling rows with replacement
fn bootstrap(
    f_a: &[f64],
    f_b: &[f64],
    f_ab: &[&[f64]],
    config: &SobolConfig,
) -> (Vec<f64>, Vec<f64>) {
    let n = f_a.len();
    let d = f_ab.len();
    let mut rng = StdRng::seed_from_u64(config.bootstrap_seed);
    let mut s1_draws = vec![Vec::with_capacity(config.bootstrap_resamples); d];
    let mut st_draws = vec![Vec::with_capacity(config.bootstrap_resamples); d];

    let mut idx = vec![0usize; n];
    for _ in 0..config.bootstrap_resamples {
        for slot in idx.iter_mut() {
            *slot = rng.random_range(0..n);
        }
        let (s1, st, _) = estimate(f_a, f_b, f_ab, &idx);
        for (draws, value) in s1_draws.iter_mut().zip(s1) {
            draws.push(value);
        }
        for (draws, value) in st_draws.iter_mut().zip(st) {
            draws.push(value);
        }
    }

    let half_width = |draws: &Vec<f64>| CONFIDENCE_Z * sample_std(draws);
    (
        s1_draws.iter().map(half_width).collect(),
        st_draws.iter().map(half_width).collect(),
    )
}

/// Standard deviation with Bessel's correction
fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::std_dev;

    #[test]
    fn bounds_by_parameter_class() {
        let (lo, hi) = sobol_bounds(Parameter::A1, 0.95);
        assert!((lo - 0.855).abs() < 1e-12);
        assert_eq!(hi, 1.0);
        let (lo, hi) = sobol_bounds(Parameter::CrossCheckRatio, 0.30);
        assert!((lo - 0.24).abs() < 1e-12 && (hi - 0.36).abs() < 1e-12);
        let (lo, hi) = sobol_bounds(Parameter::T3, 30.0);
        assert!((lo - 27.0).abs() < 1e-12 && (hi - 33.0).abs() < 1e-12);
        assert_eq!(sobol_bounds(Parameter::LossUnit, 0.0), (0.0, 0.0));
    }

    #[test]
    fn linear_model_indices() {
        // f = x0 + 2·x1 on the unit square: S1 = ST = (1/5, 4/5)
        let bounds = [(0.0, 1.0), (0.0, 1.0)];
        let config = SobolConfig {
            bootstrap_resamples: 0,
            ..Default::default()
        };
        let idx = saltelli_indices(&bounds, 4_096, &config, |x| Ok(x[0] + 2.0 * x[1])).unwrap();
        assert!((idx.first_order[0] - 0.2).abs() < 0.02, "{:?}", idx.first_order);
        assert!((idx.first_order[1] - 0.8).abs() < 0.02, "{:?}", idx.first_order);
        assert!((idx.total_order[0] - 0.2).abs() < 0.02, "{:?}", idx.total_order);
        assert!((idx.total_order[1] - 0.8).abs() < 0.02, "{:?}", idx.total_order);
        assert!(idx.first_order_conf.is_none());
    }

    #[test]
    fn constant_model_has_no_variance() {
        let bounds = [(0.0, 1.0)];
        let result = saltelli_indices(&bounds, 64, &SobolConfig::default(), |_| Ok(3.0));
        assert!(matches!(
            result,
            Err(AnalysisError::Domain(DomainError::ZeroOutputSpread { .. }))
        ));
    }

    #[test]
    fn sample_std_uses_bessel_correction() {
        assert!((sample_std(&[1.0, 3.0]) - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert_eq!(std_dev(&[1.0, 3.0]), 1.0);
    }
}
