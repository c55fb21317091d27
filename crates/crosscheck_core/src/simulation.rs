//! Monte Carlo propagation of input uncertainty through the cost model.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::OutputSpread;
use crate::error::{AnalysisError, DomainError, SamplingConfigError};
use crate::evaluate::{checked, compute};
use crate::model::ParameterSet;
use crate::sampling::{CheckerWindow, SamplingPlan, batch_rng};
use crate::stats::{Histogram, SummaryStats, histogram, std_dev};

/// Samples drawn from one batch RNG stream
const BATCH_SIZE: usize = 1_024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub num_samples: usize,
    pub seed: u64,
    pub checker_window: CheckerWindow,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            num_samples: 100_000,
            seed: 0,
            checker_window: CheckerWindow::default(),
        }
    }
}

/// Sampled output column of a [`MonteCarloRun`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McOutput {
    #[default]
    TotalEfficiency,
    SuccessRate,
    LaborCost,
    LossUnit,
}

impl McOutput {
    pub const ALL: [McOutput; 4] = [
        McOutput::TotalEfficiency,
        McOutput::SuccessRate,
        McOutput::LaborCost,
        McOutput::LossUnit,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            McOutput::TotalEfficiency => "total_efficiency",
            McOutput::SuccessRate => "success_rate",
            McOutput::LaborCost => "labor_cost",
            McOutput::LossUnit => "loss_unit",
        }
    }
}

/// Column-wise result of a seeded Monte Carlo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloRun {
    pub num_samples: usize,
    pub seed: u64,
    pub total_efficiency: Vec<f64>,
    pub success_rate: Vec<f64>,
    pub labor_cost: Vec<f64>,
    pub loss_unit: Vec<f64>,
    /// Summary of `total_efficiency`
    pub summary: SummaryStats,
    pub success_rate_summary: SummaryStats,
    pub labor_cost_summary: SummaryStats,
    pub loss_unit_summary: SummaryStats,
}

impl MonteCarloRun {
    pub fn column(&self, output: McOutput) -> &[f64] {
        match output {
            McOutput::TotalEfficiency => &self.total_efficiency,
            McOutput::SuccessRate => &self.success_rate,
            McOutput::LaborCost => &self.labor_cost,
            McOutput::LossUnit => &self.loss_unit,
        }
    }

    pub fn summarize(&self, output: McOutput) -> SummaryStats {
        match output {
            McOutput::TotalEfficiency => self.summary,
            McOutput::SuccessRate => self.success_rate_summary,
            McOutput::LaborCost => self.labor_cost_summary,
            McOutput::LossUnit => self.loss_unit_summary,
        }
    }

    pub fn histogram(&self, output: McOutput, bins: usize) -> Histogram {
        histogram(self.column(output), bins)
    }

    /// Standard deviations consumed by the standardized sensitivity
    pub fn spread(&self) -> OutputSpread {
        OutputSpread {
            sigma_labor_cost: std_dev(&self.labor_cost),
            sigma_success_rate: std_dev(&self.success_rate),
            sigma_loss_unit: std_dev(&self.loss_unit),
            sigma_total_efficiency: self.summary.std_dev,
        }
    }
}

#[derive(Debug, Default)]
struct BatchColumns {
    total_efficiency: Vec<f64>,
    success_rate: Vec<f64>,
    labor_cost: Vec<f64>,
    loss_unit: Vec<f64>,
}

/// Run `num_samples` draws around `params` with the default checker window
pub fn run_monte_carlo(
    params: &ParameterSet,
    num_samples: usize,
    seed: u64,
) -> Result<MonteCarloRun, AnalysisError> {
    run_monte_carlo_with(
        params,
        &MonteCarloConfig {
            num_samples,
            seed,
            ..Default::default()
        },
    )
}

/// Run a Monte Carlo simulation.
///
/// Identical `(params, num_samples, seed, checker_window)` always produce
/// identical columns, whatever the number of worker threads.
pub fn run_monte_carlo_with(
    params: &ParameterSet,
    config: &MonteCarloConfig,
) -> Result<MonteCarloRun, AnalysisError> {
    if config.num_samples < 1 {
        return Err(SamplingConfigError::ZeroSamples.into());
    }
    config.checker_window.validate()?;
    params.validate()?;

    let plan = SamplingPlan::new(params, &config.checker_window);
    let num_batches = config.num_samples.div_ceil(BATCH_SIZE);
    tracing::info!(
        samples = config.num_samples,
        seed = config.seed,
        batches = num_batches,
        "running Monte Carlo"
    );

    #[cfg(feature = "parallel")]
    let batches: Vec<BatchColumns> = (0..num_batches)
        .into_par_iter()
        .map(|b| run_batch(&plan, config, num_batches, b))
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let batches: Vec<BatchColumns> = (0..num_batches)
        .map(|b| run_batch(&plan, config, num_batches, b))
        .collect::<Result<_, _>>()?;

    let run = assemble(config, batches)?;
    tracing::debug!(
        mean = run.summary.mean,
        p5 = run.summary.p5,
        p95 = run.summary.p95,
        "Monte Carlo complete"
    );
    Ok(run)
}

/// Sequential reference path, used to check that threading does not change results
#[cfg(test)]
pub(crate) fn run_monte_carlo_sequential(
    params: &ParameterSet,
    config: &MonteCarloConfig,
) -> Result<MonteCarloRun, AnalysisError> {
    let plan = SamplingPlan::new(params, &config.checker_window);
    let num_batches = config.num_samples.div_ceil(BATCH_SIZE);
    let batches = (0..num_batches)
        .map(|b| run_batch(&plan, config, num_batches, b))
        .collect::<Result<_, _>>()?;
    assemble(config, batches)
}

fn run_batch(
    plan: &SamplingPlan,
    config: &MonteCarloConfig,
    num_batches: usize,
    batch: usize,
) -> Result<BatchColumns, AnalysisError> {
    let mut rng = batch_rng(config.seed, batch as u64);
    let batch_size = if batch == num_batches - 1 {
        config.num_samples - batch * BATCH_SIZE
    } else {
        BATCH_SIZE
    };

    let mut columns = BatchColumns {
        total_efficiency: Vec::with_capacity(batch_size),
        success_rate: Vec::with_capacity(batch_size),
        labor_cost: Vec::with_capacity(batch_size),
        loss_unit: Vec::with_capacity(batch_size),
    };
    for i in 0..batch_size {
        let draw = plan.draw(&mut rng)?;
        let outputs = checked(compute(&draw))?;
        if !outputs.total_efficiency.is_finite() {
            return Err(DomainError::NonFiniteSample {
                output: "total_efficiency",
                index: batch * BATCH_SIZE + i,
            }
            .into());
        }
        columns.total_efficiency.push(outputs.total_efficiency);
        columns.success_rate.push(outputs.success_rate);
        columns.labor_cost.push(outputs.labor_cost);
        columns.loss_unit.push(draw.loss_unit);
    }
    Ok(columns)
}

fn assemble(
    config: &MonteCarloConfig,
    batches: Vec<BatchColumns>,
) -> Result<MonteCarloRun, AnalysisError> {
    let mut all = BatchColumns::default();
    for batch in batches {
        all.total_efficiency.extend(batch.total_efficiency);
        all.success_rate.extend(batch.success_rate);
        all.labor_cost.extend(batch.labor_cost);
        all.loss_unit.extend(batch.loss_unit);
    }
    let summarize =
        |column: &[f64]| SummaryStats::from_samples(column).ok_or(SamplingConfigError::ZeroSamples);

    Ok(MonteCarloRun {
        num_samples: config.num_samples,
        seed: config.seed,
        summary: summarize(&all.total_efficiency)?,
        success_rate_summary: summarize(&all.success_rate)?,
        labor_cost_summary: summarize(&all.labor_cost)?,
        loss_unit_summary: summarize(&all.loss_unit)?,
        total_efficiency: all.total_efficiency,
        success_rate: all.success_rate,
        labor_cost: all.labor_cost,
        loss_unit: all.loss_unit,
    })
}
