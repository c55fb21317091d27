//! Report assembly
//!
//! Every command produces a serializable value from this module. JSON output
//! serializes it directly; text output goes through the views in [`text`].

pub mod text;

use crosscheck_core::analysis::{ScenarioGrid, SensitivityTable, SobolReport, TornadoChart};
use crosscheck_core::model::{ModelOutputs, ParameterSet};
use crosscheck_core::simulation::{McOutput, MonteCarloRun};
use crosscheck_core::stats::{Histogram, SummaryStats};
use serde::Serialize;

/// Summary of one Monte Carlo output column, without the raw samples
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloSummary {
    pub num_samples: usize,
    pub seed: u64,
    pub output: McOutput,
    pub stats: SummaryStats,
    pub histogram: Histogram,
}

impl MonteCarloSummary {
    pub fn from_run(run: &MonteCarloRun, output: McOutput, bins: usize) -> Self {
        Self {
            num_samples: run.num_samples,
            seed: run.seed,
            output,
            stats: run.summarize(output),
            histogram: run.histogram(output, bins),
        }
    }
}

/// Headline evaluation of a scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub scenario: String,
    pub parameters: ParameterSet,
    pub outputs: ModelOutputs,
}

/// Every analysis of one scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullReport {
    #[serde(flatten)]
    pub evaluation: EvaluationReport,
    pub tornado: TornadoChart,
    pub sensitivity: SensitivityTable,
    pub monte_carlo: MonteCarloSummary,
    pub global: SobolReport,
    pub scenarios: ScenarioGrid,
}
