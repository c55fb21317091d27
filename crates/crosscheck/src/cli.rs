//! Command-line definition

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use crosscheck_core::ParameterSetBuilder;
use crosscheck_core::model::{Parameter, QualityGrade, ScheduleGrade};
use crosscheck_core::simulation::McOutput;

#[derive(Parser, Debug)]
#[command(name = "crosscheck")]
#[command(about = "Cost simulator for a three-step process with an independent cross-check")]
#[command(version)]
pub struct Cli {
    /// Scenario YAML file (default: built-in baseline scenario)
    #[arg(short, long, global = true)]
    pub scenario: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Append logs to this file (or to crosscheck.log in this directory) instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Emit JSON instead of text tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub overrides: ParameterOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Evaluate the model at the scenario's parameters
    Evaluate,

    /// One-at-a-time ±swing sensitivity of E_total
    Tornado {
        /// Add a bar scaling t1, t2 and t3 together
        #[arg(long)]
        include_task_time: bool,

        /// Relative swing (default from scenario, normally 0.20)
        #[arg(long)]
        swing: Option<f64>,
    },

    /// Monte Carlo propagation of input uncertainty
    MonteCarlo {
        /// Number of samples
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,

        /// Output column to summarize
        #[arg(short, long, value_enum, default_value_t = OutputArg::ETotal)]
        output: OutputArg,

        /// Draw b0 from the fixed [0.70, 0.90] window
        #[arg(long)]
        fixed_checker_window: bool,

        /// Histogram bins
        #[arg(long, default_value_t = crosscheck_core::stats::DEFAULT_HISTOGRAM_BINS)]
        bins: usize,
    },

    /// Elasticity and Monte Carlo standardized sensitivity
    Sensitivity {
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Sobol first-order and total-order indices
    Global {
        /// Base sample count (rounded up to a power of two)
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        /// Bootstrap resamples for confidence intervals (0 disables)
        #[arg(long)]
        bootstrap: Option<usize>,
    },

    /// Compare the four quality × schedule combinations
    Scenarios,

    /// Run every analysis and print one combined report
    Report,

    /// Write the default scenario to a new YAML file
    Init {
        path: PathBuf,
    },
}

/// Monte Carlo output selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputArg {
    #[value(name = "e-total")]
    ETotal,
    SuccessRate,
    LaborCost,
    LossUnit,
}

impl From<OutputArg> for McOutput {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::ETotal => McOutput::TotalEfficiency,
            OutputArg::SuccessRate => McOutput::SuccessRate,
            OutputArg::LaborCost => McOutput::LaborCost,
            OutputArg::LossUnit => McOutput::LossUnit,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityArg {
    Standard,
    Low,
}

impl From<QualityArg> for QualityGrade {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Standard => QualityGrade::Standard,
            QualityArg::Low => QualityGrade::Low,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleArg {
    OnTime,
    Late,
}

impl From<ScheduleArg> for ScheduleGrade {
    fn from(arg: ScheduleArg) -> Self {
        match arg {
            ScheduleArg::OnTime => ScheduleGrade::OnTime,
            ScheduleArg::Late => ScheduleGrade::Late,
        }
    }
}

/// Parameter flags applied on top of the scenario file
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ParameterOverrides {
    /// Success probability of step 1
    #[arg(long, global = true)]
    pub a1: Option<f64>,

    /// Success probability of step 2
    #[arg(long, global = true)]
    pub a2: Option<f64>,

    /// Success probability of step 3
    #[arg(long, global = true)]
    pub a3: Option<f64>,

    /// Checker base detection probability
    #[arg(long, global = true)]
    pub b0: Option<f64>,

    #[arg(long, global = true, value_enum)]
    pub quality: Option<QualityArg>,

    #[arg(long, global = true, value_enum)]
    pub schedule: Option<ScheduleArg>,

    /// Cross-check overhead ratio
    #[arg(long, global = true)]
    pub cross_check_ratio: Option<f64>,

    /// Preparation/post-processing overhead ratio
    #[arg(long, global = true)]
    pub prep_post_ratio: Option<f64>,

    /// Loss multiplier per unit failure probability
    #[arg(long, global = true)]
    pub loss_unit: Option<f64>,

    /// Hours of step 1
    #[arg(long, global = true)]
    pub t1: Option<f64>,

    /// Hours of step 2
    #[arg(long, global = true)]
    pub t2: Option<f64>,

    /// Hours of step 3
    #[arg(long, global = true)]
    pub t3: Option<f64>,
}

impl ParameterOverrides {
    fn values(&self) -> [(Parameter, Option<f64>); 10] {
        [
            (Parameter::A1, self.a1),
            (Parameter::A2, self.a2),
            (Parameter::A3, self.a3),
            (Parameter::B0, self.b0),
            (Parameter::CrossCheckRatio, self.cross_check_ratio),
            (Parameter::PrepPostRatio, self.prep_post_ratio),
            (Parameter::LossUnit, self.loss_unit),
            (Parameter::T1, self.t1),
            (Parameter::T2, self.t2),
            (Parameter::T3, self.t3),
        ]
    }

    /// Apply every given flag; the builder validates the merged set
    pub fn apply(&self, mut builder: ParameterSetBuilder) -> ParameterSetBuilder {
        for (parameter, value) in self.values() {
            if let Some(value) = value {
                tracing::debug!(%parameter, value, "parameter override");
                builder = builder.set(parameter, value);
            }
        }
        if let Some(quality) = self.quality {
            builder = builder.quality(quality.into());
        }
        if let Some(schedule) = self.schedule {
            builder = builder.schedule(schedule.into());
        }
        builder
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosscheck_core::{DomainError, ParameterSet};

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_monte_carlo() {
        let cli = Cli::try_parse_from([
            "crosscheck",
            "monte-carlo",
            "-n",
            "5000",
            "--seed",
            "9",
            "--output",
            "success-rate",
            "--fixed-checker-window",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::MonteCarlo {
                samples: Some(5_000),
                seed: Some(9),
                output: OutputArg::SuccessRate,
                fixed_checker_window: true,
                bins: 35,
            }
        );
        assert!(cli.overrides.is_empty());
        assert!(!cli.json);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "crosscheck",
            "evaluate",
            "--json",
            "--quality",
            "low",
            "--schedule",
            "late",
            "--loss-unit",
            "1.5",
            "--t3",
            "40",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.command, Command::Evaluate);

        let params = cli.overrides.apply(ParameterSet::builder()).build().unwrap();
        assert_eq!(params.quality_grade, QualityGrade::Low);
        assert_eq!(params.schedule_grade, ScheduleGrade::Late);
        assert_eq!(params.loss_unit, 1.5);
        assert_eq!(params.t3, 40.0);
        assert_eq!(params.a1, 0.95);
    }

    #[test]
    fn test_override_is_validated() {
        let cli = Cli::try_parse_from(["crosscheck", "evaluate", "--b0", "1.2"]).unwrap();
        let err = cli.overrides.apply(ParameterSet::builder()).build().unwrap_err();
        assert!(matches!(err, DomainError::OutOfRange { parameter: "b0", .. }));
    }

    #[test]
    fn test_unknown_output_rejected() {
        assert!(Cli::try_parse_from(["crosscheck", "monte-carlo", "--output", "variance"]).is_err());
    }

    #[test]
    fn test_init_requires_path() {
        assert!(Cli::try_parse_from(["crosscheck", "init"]).is_err());
        let cli = Cli::try_parse_from(["crosscheck", "init", "s.yaml"]).unwrap();
        assert_eq!(cli.command, Command::Init { path: PathBuf::from("s.yaml") });
    }
}
