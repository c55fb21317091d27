//! Command dispatch

use std::fmt::Display;
use std::io::Write;

use color_eyre::eyre::WrapErr;
use crosscheck_core::analysis::{SobolConfig, TornadoConfig, global_sensitivity_with};
use crosscheck_core::sampling::CheckerWindow;
use crosscheck_core::simulation::{McOutput, MonteCarloConfig};
use crosscheck_core::stats::DEFAULT_HISTOGRAM_BINS;
use crosscheck_core::{
    AnalysisCache, ParameterSet, elasticity_and_standardized, evaluate, scenario_grid,
};
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::data::{ParametersData, ScenarioData};
use crate::report::text::{
    EvaluationView, GridView, MonteCarloView, ReportView, SensitivityView, SobolView, TornadoView,
};
use crate::report::{EvaluationReport, FullReport, MonteCarloSummary};

/// Scenario file merged with command-line overrides
pub struct Session {
    pub scenario: ScenarioData,
    pub params: ParameterSet,
    cache: AnalysisCache,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> color_eyre::Result<Self> {
        let scenario = match &cli.scenario {
            Some(path) => ScenarioData::load(path)
                .wrap_err_with(|| format!("loading scenario {}", path.display()))?,
            None => ScenarioData::default(),
        };
        let params = cli
            .overrides
            .apply(scenario.parameters.to_builder())
            .build()
            .wrap_err("invalid parameters")?;
        tracing::info!(scenario = %scenario.name, "parameters ready");
        Ok(Self {
            scenario,
            params,
            cache: AnalysisCache::default(),
        })
    }

    fn evaluation(&self) -> color_eyre::Result<EvaluationReport> {
        Ok(EvaluationReport {
            scenario: self.scenario.name.clone(),
            parameters: self.params,
            outputs: evaluate(&self.params)?,
        })
    }

    fn monte_carlo_config(
        &self,
        samples: Option<usize>,
        seed: Option<u64>,
        fixed_checker_window: bool,
    ) -> MonteCarloConfig {
        let defaults = &self.scenario.analysis.monte_carlo;
        MonteCarloConfig {
            num_samples: samples.unwrap_or(defaults.num_samples),
            seed: seed.unwrap_or(defaults.seed),
            checker_window: if fixed_checker_window {
                CheckerWindow::dashboard()
            } else {
                defaults.checker_window
            },
        }
    }

    fn tornado_config(&self, include_task_time: bool, swing: Option<f64>) -> TornadoConfig {
        let defaults = self.scenario.analysis.tornado;
        TornadoConfig {
            swing: swing.unwrap_or(defaults.swing),
            include_task_time: include_task_time || defaults.include_task_time,
        }
    }

    fn sobol_config(&self, samples: Option<usize>, bootstrap: Option<usize>) -> SobolConfig {
        let defaults = self.scenario.analysis.sobol;
        SobolConfig {
            num_samples: samples.unwrap_or(defaults.num_samples),
            bootstrap_resamples: bootstrap.unwrap_or(defaults.bootstrap_resamples),
            ..defaults
        }
    }

    fn full_report(&self) -> color_eyre::Result<FullReport> {
        let mc_config = self.monte_carlo_config(None, None, false);
        let run = self.cache.monte_carlo(&self.params, &mc_config)?;
        Ok(FullReport {
            evaluation: self.evaluation()?,
            tornado: self
                .cache
                .tornado(&self.params, &self.tornado_config(false, None))?
                .as_ref()
                .clone(),
            sensitivity: elasticity_and_standardized(&self.params, &run.spread())?,
            monte_carlo: MonteCarloSummary::from_run(
                &run,
                McOutput::TotalEfficiency,
                DEFAULT_HISTOGRAM_BINS,
            ),
            global: global_sensitivity_with(&self.params, &self.sobol_config(None, None))?,
            scenarios: scenario_grid(&self.params)?,
        })
    }
}

fn emit<T: Serialize>(
    out: &mut impl Write,
    json: bool,
    value: &T,
    text: &dyn Display,
) -> color_eyre::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
    } else {
        write!(out, "{text}")?;
    }
    Ok(())
}

/// Run the parsed command, writing its report to `out`
pub fn execute(cli: &Cli, out: &mut impl Write) -> color_eyre::Result<()> {
    if let Command::Init { path } = &cli.command {
        let params = cli
            .overrides
            .apply(ParameterSet::builder())
            .build()
            .wrap_err("invalid parameters")?;
        let scenario = ScenarioData {
            parameters: ParametersData::from_parameter_set(&params),
            ..ScenarioData::default()
        };
        scenario
            .create(path)
            .wrap_err_with(|| format!("writing scenario {}", path.display()))?;
        tracing::info!(path = %path.display(), "scenario written");
        writeln!(out, "Wrote scenario to {}", path.display())?;
        return Ok(());
    }

    let session = Session::from_cli(cli)?;
    let json = cli.json;

    match &cli.command {
        Command::Evaluate => {
            let report = session.evaluation()?;
            emit(out, json, &report, &EvaluationView(&report))
        }
        Command::Tornado {
            include_task_time,
            swing,
        } => {
            let config = session.tornado_config(*include_task_time, *swing);
            let chart = session.cache.tornado(&session.params, &config)?;
            emit(out, json, &*chart, &TornadoView(&chart))
        }
        Command::MonteCarlo {
            samples,
            seed,
            output,
            fixed_checker_window,
            bins,
        } => {
            let config = session.monte_carlo_config(*samples, *seed, *fixed_checker_window);
            let run = session.cache.monte_carlo(&session.params, &config)?;
            let summary = MonteCarloSummary::from_run(&run, (*output).into(), *bins);
            emit(out, json, &summary, &MonteCarloView(&summary))
        }
        Command::Sensitivity { samples, seed } => {
            let config = session.monte_carlo_config(*samples, *seed, false);
            let run = session.cache.monte_carlo(&session.params, &config)?;
            let table = elasticity_and_standardized(&session.params, &run.spread())?;
            emit(out, json, &table, &SensitivityView(&table))
        }
        Command::Global { samples, bootstrap } => {
            let config = session.sobol_config(*samples, *bootstrap);
            let report = global_sensitivity_with(&session.params, &config)?;
            if report.was_rounded() {
                tracing::warn!(
                    requested = report.requested_samples,
                    used = report.base_samples,
                    "Sobol sample count rounded up to a power of two"
                );
            }
            emit(out, json, &report, &SobolView(&report))
        }
        Command::Scenarios => {
            let grid = scenario_grid(&session.params)?;
            emit(out, json, &grid, &GridView(&grid))
        }
        Command::Report => {
            let report = session.full_report()?;
            emit(out, json, &report, &ReportView(&report))
        }
        // Written above without loading a scenario
        Command::Init { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn run(args: &[&str]) -> color_eyre::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("crosscheck").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        execute(&cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn run_json(args: &[&str]) -> serde_json::Value {
        let mut all = vec!["--json"];
        all.extend_from_slice(args);
        serde_json::from_str(&run(&all).unwrap()).unwrap()
    }

    #[test]
    fn test_evaluate_default_scenario() {
        let value = run_json(&["evaluate"]);
        assert_eq!(value["scenario"], "baseline");
        let outputs = &value["outputs"];
        assert!((outputs["success_rate"].as_f64().unwrap() - 0.9444).abs() < 1e-12);
        assert!((outputs["labor_cost"].as_f64().unwrap() - 85.0).abs() < 1e-9);
        assert!((outputs["total_efficiency"].as_f64().unwrap() - 85.0 / 0.9444).abs() < 1e-9);
    }

    #[test]
    fn test_flags_override_scenario_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.yaml");
        fs::write(
            &path,
            "name: degraded\nparameters:\n  quality: low\n  loss_unit: 3.0\n",
        )
        .unwrap();

        let value = run_json(&[
            "evaluate",
            "--scenario",
            path.to_str().unwrap(),
            "--schedule",
            "late",
            "--loss-unit",
            "0",
        ]);
        assert_eq!(value["scenario"], "degraded");
        assert_eq!(value["parameters"]["quality_grade"], "low");
        assert_eq!(value["parameters"]["schedule_grade"], "late");
        let e_total = value["outputs"]["total_efficiency"].as_f64().unwrap();
        assert!((e_total - 43.70728).abs() < 1e-4, "{e_total}");
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let err = run(&["evaluate", "--a3=-0.2"]).unwrap_err();
        assert!(format!("{err:?}").contains("a3"));
    }

    #[test]
    fn test_tornado_with_task_time() {
        let value = run_json(&["tornado", "--include-task-time", "--loss-unit", "1"]);
        let bars = value["bars"].as_array().unwrap();
        assert_eq!(bars.len(), 8);
        assert_eq!(bars[0]["factor"], "total_task_time");
        assert!((bars[0]["impact"].as_f64().unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(bars[1]["factor"]["parameter"], "b0");
    }

    #[test]
    fn test_monte_carlo_is_reproducible() {
        let args = ["monte-carlo", "-n", "2000", "--seed", "5", "--output", "success-rate"];
        let a = run_json(&args);
        let b = run_json(&args);
        assert_eq!(a, b);
        assert_eq!(a["output"], "success_rate");
        assert_eq!(a["num_samples"], 2000);
        assert_eq!(a["histogram"]["counts"].as_array().unwrap().len(), 35);
    }

    #[test]
    fn test_sensitivity_reports_standardized_column() {
        let value = run_json(&["sensitivity", "-n", "4000", "--loss-unit", "1"]);
        let rows = value["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r["standardized"].is_number()));
    }

    #[test]
    fn test_global_rounding_is_reported() {
        let text = run(&["global", "-n", "300", "--bootstrap", "0"]).unwrap();
        assert!(text.contains("512 base samples"));
        assert!(text.contains("rounded up from 300"));
        assert!(text.contains("(fixed)"));
    }

    #[test]
    fn test_scenarios_text() {
        let text = run(&["scenarios"]).unwrap();
        assert_eq!(text.lines().filter(|l| l.contains("<- cheapest")).count(), 1);
    }

    #[test]
    fn test_report_contains_every_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quick.yaml");
        fs::write(
            &path,
            "analysis:\n  monte_carlo:\n    num_samples: 2000\n  sobol:\n    num_samples: 256\n    bootstrap_resamples: 10\n",
        )
        .unwrap();

        let value = run_json(&["report", "--scenario", path.to_str().unwrap(), "--loss-unit", "1"]);
        for key in ["outputs", "tornado", "sensitivity", "monte_carlo", "global", "scenarios"] {
            assert!(!value[key].is_null(), "missing {key}");
        }
        assert_eq!(value["monte_carlo"]["num_samples"], 2000);
        assert_eq!(value["global"]["base_samples"], 256);
    }

    #[test]
    fn test_init_writes_loadable_scenario() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new.yaml");
        let path_str = path.to_str().unwrap();

        run(&["init", path_str, "--b0", "0.85"]).unwrap();
        let scenario = ScenarioData::load(&path).unwrap();
        assert_eq!(scenario.parameter_set().unwrap().b0, 0.85);

        assert!(run(&["init", path_str]).is_err());
    }
}
