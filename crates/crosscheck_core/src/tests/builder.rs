//! Tests for ParameterSetBuilder

use crate::config::{AnalysisConfig, ParameterSetBuilder};
use crate::error::DomainError;
use crate::model::{Parameter, ParameterSet, QualityGrade, ScheduleGrade};
use crate::sampling::CheckerWindow;

/// An untouched builder yields the default scenario
#[test]
fn test_builder_defaults() {
    let params = ParameterSetBuilder::new().build().unwrap();
    assert_eq!(params, ParameterSet::default());
}

/// Fluent setters land in the right fields
#[test]
fn test_builder_setters() {
    let params = ParameterSet::builder()
        .a1(0.9)
        .a2(0.85)
        .a3(0.7)
        .checker(0.6)
        .quality(QualityGrade::Low)
        .schedule(ScheduleGrade::Late)
        .cross_check_ratio(0.1)
        .prep_post_ratio(0.2)
        .loss_unit(3.0)
        .task_hours(1.0, 2.0, 3.0)
        .set(Parameter::T3, 4.0)
        .build()
        .unwrap();

    assert_eq!(params.a1, 0.9);
    assert_eq!(params.a2, 0.85);
    assert_eq!(params.a3, 0.7);
    assert_eq!(params.b0, 0.6);
    assert_eq!(params.quality_grade, QualityGrade::Low);
    assert_eq!(params.schedule_grade, ScheduleGrade::Late);
    assert_eq!(params.cross_check_ratio, 0.1);
    assert_eq!(params.prep_post_ratio, 0.2);
    assert_eq!(params.loss_unit, 3.0);
    assert_eq!((params.t1, params.t2, params.t3), (1.0, 2.0, 4.0));
}

/// Step probabilities must be strictly positive
#[test]
fn test_builder_rejects_zero_step_probability() {
    let err = ParameterSet::builder().a2(0.0).build().unwrap_err();
    assert!(matches!(err, DomainError::OutOfRange { parameter: "a2", .. }));
}

/// Overhead ratios are capped at one half
#[test]
fn test_builder_rejects_large_overhead() {
    let err = ParameterSet::builder()
        .overheads(0.3, 0.6)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::OutOfRange {
            parameter: "prep_post_ratio",
            ..
        }
    ));
}

/// Negative hours and non-finite values are rejected
#[test]
fn test_builder_rejects_bad_numbers() {
    assert!(matches!(
        ParameterSet::builder().task_hours(1.0, -2.0, 3.0).build(),
        Err(DomainError::OutOfRange { parameter: "t2", .. })
    ));
    assert_eq!(
        ParameterSet::builder().loss_unit(f64::INFINITY).build(),
        Err(DomainError::NonFinite {
            parameter: "loss_unit"
        })
    );
}

/// Starting from existing parameters keeps them
#[test]
fn test_builder_from_params() {
    let base = ParameterSet::builder().checker(0.5).build().unwrap();
    let params = ParameterSetBuilder::from_params(base)
        .loss_unit(1.0)
        .build()
        .unwrap();
    assert_eq!(params.b0, 0.5);
    assert_eq!(params.loss_unit, 1.0);
}

/// Analysis config deserializes partial documents with defaults
#[test]
fn test_analysis_config_defaults() {
    let config: AnalysisConfig =
        serde_json::from_str(r#"{"monte_carlo": {"seed": 7}, "sobol": {"num_samples": 300}}"#)
            .unwrap();
    assert_eq!(config.monte_carlo.seed, 7);
    assert_eq!(config.monte_carlo.num_samples, 100_000);
    assert_eq!(config.monte_carlo.checker_window, CheckerWindow::default());
    assert_eq!(config.sobol.num_samples, 300);
    assert_eq!(config.sobol.bootstrap_resamples, 100);
    assert_eq!(config.tornado.swing, 0.20);
}

/// Fixed checker window round-trips through serde
#[test]
fn test_checker_window_serde() {
    let json = serde_json::to_string(&CheckerWindow::dashboard()).unwrap();
    assert_eq!(json, r#"{"type":"fixed","low":0.7,"high":0.9}"#);
    let back: CheckerWindow = serde_json::from_str(&json).unwrap();
    assert_eq!(back, CheckerWindow::dashboard());
}
