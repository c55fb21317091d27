//! Tornado ranking, elasticity identities and the derivative engine

use crate::analysis::{
    AggregateInput, TornadoChart, TornadoFactor, elasticities, local_sensitivity,
};
use crate::derivatives::gradient_at;
use crate::error::DomainError;
use crate::evaluate::{evaluate, total_efficiency};
use crate::model::{Parameter, ParameterSet};

fn impact(chart: &TornadoChart, parameter: Parameter) -> f64 {
    chart
        .bar(TornadoFactor::Parameter(parameter))
        .map(|b| b.impact)
        .unwrap()
}

fn with_loss(loss: f64) -> ParameterSet {
    ParameterSet::builder().loss_unit(loss).build().unwrap()
}

/// Impacts of the default scenario without a loss term
#[test]
fn test_tornado_default_impacts() {
    let chart = local_sensitivity(&with_loss(0.0)).unwrap();

    assert!((impact(&chart, Parameter::B0) - 0.04943).abs() < 1e-4);
    assert!((impact(&chart, Parameter::PrepPostRatio) - 0.04706).abs() < 1e-4);
    assert!((impact(&chart, Parameter::CrossCheckRatio) - 0.03529).abs() < 1e-4);
    for p in [Parameter::A1, Parameter::A2, Parameter::A3] {
        assert!((impact(&chart, p) - 0.03154).abs() < 1e-4, "{p}");
    }
    assert_eq!(impact(&chart, Parameter::LossUnit), 0.0);

    let ranking = chart.ranking();
    assert_eq!(&ranking[..3], &["b0", "prep_post_ratio", "cross_check_ratio"]);
    assert_eq!(ranking[6], "loss_unit");
}

/// Bars are sorted by impact, largest first
#[test]
fn test_tornado_sorted() {
    let chart = local_sensitivity(&with_loss(1.5)).unwrap();
    for pair in chart.bars.windows(2) {
        assert!(pair[0].impact >= pair[1].impact);
    }
    assert!(chart.bars.iter().all(|b| b.impact >= 0.0));
}

/// The low and high evaluations are real model evaluations
#[test]
fn test_tornado_bar_endpoints() {
    let params = with_loss(1.0);
    let chart = local_sensitivity(&params).unwrap();
    let bar = chart.bar(TornadoFactor::Parameter(Parameter::B0)).unwrap();
    let low = evaluate(&params.with(Parameter::B0, 0.64)).unwrap();
    assert!((bar.e_low - low.total_efficiency).abs() < 1e-9);
    assert!((bar.high - 0.96).abs() < 1e-12);
    assert!(bar.e_high < chart.baseline_total_efficiency);
}

/// Doubling the loss multiplier keeps the relative ranking of inputs
#[test]
fn test_tornado_rank_stable_under_loss_scaling() {
    let tracked = ["b0", "a1", "prep_post_ratio", "cross_check_ratio", "loss_unit"];
    let filtered = |loss: f64| -> Vec<&'static str> {
        local_sensitivity(&with_loss(loss))
            .unwrap()
            .ranking()
            .into_iter()
            .filter(|name| tracked.contains(name))
            .collect()
    };
    let once = filtered(1.0);
    assert_eq!(once, filtered(2.0));
    assert_eq!(once, tracked.to_vec());
}

/// Elasticities agree with central finite differences of the aggregate form
#[test]
fn test_elasticity_matches_finite_difference() {
    let params = with_loss(2.0);
    let out = evaluate(&params).unwrap();
    let table = elasticities(&params).unwrap();
    let (c, s, l) = (out.labor_cost, out.success_rate, params.loss_unit);
    let e = out.total_efficiency;
    let h = 1e-6;

    let fd_c = (total_efficiency(c * (1.0 + h), s, l).unwrap()
        - total_efficiency(c * (1.0 - h), s, l).unwrap())
        / (2.0 * h * e);
    let fd_s = (total_efficiency(c, s * (1.0 + h), l).unwrap()
        - total_efficiency(c, s * (1.0 - h), l).unwrap())
        / (2.0 * h * e);
    let fd_l = (total_efficiency(c, s, l * (1.0 + h)).unwrap()
        - total_efficiency(c, s, l * (1.0 - h)).unwrap())
        / (2.0 * h * e);

    let elasticity = |input| table.row(input).unwrap().elasticity;
    assert!((elasticity(AggregateInput::LaborCost) - fd_c).abs() < 1e-6);
    assert!((elasticity(AggregateInput::SuccessRate) - fd_s).abs() < 1e-6);
    assert!((elasticity(AggregateInput::LossUnit) - fd_l).abs() < 1e-6);
}

/// Loss-unit partial scales with labor cost
#[test]
fn test_loss_partial_includes_labor_cost() {
    let params = with_loss(1.0);
    let out = evaluate(&params).unwrap();
    let grad = gradient_at(&params).unwrap();
    let expected = out.labor_cost * (1.0 - out.success_rate) / out.success_rate;
    assert!((grad.d_loss_unit - expected).abs() < 1e-12);
}

/// Zero task hours give E_total = 0, which has no elasticity
#[test]
fn test_elasticity_of_zero_efficiency_is_an_error() {
    let params = ParameterSet::builder()
        .task_hours(0.0, 0.0, 0.0)
        .loss_unit(1.0)
        .build()
        .unwrap();
    assert_eq!(evaluate(&params).unwrap().total_efficiency, 0.0);
    assert_eq!(elasticities(&params), Err(DomainError::ZeroEfficiency));
}
