//! One-at-a-time perturbation analysis (tornado chart).

use serde::{Deserialize, Serialize};

use super::descending_nan_last;
use crate::error::DomainError;
use crate::evaluate::evaluate;
use crate::model::{Parameter, ParameterKind, ParameterSet};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TornadoConfig {
    /// Relative perturbation applied in each direction
    pub swing: f64,
    /// Add a bar scaling t1, t2 and t3 together
    pub include_task_time: bool,
}

impl Default for TornadoConfig {
    fn default() -> Self {
        Self {
            swing: 0.20,
            include_task_time: false,
        }
    }
}

/// Input perturbed by one tornado bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TornadoFactor {
    Parameter(Parameter),
    /// t1, t2 and t3 scaled by the same factor
    TotalTaskTime,
}

impl TornadoFactor {
    pub fn label(&self) -> &'static str {
        match self {
            TornadoFactor::Parameter(p) => p.name(),
            TornadoFactor::TotalTaskTime => "total_task_time",
        }
    }

    fn kind(&self) -> ParameterKind {
        match self {
            TornadoFactor::Parameter(p) => p.kind(),
            TornadoFactor::TotalTaskTime => ParameterKind::Time,
        }
    }

    fn baseline(&self, params: &ParameterSet) -> f64 {
        match self {
            TornadoFactor::Parameter(p) => params.get(*p),
            TornadoFactor::TotalTaskTime => params.total_task_hours(),
        }
    }

    fn apply(&self, params: &ParameterSet, value: f64) -> ParameterSet {
        match self {
            TornadoFactor::Parameter(p) => params.with(*p, value),
            TornadoFactor::TotalTaskTime => {
                let total = params.total_task_hours();
                if total == 0.0 {
                    *params
                } else {
                    params.with_scaled_task_time(value / total)
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TornadoBar {
    pub factor: TornadoFactor,
    pub baseline: f64,
    pub low: f64,
    pub high: f64,
    /// E_total with the input at `low`
    pub e_low: f64,
    /// E_total with the input at `high`
    pub e_high: f64,
    /// Largest relative deviation of E_total from baseline. NaN when E_total is 0.
    pub impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TornadoChart {
    pub baseline_total_efficiency: f64,
    /// Sorted by impact, largest first
    pub bars: Vec<TornadoBar>,
}

impl TornadoChart {
    pub fn bar(&self, factor: TornadoFactor) -> Option<&TornadoBar> {
        self.bars.iter().find(|b| b.factor == factor)
    }

    /// Factor labels in ranked order
    pub fn ranking(&self) -> Vec<&'static str> {
        self.bars.iter().map(|b| b.factor.label()).collect()
    }
}

/// Tornado analysis with the default ±20 % swing
pub fn local_sensitivity(params: &ParameterSet) -> Result<TornadoChart, DomainError> {
    local_sensitivity_with(params, &TornadoConfig::default())
}

pub fn local_sensitivity_with(
    params: &ParameterSet,
    config: &TornadoConfig,
) -> Result<TornadoChart, DomainError> {
    let baseline = evaluate(params)?.total_efficiency;

    let mut factors: Vec<TornadoFactor> = Parameter::TORNADO
        .into_iter()
        .map(TornadoFactor::Parameter)
        .collect();
    if config.include_task_time {
        factors.push(TornadoFactor::TotalTaskTime);
    }

    let mut bars = factors
        .into_iter()
        .map(|factor| tornado_bar(params, factor, config.swing, baseline))
        .collect::<Result<Vec<_>, _>>()?;
    bars.sort_by(|a, b| descending_nan_last(a.impact, b.impact));

    tracing::debug!(
        baseline,
        top = bars.first().map(|b| b.factor.label()),
        "tornado analysis complete"
    );
    Ok(TornadoChart {
        baseline_total_efficiency: baseline,
        bars,
    })
}

fn tornado_bar(
    params: &ParameterSet,
    factor: TornadoFactor,
    swing: f64,
    baseline_e: f64,
) -> Result<TornadoBar, DomainError> {
    let value = factor.baseline(params);
    let kind = factor.kind();
    let low = kind.clamp(value * (1.0 - swing));
    let high = kind.clamp(value * (1.0 + swing));

    let e_low = evaluate(&factor.apply(params, low))?.total_efficiency;
    let e_high = evaluate(&factor.apply(params, high))?.total_efficiency;

    let impact = if baseline_e == 0.0 {
        f64::NAN
    } else {
        (e_low - baseline_e)
            .abs()
            .max((e_high - baseline_e).abs())
            / baseline_e
    };

    Ok(TornadoBar {
        factor,
        baseline: value,
        low,
        high,
        e_low,
        e_high,
        impact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_high_is_clamped() {
        let params = ParameterSet {
            a1: 0.95,
            ..ParameterSet::default()
        };
        let chart = local_sensitivity(&params).unwrap();
        let bar = chart.bar(TornadoFactor::Parameter(Parameter::A1)).unwrap();
        assert_eq!(bar.high, 1.0);
        assert!((bar.low - 0.76).abs() < 1e-12);
    }

    #[test]
    fn zero_loss_unit_has_no_impact() {
        let chart = local_sensitivity(&ParameterSet::default()).unwrap();
        let bar = chart
            .bar(TornadoFactor::Parameter(Parameter::LossUnit))
            .unwrap();
        assert_eq!(bar.impact, 0.0);
        assert_eq!(chart.bars.last().map(|b| b.factor), Some(bar.factor));
    }

    #[test]
    fn task_time_bar_is_optional() {
        let params = ParameterSet::default();
        let plain = local_sensitivity(&params).unwrap();
        assert_eq!(plain.bars.len(), 7);

        let config = TornadoConfig {
            include_task_time: true,
            ..Default::default()
        };
        let chart = local_sensitivity_with(&params, &config).unwrap();
        assert_eq!(chart.bars.len(), 8);
        let bar = chart.bar(TornadoFactor::TotalTaskTime).unwrap();
        assert!((bar.impact - 0.2).abs() < 1e-9);
        assert_eq!(chart.bars[0].factor, TornadoFactor::TotalTaskTime);
    }

    #[test]
    fn zero_efficiency_gives_nan_impacts_sorted_last() {
        let params = ParameterSet {
            t1: 0.0,
            t2: 0.0,
            t3: 0.0,
            ..ParameterSet::default()
        };
        let chart = local_sensitivity(&params).unwrap();
        assert_eq!(chart.baseline_total_efficiency, 0.0);
        assert!(chart.bars.iter().all(|b| b.impact.is_nan()));
    }
}
