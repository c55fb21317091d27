//! Elasticity and standardized sensitivity of `E_total`.
//!
//! Both scale the exact partial derivatives from [`crate::derivatives`]:
//! elasticity by the operating-point ratio `x / E_total`, standardized
//! sensitivity by the ratio of Monte Carlo standard deviations `σx / σE_total`.

use serde::{Deserialize, Serialize};

use super::descending_nan_last;
use crate::derivatives::gradient;
use crate::error::DomainError;
use crate::evaluate::evaluate;
use crate::model::ParameterSet;

/// Standard deviations of the sampled aggregates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputSpread {
    pub sigma_labor_cost: f64,
    pub sigma_success_rate: f64,
    /// Spread of the sampled loss multiplier itself
    pub sigma_loss_unit: f64,
    pub sigma_total_efficiency: f64,
}

/// Aggregate input of `E_total(C, S, ℓ)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateInput {
    LaborCost,
    SuccessRate,
    LossUnit,
}

impl AggregateInput {
    pub const ALL: [AggregateInput; 3] = [
        AggregateInput::LaborCost,
        AggregateInput::SuccessRate,
        AggregateInput::LossUnit,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            AggregateInput::LaborCost => "labor_cost",
            AggregateInput::SuccessRate => "success_rate",
            AggregateInput::LossUnit => "loss_unit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRow {
    pub input: AggregateInput,
    /// Operating-point value of the input
    pub value: f64,
    /// ∂E_total/∂input
    pub derivative: f64,
    /// |∂E_total/∂input|
    pub slope: f64,
    pub elasticity: f64,
    /// Present when a Monte Carlo spread was supplied
    pub standardized: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityTable {
    pub total_efficiency: f64,
    /// One row per aggregate input, in [`AggregateInput::ALL`] order
    pub rows: Vec<SensitivityRow>,
}

impl SensitivityTable {
    pub fn row(&self, input: AggregateInput) -> Option<&SensitivityRow> {
        self.rows.iter().find(|r| r.input == input)
    }

    /// Rows ordered by absolute elasticity, largest first
    pub fn ranked_by_elasticity(&self) -> Vec<&SensitivityRow> {
        self.ranked(|r| r.elasticity.abs())
    }

    /// Rows ordered by absolute standardized sensitivity, largest first
    pub fn ranked_by_standardized(&self) -> Vec<&SensitivityRow> {
        self.ranked(|r| r.standardized.map_or(f64::NAN, f64::abs))
    }

    fn ranked(&self, key: impl Fn(&SensitivityRow) -> f64) -> Vec<&SensitivityRow> {
        let mut rows: Vec<&SensitivityRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| descending_nan_last(key(a), key(b)));
        rows
    }
}

/// Elasticities only; needs no sampling
pub fn elasticities(params: &ParameterSet) -> Result<SensitivityTable, DomainError> {
    build_table(params, None)
}

/// Elasticities plus standardized sensitivities from a Monte Carlo spread
pub fn elasticity_and_standardized(
    params: &ParameterSet,
    spread: &OutputSpread,
) -> Result<SensitivityTable, DomainError> {
    let sigma_e = spread.sigma_total_efficiency;
    if !sigma_e.is_finite() || sigma_e == 0.0 {
        return Err(DomainError::ZeroOutputSpread {
            output: "total_efficiency",
        });
    }
    build_table(params, Some(spread))
}

fn build_table(
    params: &ParameterSet,
    spread: Option<&OutputSpread>,
) -> Result<SensitivityTable, DomainError> {
    let outputs = evaluate(params)?;
    let grad = gradient(outputs.labor_cost, outputs.success_rate, params.loss_unit)?;
    let e_total = outputs.total_efficiency;
    if e_total == 0.0 || !e_total.is_finite() {
        return Err(DomainError::ZeroEfficiency);
    }

    let rows = AggregateInput::ALL
        .into_iter()
        .map(|input| {
            let (value, derivative, sigma) = match input {
                AggregateInput::LaborCost => (
                    outputs.labor_cost,
                    grad.d_labor_cost,
                    spread.map(|s| s.sigma_labor_cost),
                ),
                AggregateInput::SuccessRate => (
                    outputs.success_rate,
                    grad.d_success_rate,
                    spread.map(|s| s.sigma_success_rate),
                ),
                AggregateInput::LossUnit => (
                    params.loss_unit,
                    grad.d_loss_unit,
                    spread.map(|s| s.sigma_loss_unit),
                ),
            };
            SensitivityRow {
                input,
                value,
                derivative,
                slope: derivative.abs(),
                elasticity: derivative * value / e_total,
                standardized: spread.zip(sigma).map(|(s, sigma)| {
                    derivative * sigma / s.sigma_total_efficiency
                }),
            }
        })
        .collect();

    Ok(SensitivityTable {
        total_efficiency: e_total,
        rows,
    })
}
