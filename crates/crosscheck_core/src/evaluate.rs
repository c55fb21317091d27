//! Deterministic cost model.
//!
//! ```text
//! a_total = a1·a2·a3
//! b_eff   = b0·q_checker·s_checker
//! S       = 1 − (1 − a_total)(1 − b_eff)
//! T       = (t1 + t2 + t3)·q_time·s_time
//! C       = T·(1 + cross_check_ratio + prep_post_ratio)
//! C_loss  = C + loss_unit·C·(1 − S)
//! E       = C / S
//! E_total = C_loss / S
//! ```

use crate::derivatives::total_efficiency_of;
use crate::error::DomainError;
use crate::model::{ModelOutputs, Parameter, ParameterSet};

/// Evaluate the model at a validated operating point
pub fn evaluate(params: &ParameterSet) -> Result<ModelOutputs, DomainError> {
    params.validate()?;
    checked(compute(params))
}

/// Evaluate with one field overridden
pub fn evaluate_with(
    params: &ParameterSet,
    parameter: Parameter,
    value: f64,
) -> Result<ModelOutputs, DomainError> {
    evaluate(&params.with(parameter, value))
}

/// Evaluate many parameter sets, stopping at the first failure
pub fn evaluate_batch(sets: &[ParameterSet]) -> Result<Vec<ModelOutputs>, DomainError> {
    sets.iter().map(evaluate).collect()
}

/// `E_total` from aggregate labor cost, success rate and loss multiplier
pub fn total_efficiency(
    labor_cost: f64,
    success_rate: f64,
    loss_unit: f64,
) -> Result<f64, DomainError> {
    if success_rate.is_nan() || success_rate <= 0.0 {
        return Err(DomainError::ZeroSuccessRate);
    }
    Ok(total_efficiency_of(labor_cost, success_rate, loss_unit))
}

/// Raw formula without validation. A zero success rate yields infinities.
#[inline]
pub(crate) fn compute(params: &ParameterSet) -> ModelOutputs {
    let quality = params.quality_grade.factors();
    let schedule = params.schedule_grade.factors();

    let a_total = params.a1 * params.a2 * params.a3;
    let b_effective = params.b0 * quality.checker * schedule.checker;
    let success_rate = 1.0 - (1.0 - a_total) * (1.0 - b_effective);

    let task_time = params.total_task_hours() * quality.time * schedule.time;
    let labor_cost = task_time * (1.0 + params.cross_check_ratio + params.prep_post_ratio);
    let loss_adjusted_cost = labor_cost + params.loss_unit * labor_cost * (1.0 - success_rate);

    ModelOutputs {
        a_total,
        b_effective,
        success_rate,
        task_time,
        labor_cost,
        loss_adjusted_cost,
        efficiency: labor_cost / success_rate,
        total_efficiency: total_efficiency_of(labor_cost, success_rate, params.loss_unit),
    }
}

/// Reject outputs whose success rate leaves the efficiencies undefined
#[inline]
pub(crate) fn checked(outputs: ModelOutputs) -> Result<ModelOutputs, DomainError> {
    if outputs.success_rate > 0.0 && outputs.success_rate.is_finite() {
        Ok(outputs)
    } else {
        Err(DomainError::ZeroSuccessRate)
    }
}
