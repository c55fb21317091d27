//! Exact partial derivatives of `E_total` by forward-mode automatic differentiation.
//!
//! The efficiency formula is written once, generically over [`Scalar`]. Evaluating
//! it with plain `f64` gives the value; evaluating it with [`Dual`] numbers seeded
//! on one input gives that input's partial derivative exactly, with no step size.

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::evaluate::evaluate;
use crate::model::ParameterSet;

/// Arithmetic needed by the efficiency formula
pub trait Scalar:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
    fn constant(value: f64) -> Self;
}

impl Scalar for f64 {
    #[inline]
    fn constant(value: f64) -> Self {
        value
    }
}

/// Value paired with its derivative along one seeded direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual {
    pub value: f64,
    pub tangent: f64,
}

impl Dual {
    /// The differentiation variable
    pub const fn variable(value: f64) -> Self {
        Self {
            value,
            tangent: 1.0,
        }
    }
}

impl Scalar for Dual {
    #[inline]
    fn constant(value: f64) -> Self {
        Self {
            value,
            tangent: 0.0,
        }
    }
}

impl Add for Dual {
    type Output = Dual;
    #[inline]
    fn add(self, rhs: Dual) -> Dual {
        Dual {
            value: self.value + rhs.value,
            tangent: self.tangent + rhs.tangent,
        }
    }
}

impl Sub for Dual {
    type Output = Dual;
    #[inline]
    fn sub(self, rhs: Dual) -> Dual {
        Dual {
            value: self.value - rhs.value,
            tangent: self.tangent - rhs.tangent,
        }
    }
}

impl Mul for Dual {
    type Output = Dual;
    #[inline]
    fn mul(self, rhs: Dual) -> Dual {
        Dual {
            value: self.value * rhs.value,
            tangent: self.tangent * rhs.value + self.value * rhs.tangent,
        }
    }
}

impl Div for Dual {
    type Output = Dual;
    #[inline]
    fn div(self, rhs: Dual) -> Dual {
        Dual {
            value: self.value / rhs.value,
            tangent: (self.tangent * rhs.value - self.value * rhs.tangent)
                / (rhs.value * rhs.value),
        }
    }
}

/// `E_total(C, S, ℓ) = (C + C·ℓ·(1 − S)) / S`
#[inline]
pub fn total_efficiency_of<T: Scalar>(labor_cost: T, success_rate: T, loss_unit: T) -> T {
    let failure = T::constant(1.0) - success_rate;
    (labor_cost + labor_cost * loss_unit * failure) / success_rate
}

/// Partial derivatives of `E_total` with respect to its three aggregate inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotalEfficiencyGradient {
    /// ∂E_total/∂C = (1 + ℓ(1 − S)) / S
    pub d_labor_cost: f64,
    /// ∂E_total/∂S = −C(1 + ℓ) / S²
    pub d_success_rate: f64,
    /// ∂E_total/∂ℓ = C(1 − S) / S
    pub d_loss_unit: f64,
}

/// Differentiate `E_total` at `(C, S, ℓ)`
pub fn gradient(
    labor_cost: f64,
    success_rate: f64,
    loss_unit: f64,
) -> Result<TotalEfficiencyGradient, DomainError> {
    if success_rate.is_nan() || success_rate <= 0.0 {
        return Err(DomainError::ZeroSuccessRate);
    }

    let c = Dual::constant(labor_cost);
    let s = Dual::constant(success_rate);
    let l = Dual::constant(loss_unit);

    Ok(TotalEfficiencyGradient {
        d_labor_cost: total_efficiency_of(Dual::variable(labor_cost), s, l).tangent,
        d_success_rate: total_efficiency_of(c, Dual::variable(success_rate), l).tangent,
        d_loss_unit: total_efficiency_of(c, s, Dual::variable(loss_unit)).tangent,
    })
}

/// Differentiate at the operating point of a parameter set
pub fn gradient_at(params: &ParameterSet) -> Result<TotalEfficiencyGradient, DomainError> {
    let outputs = evaluate(params)?;
    gradient(outputs.labor_cost, outputs.success_rate, params.loss_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn matches_closed_forms() {
        for &(c, s, l) in &[(85.0, 0.9444, 0.0), (85.0, 0.9444, 1.0), (37.7, 0.5, 4.0)] {
            let g = gradient(c, s, l).unwrap();
            assert!(close(g.d_labor_cost, (1.0 + l * (1.0 - s)) / s));
            assert!(close(g.d_success_rate, -c * (1.0 + l) / (s * s)));
            assert!(close(g.d_loss_unit, c * (1.0 - s) / s));
        }
    }

    #[test]
    fn loss_term_scales_with_labor_cost() {
        let small = gradient(10.0, 0.8, 1.0).unwrap();
        let large = gradient(20.0, 0.8, 1.0).unwrap();
        assert!(close(large.d_loss_unit, 2.0 * small.d_loss_unit));
        assert!(close(large.d_success_rate, 2.0 * small.d_success_rate));
    }

    #[test]
    fn zero_success_rate() {
        assert_eq!(gradient(85.0, 0.0, 1.0), Err(DomainError::ZeroSuccessRate));
    }

    #[test]
    fn dual_value_matches_plain_evaluation() {
        let plain = total_efficiency_of(85.0, 0.9, 2.0);
        let dual = total_efficiency_of(Dual::variable(85.0), Dual::constant(0.9), Dual::constant(2.0));
        assert!(close(plain, dual.value));
    }
}
