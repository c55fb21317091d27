//! Sensitivity analysis of the total efficiency metric.
//!
//! Three complementary views are provided:
//!
//! - **Local** ([`local_sensitivity`]): one-at-a-time ±20 % perturbation of each
//!   input around the operating point, rendered as a tornado chart.
//! - **Derivative-based** ([`elasticity_and_standardized`]): exact partial
//!   derivatives with respect to labor cost, success rate and loss unit, scaled
//!   by operating-point values (elasticity) or by Monte Carlo standard
//!   deviations (standardized sensitivity).
//! - **Global** ([`global_sensitivity`]): variance-based Sobol first-order and
//!   total-order indices over a box around the operating point.
//!
//! ```ignore
//! use crosscheck_core::analysis::{local_sensitivity, elasticity_and_standardized};
//! use crosscheck_core::simulation::run_monte_carlo;
//!
//! let chart = local_sensitivity(&params)?;
//! let run = run_monte_carlo(&params, 100_000, 42)?;
//! let table = elasticity_and_standardized(&params, &run.spread())?;
//! ```
//!
//! [`scenario_grid`] additionally compares the four quality × schedule policies.

mod elasticity;
mod global;
mod scenarios;
pub mod sobol_sequence;
mod tornado;

pub use elasticity::*;
pub use global::*;
pub use scenarios::*;
pub use tornado::*;

use std::cmp::Ordering;

/// Descending order with NaN placed after every number
pub(crate) fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_sorts_last() {
        let mut values = vec![0.1, f64::NAN, 0.5, 0.0, f64::NAN, 0.3];
        values.sort_by(|a, b| descending_nan_last(*a, *b));
        assert_eq!(&values[..4], &[0.5, 0.3, 0.1, 0.0]);
        assert!(values[4].is_nan() && values[5].is_nan());
    }
}
