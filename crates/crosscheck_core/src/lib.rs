//! Cross-check cost simulation library
//!
//! Estimates the expected labor cost per successful outcome of a three-step work
//! process with an independent verification stage, and measures how sensitive
//! that cost is to each input. It supports:
//! - A closed-form cost model with quality and schedule policy grades
//! - Exact partial derivatives via forward-mode automatic differentiation
//! - Tornado (±20 %) local sensitivity
//! - Elasticity and Monte Carlo standardized sensitivity
//! - Seeded, thread-count-independent Monte Carlo sampling
//! - Sobol first-order and total-order indices with bootstrap intervals
//!
//! # Example
//!
//! ```ignore
//! use crosscheck_core::{ParameterSet, evaluate, local_sensitivity, run_monte_carlo};
//! use crosscheck_core::model::{QualityGrade, ScheduleGrade};
//!
//! let params = ParameterSet::builder()
//!     .step_success(0.95, 0.95, 0.80)
//!     .checker(0.80)
//!     .grades(QualityGrade::Standard, ScheduleGrade::OnTime)
//!     .loss_unit(1.0)
//!     .build()?;
//!
//! let outputs = evaluate(&params)?;
//! let chart = local_sensitivity(&params)?;
//! let run = run_monte_carlo(&params, 100_000, 42)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod cache;
pub mod derivatives;
pub mod error;
pub mod evaluate;
pub mod sampling;
pub mod simulation;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::{
    OutputSpread, ScenarioGrid, SensitivityTable, SobolReport, TornadoChart,
    elasticity_and_standardized, global_sensitivity, local_sensitivity, scenario_grid,
};
pub use cache::AnalysisCache;
pub use config::{AnalysisConfig, ParameterSetBuilder};
pub use error::{AnalysisError, DomainError, SamplingConfigError};
pub use evaluate::evaluate;
pub use model::{ModelOutputs, Parameter, ParameterSet};
pub use simulation::{MonteCarloRun, run_monte_carlo};
