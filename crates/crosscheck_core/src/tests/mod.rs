//! Integration tests for the cross-check cost model and its analyses
//!
//! Tests are organized by topic:
//! - `model` - Deterministic model against worked scenarios
//! - `builder` - Parameter set construction and validation
//! - `local_sensitivity` - Tornado ranking and elasticity identities
//! - `monte_carlo` - Reproducibility and summary behaviour of sampling
//! - `global_sensitivity` - Sobol indices on the cost model
//! - `properties` - Property-based monotonicity checks

mod builder;
mod local_sensitivity;
