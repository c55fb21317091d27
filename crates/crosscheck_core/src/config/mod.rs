//! Analysis configuration
//!
//! [`AnalysisConfig`] bundles the settings of every analysis engine so a whole
//! report can be driven from one serialized document. Each section falls back
//! to its defaults when omitted.

mod builder;

pub use builder::ParameterSetBuilder;

use serde::{Deserialize, Serialize};

use crate::analysis::{SobolConfig, TornadoConfig};
use crate::simulation::MonteCarloConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub monte_carlo: MonteCarloConfig,
    pub tornado: TornadoConfig,
    pub sobol: SobolConfig,
}
