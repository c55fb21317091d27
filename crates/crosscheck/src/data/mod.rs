//! On-disk scenario format
//!
//! Scenarios are YAML documents. Every field is optional and falls back to
//! the default scenario, so a file only needs to list what differs.

pub mod scenario_data;

pub use scenario_data::{ParametersData, ScenarioData, ScenarioFileError, TasksData};
