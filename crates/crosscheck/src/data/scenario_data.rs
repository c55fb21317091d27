use std::fs;
use std::path::{Path, PathBuf};

use crosscheck_core::model::{QualityGrade, ScheduleGrade};
use crosscheck_core::{AnalysisConfig, DomainError, ParameterSet, ParameterSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::io::write_new_file;

/// Errors loading or saving a scenario file
#[derive(Debug, Error)]
pub enum ScenarioFileError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario YAML: {0}")]
    Parse(String),

    #[error("failed to serialize scenario: {0}")]
    Serialize(String),

    #[error("invalid scenario parameters: {0}")]
    Invalid(#[from] DomainError),
}

/// A named parameter set plus the analysis settings to run it with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub parameters: ParametersData,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_name() -> String {
    "baseline".to_string()
}

impl Default for ScenarioData {
    fn default() -> Self {
        Self {
            name: default_name(),
            parameters: ParametersData::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

/// Model inputs as written in a scenario file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametersData {
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub b0: f64,
    pub quality: QualityGrade,
    pub schedule: ScheduleGrade,
    pub cross_check_ratio: f64,
    pub prep_post_ratio: f64,
    pub loss_unit: f64,
    pub tasks: TasksData,
}

/// Base hours of the three work steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksData {
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
}

impl Default for ParametersData {
    fn default() -> Self {
        Self::from_parameter_set(&ParameterSet::default())
    }
}

impl Default for TasksData {
    fn default() -> Self {
        ParametersData::default().tasks
    }
}

impl ParametersData {
    pub fn from_parameter_set(params: &ParameterSet) -> Self {
        Self {
            a1: params.a1,
            a2: params.a2,
            a3: params.a3,
            b0: params.b0,
            quality: params.quality_grade,
            schedule: params.schedule_grade,
            cross_check_ratio: params.cross_check_ratio,
            prep_post_ratio: params.prep_post_ratio,
            loss_unit: params.loss_unit,
            tasks: TasksData {
                t1: params.t1,
                t2: params.t2,
                t3: params.t3,
            },
        }
    }

    /// Builder seeded with these values, ready for command-line overrides
    pub fn to_builder(&self) -> ParameterSetBuilder {
        ParameterSet::builder()
            .step_success(self.a1, self.a2, self.a3)
            .checker(self.b0)
            .grades(self.quality, self.schedule)
            .overheads(self.cross_check_ratio, self.prep_post_ratio)
            .loss_unit(self.loss_unit)
            .task_hours(self.tasks.t1, self.tasks.t2, self.tasks.t3)
    }

    pub fn to_parameter_set(&self) -> Result<ParameterSet, DomainError> {
        self.to_builder().build()
    }
}

impl ScenarioData {
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioFileError> {
        serde_saphyr::from_str(yaml).map_err(|e| ScenarioFileError::Parse(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioFileError> {
        serde_saphyr::to_string(self).map_err(|e| ScenarioFileError::Serialize(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioFileError> {
        let content = fs::read_to_string(path).map_err(|source| ScenarioFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), name = %scenario.name, "loaded scenario");
        Ok(scenario)
    }

    /// Write the scenario to a path that must not exist yet
    pub fn create(&self, path: &Path) -> Result<(), ScenarioFileError> {
        let yaml = self.to_yaml()?;
        write_new_file(path, &yaml).map_err(|source| ScenarioFileError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validated parameter set of this scenario
    pub fn parameter_set(&self) -> Result<ParameterSet, ScenarioFileError> {
        Ok(self.parameters.to_parameter_set()?)
    }
}
