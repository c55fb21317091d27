use serde::{Deserialize, Serialize};

use crate::config::ParameterSetBuilder;
use crate::error::DomainError;

use super::parameter::Parameter;

/// Multipliers a grade applies to task time and checker effectiveness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeFactors {
    pub time: f64,
    pub checker: f64,
}

impl GradeFactors {
    pub const NOMINAL: GradeFactors = GradeFactors {
        time: 1.0,
        checker: 1.0,
    };
    pub const DEGRADED: GradeFactors = GradeFactors {
        time: 2.0 / 3.0,
        checker: 0.8,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityGrade {
    #[default]
    Standard,
    Low,
}

impl QualityGrade {
    pub const ALL: [QualityGrade; 2] = [QualityGrade::Standard, QualityGrade::Low];

    pub const fn factors(self) -> GradeFactors {
        match self {
            QualityGrade::Standard => GradeFactors::NOMINAL,
            QualityGrade::Low => GradeFactors::DEGRADED,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            QualityGrade::Standard => "standard",
            QualityGrade::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleGrade {
    #[default]
    OnTime,
    Late,
}

impl ScheduleGrade {
    pub const ALL: [ScheduleGrade; 2] = [ScheduleGrade::OnTime, ScheduleGrade::Late];

    pub const fn factors(self) -> GradeFactors {
        match self {
            ScheduleGrade::OnTime => GradeFactors::NOMINAL,
            ScheduleGrade::Late => GradeFactors::DEGRADED,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScheduleGrade::OnTime => "on_time",
            ScheduleGrade::Late => "late",
        }
    }
}

/// Complete input vector of the cost model.
///
/// Values are immutable once built; what-if variants are derived with
/// [`ParameterSet::with`], which returns a fresh copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub b0: f64,
    pub quality_grade: QualityGrade,
    pub schedule_grade: ScheduleGrade,
    pub cross_check_ratio: f64,
    pub prep_post_ratio: f64,
    pub loss_unit: f64,
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            a1: 0.95,
            a2: 0.95,
            a3: 0.80,
            b0: 0.80,
            quality_grade: QualityGrade::Standard,
            schedule_grade: ScheduleGrade::OnTime,
            cross_check_ratio: 0.30,
            prep_post_ratio: 0.40,
            loss_unit: 0.0,
            t1: 10.0,
            t2: 10.0,
            t3: 30.0,
        }
    }
}

impl ParameterSet {
    #[must_use]
    pub fn builder() -> ParameterSetBuilder {
        ParameterSetBuilder::new()
    }

    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::A1 => self.a1,
            Parameter::A2 => self.a2,
            Parameter::A3 => self.a3,
            Parameter::B0 => self.b0,
            Parameter::CrossCheckRatio => self.cross_check_ratio,
            Parameter::PrepPostRatio => self.prep_post_ratio,
            Parameter::LossUnit => self.loss_unit,
            Parameter::T1 => self.t1,
            Parameter::T2 => self.t2,
            Parameter::T3 => self.t3,
        }
    }

    /// Copy of this set with one field replaced
    #[must_use]
    pub fn with(mut self, parameter: Parameter, value: f64) -> Self {
        match parameter {
            Parameter::A1 => self.a1 = value,
            Parameter::A2 => self.a2 = value,
            Parameter::A3 => self.a3 = value,
            Parameter::B0 => self.b0 = value,
            Parameter::CrossCheckRatio => self.cross_check_ratio = value,
            Parameter::PrepPostRatio => self.prep_post_ratio = value,
            Parameter::LossUnit => self.loss_unit = value,
            Parameter::T1 => self.t1 = value,
            Parameter::T2 => self.t2 = value,
            Parameter::T3 => self.t3 = value,
        }
        self
    }

    #[must_use]
    pub fn with_grades(mut self, quality: QualityGrade, schedule: ScheduleGrade) -> Self {
        self.quality_grade = quality;
        self.schedule_grade = schedule;
        self
    }

    /// Copy with all three task times multiplied by `factor`
    #[must_use]
    pub fn with_scaled_task_time(mut self, factor: f64) -> Self {
        self.t1 *= factor;
        self.t2 *= factor;
        self.t3 *= factor;
        self
    }

    pub fn total_task_hours(&self) -> f64 {
        self.t1 + self.t2 + self.t3
    }

    /// Check that every field is finite and inside the domain of its kind.
    ///
    /// This is looser than the builder: perturbed sets produced by the
    /// sensitivity engines may push an overhead ratio past one half.
    pub fn validate(&self) -> Result<(), DomainError> {
        for parameter in Parameter::ALL {
            let value = self.get(parameter);
            if !value.is_finite() {
                return Err(DomainError::NonFinite {
                    parameter: parameter.name(),
                });
            }
            let (min, max) = parameter.kind().domain();
            if value < min || value > max {
                return Err(DomainError::OutOfRange {
                    parameter: parameter.name(),
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Stable byte encoding of every field, used for cache keys
    pub fn fingerprint(&self) -> [u8; 82] {
        let mut bytes = [0u8; 82];
        for (i, parameter) in Parameter::ALL.into_iter().enumerate() {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&self.get(parameter).to_le_bytes());
        }
        bytes[80] = self.quality_grade as u8;
        bytes[81] = self.schedule_grade as u8;
        bytes
    }
}
