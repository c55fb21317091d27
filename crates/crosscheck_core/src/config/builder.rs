//! Parameter Set Builder
//!
//! Fluent construction of a validated [`ParameterSet`]. Unset fields keep the
//! values of [`ParameterSet::default`].
//!
//! # Example
//!
//! ```ignore
//! use crosscheck_core::config::ParameterSetBuilder;
//! use crosscheck_core::model::{QualityGrade, ScheduleGrade};
//!
//! let params = ParameterSetBuilder::new()
//!     .step_success(0.95, 0.95, 0.80)
//!     .checker(0.80)
//!     .grades(QualityGrade::Low, ScheduleGrade::Late)
//!     .overheads(0.30, 0.40)
//!     .task_hours(10.0, 10.0, 30.0)
//!     .loss_unit(1.0)
//!     .build()?;
//! ```

use crate::error::DomainError;
use crate::model::{Parameter, ParameterSet, QualityGrade, ScheduleGrade};

/// Builder for [`ParameterSet`] that validates every field on `build`
#[derive(Debug, Clone)]
pub struct ParameterSetBuilder {
    params: ParameterSet,
}

impl Default for ParameterSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterSetBuilder {
    /// Start from the default scenario
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: ParameterSet::default(),
        }
    }

    /// Start from an existing parameter set
    #[must_use]
    pub fn from_params(params: ParameterSet) -> Self {
        Self { params }
    }

    // =========================================================================
    // Probabilities
    // =========================================================================

    #[must_use]
    pub fn a1(mut self, value: f64) -> Self {
        self.params.a1 = value;
        self
    }

    #[must_use]
    pub fn a2(mut self, value: f64) -> Self {
        self.params.a2 = value;
        self
    }

    #[must_use]
    pub fn a3(mut self, value: f64) -> Self {
        self.params.a3 = value;
        self
    }

    /// Set all three step success probabilities
    #[must_use]
    pub fn step_success(self, a1: f64, a2: f64, a3: f64) -> Self {
        self.a1(a1).a2(a2).a3(a3)
    }

    /// Set the checker's base detection probability
    #[must_use]
    pub fn checker(mut self, b0: f64) -> Self {
        self.params.b0 = b0;
        self
    }

    // =========================================================================
    // Policy
    // =========================================================================

    #[must_use]
    pub fn quality(mut self, grade: QualityGrade) -> Self {
        self.params.quality_grade = grade;
        self
    }

    #[must_use]
    pub fn schedule(mut self, grade: ScheduleGrade) -> Self {
        self.params.schedule_grade = grade;
        self
    }

    #[must_use]
    pub fn grades(self, quality: QualityGrade, schedule: ScheduleGrade) -> Self {
        self.quality(quality).schedule(schedule)
    }

    // =========================================================================
    // Costs
    // =========================================================================

    #[must_use]
    pub fn cross_check_ratio(mut self, value: f64) -> Self {
        self.params.cross_check_ratio = value;
        self
    }

    #[must_use]
    pub fn prep_post_ratio(mut self, value: f64) -> Self {
        self.params.prep_post_ratio = value;
        self
    }

    /// Set both overhead fractions
    #[must_use]
    pub fn overheads(self, cross_check: f64, prep_post: f64) -> Self {
        self.cross_check_ratio(cross_check)
            .prep_post_ratio(prep_post)
    }

    #[must_use]
    pub fn loss_unit(mut self, value: f64) -> Self {
        self.params.loss_unit = value;
        self
    }

    /// Set the hours of the three tasks
    #[must_use]
    pub fn task_hours(mut self, t1: f64, t2: f64, t3: f64) -> Self {
        self.params.t1 = t1;
        self.params.t2 = t2;
        self.params.t3 = t3;
        self
    }

    /// Set any continuous field by identifier
    #[must_use]
    pub fn set(mut self, parameter: Parameter, value: f64) -> Self {
        self.params = self.params.with(parameter, value);
        self
    }

    /// Validate and produce the parameter set
    pub fn build(self) -> Result<ParameterSet, DomainError> {
        for parameter in Parameter::ALL {
            let value = self.params.get(parameter);
            if !value.is_finite() {
                return Err(DomainError::NonFinite {
                    parameter: parameter.name(),
                });
            }
            let (min, max) = parameter.valid_range();
            if value < min || value > max {
                return Err(DomainError::OutOfRange {
                    parameter: parameter.name(),
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(self.params)
    }
}
