use serde::{Deserialize, Serialize};

/// Class of a continuous input. Drives clamping and sampling bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Probability in [0, 1]
    Probability,
    /// Overhead fraction of task time
    Ratio,
    /// Loss multiplier per unit failure probability
    Cost,
    /// Task duration in hours
    Time,
}

impl ParameterKind {
    /// Admissible `(min, max)` for values of this kind
    pub const fn domain(self) -> (f64, f64) {
        match self {
            ParameterKind::Probability => (0.0, 1.0),
            ParameterKind::Ratio | ParameterKind::Cost | ParameterKind::Time => {
                (0.0, f64::INFINITY)
            }
        }
    }

    /// Clamp a perturbed value back into the domain of this kind
    #[inline]
    pub fn clamp(self, value: f64) -> f64 {
        let (min, max) = self.domain();
        value.clamp(min, max)
    }
}

/// Identifier for one continuous primitive input of a [`ParameterSet`](super::ParameterSet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    A1,
    A2,
    A3,
    B0,
    CrossCheckRatio,
    PrepPostRatio,
    LossUnit,
    T1,
    T2,
    T3,
}

impl Parameter {
    /// Every continuous input in declaration order
    pub const ALL: [Parameter; 10] = [
        Parameter::A1,
        Parameter::A2,
        Parameter::A3,
        Parameter::B0,
        Parameter::CrossCheckRatio,
        Parameter::PrepPostRatio,
        Parameter::LossUnit,
        Parameter::T1,
        Parameter::T2,
        Parameter::T3,
    ];

    /// Inputs perturbed individually by the tornado analysis
    pub const TORNADO: [Parameter; 7] = [
        Parameter::A1,
        Parameter::A2,
        Parameter::A3,
        Parameter::B0,
        Parameter::CrossCheckRatio,
        Parameter::PrepPostRatio,
        Parameter::LossUnit,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Parameter::A1 => "a1",
            Parameter::A2 => "a2",
            Parameter::A3 => "a3",
            Parameter::B0 => "b0",
            Parameter::CrossCheckRatio => "cross_check_ratio",
            Parameter::PrepPostRatio => "prep_post_ratio",
            Parameter::LossUnit => "loss_unit",
            Parameter::T1 => "t1",
            Parameter::T2 => "t2",
            Parameter::T3 => "t3",
        }
    }

    pub const fn kind(self) -> ParameterKind {
        match self {
            Parameter::A1 | Parameter::A2 | Parameter::A3 | Parameter::B0 => {
                ParameterKind::Probability
            }
            Parameter::CrossCheckRatio | Parameter::PrepPostRatio => ParameterKind::Ratio,
            Parameter::LossUnit => ParameterKind::Cost,
            Parameter::T1 | Parameter::T2 | Parameter::T3 => ParameterKind::Time,
        }
    }

    /// Range accepted by [`ParameterSetBuilder`](crate::config::ParameterSetBuilder).
    ///
    /// Step probabilities exclude zero and overhead ratios are capped at one half,
    /// which is tighter than [`ParameterKind::domain`] used for clamping.
    pub const fn valid_range(self) -> (f64, f64) {
        match self {
            Parameter::A1 | Parameter::A2 | Parameter::A3 => (f64::MIN_POSITIVE, 1.0),
            Parameter::B0 => (0.0, 1.0),
            Parameter::CrossCheckRatio | Parameter::PrepPostRatio => (0.0, 0.5),
            Parameter::LossUnit | Parameter::T1 | Parameter::T2 | Parameter::T3 => {
                (0.0, f64::INFINITY)
            }
        }
    }

    /// Look up a parameter by its snake_case name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for p in Parameter::ALL {
            assert_eq!(Parameter::from_name(p.name()), Some(p));
        }
        assert_eq!(Parameter::from_name("t4"), None);
    }

    #[test]
    fn probability_clamp() {
        assert_eq!(ParameterKind::Probability.clamp(1.14), 1.0);
        assert_eq!(ParameterKind::Ratio.clamp(-0.1), 0.0);
        assert_eq!(ParameterKind::Time.clamp(36.0), 36.0);
    }
}
