use thiserror::Error;

/// Errors raised when a value falls outside the mathematical domain of the model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Overall success rate is zero, so every efficiency ratio divides by zero
    #[error("success rate is zero; efficiency is undefined")]
    ZeroSuccessRate,

    /// Total efficiency is zero, so elasticities relative to it are undefined
    #[error("total efficiency is zero; elasticity is undefined")]
    ZeroEfficiency,

    /// An output has no spread, so standardized or variance-based indices are undefined
    #[error("{output} has zero spread; standardized sensitivity is undefined")]
    ZeroOutputSpread { output: &'static str },

    #[error("{parameter} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{parameter} is not a finite number")]
    NonFinite { parameter: &'static str },

    /// A sampled model evaluation produced NaN or infinity
    #[error("sample {index} produced a non-finite {output}")]
    NonFiniteSample { output: &'static str, index: usize },
}

/// Errors in the configuration of a sampling engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingConfigError {
    #[error("sample count must be at least 1")]
    ZeroSamples,

    #[error("invalid distribution for {parameter}: {reason}")]
    InvalidDistribution {
        parameter: &'static str,
        reason: String,
    },

    #[error("{requested} samples requested, at most {max} supported")]
    TooManySamples { requested: usize, max: usize },

    #[error("Sobol sequence supports at most {supported} dimensions, {requested} requested")]
    TooManyDimensions { requested: usize, supported: usize },
}

/// Umbrella error for the sampling engines (Monte Carlo and Sobol)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Sampling(#[from] SamplingConfigError),
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
