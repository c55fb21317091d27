use serde::{Deserialize, Serialize};

/// Derived quantities of one model evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelOutputs {
    /// Probability that all three steps succeed (a1·a2·a3)
    pub a_total: f64,
    /// Checker detection probability after grade adjustment
    pub b_effective: f64,
    /// Overall success rate S
    pub success_rate: f64,
    /// Grade-adjusted task hours T_total
    pub task_time: f64,
    /// Labor cost C including overheads
    pub labor_cost: f64,
    /// Labor cost plus expected loss from failures
    pub loss_adjusted_cost: f64,
    /// E = C / S
    pub efficiency: f64,
    /// E_total = C_loss / S
    pub total_efficiency: f64,
}

impl ModelOutputs {
    pub fn failure_rate(&self) -> f64 {
        1.0 - self.success_rate
    }
}
