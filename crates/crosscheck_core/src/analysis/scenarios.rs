//! Quality × schedule policy comparison.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::evaluate::evaluate;
use crate::model::{ModelOutputs, ParameterSet, QualityGrade, ScheduleGrade};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCell {
    pub quality: QualityGrade,
    pub schedule: ScheduleGrade,
    pub outputs: ModelOutputs,
}

/// The four grade combinations evaluated on the same continuous inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioGrid {
    /// Row-major: quality varies slowest
    pub cells: Vec<ScenarioCell>,
}

impl ScenarioGrid {
    pub fn cell(&self, quality: QualityGrade, schedule: ScheduleGrade) -> Option<&ScenarioCell> {
        self.cells
            .iter()
            .find(|c| c.quality == quality && c.schedule == schedule)
    }

    /// Combination with the lowest total efficiency (cost per success)
    pub fn cheapest(&self) -> Option<&ScenarioCell> {
        self.cells.iter().min_by(|a, b| {
            a.outputs
                .total_efficiency
                .total_cmp(&b.outputs.total_efficiency)
        })
    }
}

pub fn scenario_grid(params: &ParameterSet) -> Result<ScenarioGrid, DomainError> {
    let mut cells = Vec::with_capacity(4);
    for quality in QualityGrade::ALL {
        for schedule in ScheduleGrade::ALL {
            let outputs = evaluate(&params.with_grades(quality, schedule))?;
            cells.push(ScenarioCell {
                quality,
                schedule,
                outputs,
            });
        }
    }
    Ok(ScenarioGrid { cells })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_covers_all_combinations() {
        let grid = scenario_grid(&ParameterSet::default()).unwrap();
        assert_eq!(grid.cells.len(), 4);
        let std_on = grid
            .cell(QualityGrade::Standard, ScheduleGrade::OnTime)
            .unwrap();
        assert!((std_on.outputs.success_rate - 0.9444).abs() < 1e-12);

        let low_late = grid.cell(QualityGrade::Low, ScheduleGrade::Late).unwrap();
        assert!((low_late.outputs.total_efficiency - 43.70728).abs() < 1e-4);
        assert_eq!(
            grid.cheapest().map(|c| (c.quality, c.schedule)),
            Some((QualityGrade::Low, ScheduleGrade::Late))
        );
    }

    #[test]
    fn single_degradation_is_symmetric() {
        let grid = scenario_grid(&ParameterSet::default()).unwrap();
        let low_on = grid.cell(QualityGrade::Low, ScheduleGrade::OnTime).unwrap();
        let std_late = grid
            .cell(QualityGrade::Standard, ScheduleGrade::Late)
            .unwrap();
        assert!((low_on.outputs.total_efficiency - std_late.outputs.total_efficiency).abs() < 1e-12);
    }
}
