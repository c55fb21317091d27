mod outputs;
mod parameter;
mod params;

pub use outputs::ModelOutputs;
pub use parameter::{Parameter, ParameterKind};
pub use params::{GradeFactors, ParameterSet, QualityGrade, ScheduleGrade};
