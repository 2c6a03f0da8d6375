pub mod assignment;
pub mod linear;

pub use assignment::{AssignmentModel, CarrierUsage, DemandMode, ModelConfig};
pub use linear::{Constraint, LinearModel, Relation, Sense, VarIndex, VariableIndex};
