//! Hands a [`LinearModel`] to an external 0/1 solver.

#[cfg(feature = "gurobi")]
pub mod gurobi;

use std::time::Duration;

use derive_more::Display;

use crate::models::linear::LinearModel;

#[cfg(feature = "gurobi")]
pub use gurobi::GurobiSolver;

/// Result of submitting a model
#[derive(Debug, Display, Clone, PartialEq)]
pub enum Outcome {
    /// Proven optimal assignment, one value per variable
    #[display(fmt = "optimal ({})", objective)]
    Optimal { values: Vec<f64>, objective: f64 },
    /// Best assignment found before a limit stopped the search
    #[display(fmt = "feasible ({})", objective)]
    Feasible { values: Vec<f64>, objective: f64 },
    #[display(fmt = "infeasible")]
    Infeasible,
    #[display(fmt = "solver error: {}", _0)]
    SolverError(String),
}

impl Outcome {
    /// Variable values and objective, if the solver found an assignment
    pub fn solution(&self) -> Option<(&[f64], f64)> {
        match self {
            Outcome::Optimal { values, objective } | Outcome::Feasible { values, objective } => {
                Some((values.as_slice(), *objective))
            }
            _ => None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, Outcome::Optimal { .. })
    }
}

/// Parameters passed through to the solver untouched
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub time_limit: Option<Duration>,
    /// Whether the solver may write its own log output
    pub verbose: bool,
    pub threads: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            time_limit: None,
            verbose: false,
            threads: Some(1),
        }
    }
}

pub trait Solver {
    /// Solves `model`, optionally starting from `warm_start` (one value per variable).
    /// Blocks until the solver returns.
    fn submit(&mut self, model: &LinearModel, warm_start: Option<&[f64]>) -> Outcome;
}

impl<S: Solver + ?Sized> Solver for &mut S {
    fn submit(&mut self, model: &LinearModel, warm_start: Option<&[f64]>) -> Outcome {
        (**self).submit(model, warm_start)
    }
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn submit(&mut self, model: &LinearModel, warm_start: Option<&[f64]>) -> Outcome {
        (**self).submit(model, warm_start)
    }
}
