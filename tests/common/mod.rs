#![allow(dead_code)]

use tanker_alloc::{
    models::LinearModel,
    solver::{Outcome, Solver},
};

pub use tanker_alloc::tariffs::fixtures::single_port;

/// Tries every 0/1 assignment. Only meant for models with a handful of variables.
#[derive(Debug, Default)]
pub struct Exhaustive {
    /// The warm start of the last submitted model
    pub last_start: Option<Vec<f64>>,
}

impl Solver for Exhaustive {
    fn submit(&mut self, model: &LinearModel, warm_start: Option<&[f64]>) -> Outcome {
        self.last_start = warm_start.map(|s| s.to_vec());

        let n = model.num_vars();
        if n > 20 {
            return Outcome::SolverError(format!("{} variables is too many to enumerate", n));
        }

        let mut best: Option<(Vec<f64>, f64)> = None;
        for mask in 0u32..(1 << n) {
            let values: Vec<f64> = (0..n).map(|i| ((mask >> i) & 1) as f64).collect();
            if !model.is_feasible(&values, 1e-9) {
                continue;
            }
            let objective = model.objective_value(&values);
            if best
                .as_ref()
                .map_or(true, |(_, b)| model.sense.improves(objective, *b))
            {
                best = Some((values, objective));
            }
        }

        match best {
            Some((values, objective)) => Outcome::Optimal { values, objective },
            None => Outcome::Infeasible,
        }
    }
}
