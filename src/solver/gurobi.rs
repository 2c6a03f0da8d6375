use grb::prelude::*;
use grb::{ModelSense, Status, VarType};
use log::{debug, info, warn};

use super::{Outcome, Solver, SolverConfig};
use crate::models::linear::{LinearModel, Relation, Sense};

/// Solves assignment models with Gurobi.
pub struct GurobiSolver {
    config: SolverConfig,
}

impl GurobiSolver {
    pub fn new(config: SolverConfig) -> Self {
        GurobiSolver { config }
    }

    fn build(&self, linear: &LinearModel) -> grb::Result<(Model, Vec<Var>)> {
        let mut model = Model::new(&linear.name)?;
        if !self.config.verbose {
            model.set_param(param::OutputFlag, 0)?;
        }
        if let Some(threads) = self.config.threads {
            model.set_param(param::Threads, threads as i32)?;
        }
        if let Some(limit) = self.config.time_limit {
            model.set_param(param::TimeLimit, limit.as_secs_f64())?;
        }

        let mut vars = Vec::with_capacity(linear.num_vars());
        for variable in linear.variables.iter() {
            vars.push(model.add_var(
                &variable.name,
                VarType::Binary,
                0.0,
                0.0,
                1.0,
                std::iter::empty(),
            )?);
        }
        model.update()?;

        for constraint in &linear.constraints {
            let lhs = constraint
                .vars
                .iter()
                .zip(&constraint.coeffs)
                .map(|(v, c)| *c * vars[**v])
                .grb_sum();
            let rhs = constraint.rhs;
            let constr = match constraint.relation {
                Relation::Le => c!(lhs <= rhs),
                Relation::Eq => c!(lhs == rhs),
                Relation::Ge => c!(lhs >= rhs),
            };
            model.add_constr(&constraint.name, constr)?;
        }

        let objective = linear
            .objective
            .iter()
            .map(|(v, c)| *c * vars[**v])
            .grb_sum();
        let sense = match linear.sense {
            Sense::Minimize => ModelSense::Minimize,
            Sense::Maximize => ModelSense::Maximize,
        };
        model.set_objective(objective, sense)?;
        model.update()?;

        Ok((model, vars))
    }

    fn solve(&self, linear: &LinearModel, warm_start: Option<&[f64]>) -> grb::Result<Outcome> {
        let (mut model, vars) = self.build(linear)?;

        if let Some(start) = warm_start {
            if start.len() == vars.len() {
                for (var, value) in vars.iter().zip(start) {
                    model.set_obj_attr(attr::Start, var, *value)?;
                }
                debug!("Warm start set for {} variables", vars.len());
            } else {
                warn!(
                    "Warm start has {} values for {} variables, ignored",
                    start.len(),
                    vars.len()
                );
            }
        }

        info!("Optimizing {}", linear.name);
        model.optimize()?;

        let status = model.status()?;
        let solutions = model.get_attr(attr::SolCount)?;
        info!("Gurobi finished with status {:?} ({} solutions)", status, solutions);

        let values = |model: &Model| -> grb::Result<Vec<f64>> {
            vars.iter()
                .map(|var| model.get_obj_attr(attr::X, var))
                .collect()
        };

        Ok(match status {
            Status::Optimal => Outcome::Optimal {
                values: values(&model)?,
                objective: model.get_attr(attr::ObjVal)?,
            },
            Status::Infeasible | Status::InfOrUnbd => Outcome::Infeasible,
            _ if solutions > 0 => Outcome::Feasible {
                values: values(&model)?,
                objective: model.get_attr(attr::ObjVal)?,
            },
            other => Outcome::SolverError(format!("stopped with status {:?} and no solution", other)),
        })
    }
}

impl Default for GurobiSolver {
    fn default() -> Self {
        GurobiSolver::new(SolverConfig::default())
    }
}

impl Solver for GurobiSolver {
    fn submit(&mut self, model: &LinearModel, warm_start: Option<&[f64]>) -> Outcome {
        match self.solve(model, warm_start) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::SolverError(e.to_string()),
        }
    }
}
