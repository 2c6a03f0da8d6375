//! Builds the exact assignment model, submits it and decodes the result.

use std::collections::HashMap;

use log::{info, warn};
use typed_index_collections::TiVec;

use crate::{
    candidates::{Candidate, Candidates},
    error::{Error, Result},
    greedy::Allocation,
    models::{assignment, AssignmentModel, LinearModel, ModelConfig},
    problem::{CarrierIndex, Cost, Problem, RouteIndex},
    solver::{Outcome, Solver},
};

/// Values above this count as a selected binary variable
pub const SELECTION_THRESHOLD: f64 = 0.5;

/// Carriers chosen per route by the exact model. No carrier serves more than one route.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentSolution {
    routes: TiVec<RouteIndex, Vec<Candidate>>,
    objective: Cost,
    optimal: bool,
}

impl AssignmentSolution {
    /// The carriers serving the route
    pub fn carriers(&self, route: RouteIndex) -> &[Candidate] {
        &self.routes[route]
    }

    pub fn assignments(&self) -> impl Iterator<Item = &Candidate> + '_ {
        self.routes.iter().flatten()
    }

    /// The route the carrier serves, if any
    pub fn route_of(&self, carrier: CarrierIndex) -> Option<RouteIndex> {
        self.assignments()
            .find(|c| c.carrier == carrier)
            .map(|c| c.route)
    }

    pub fn unserved(&self) -> Vec<RouteIndex> {
        self.routes
            .iter_enumerated()
            .filter(|(_, c)| c.is_empty())
            .map(|(r, _)| r)
            .collect()
    }

    /// The objective value reported by the solver
    pub fn objective(&self) -> Cost {
        self.objective
    }

    /// Sum of the cost of every chosen candidate
    pub fn total_cost(&self) -> Cost {
        self.assignments().map(|c| c.cost).sum()
    }

    /// Whether the solver proved the solution optimal
    pub fn is_optimal(&self) -> bool {
        self.optimal
    }
}

/// Reads the selected variables back into candidates, rejecting values that use a carrier twice.
fn decode(
    parameters: &assignment::Parameters,
    model: &LinearModel,
    values: &[f64],
) -> Result<TiVec<RouteIndex, Vec<Candidate>>> {
    let mut chosen: TiVec<RouteIndex, Vec<Candidate>> = vec![Vec::new(); parameters.D.len()].into();
    let mut used: HashMap<CarrierIndex, RouteIndex> = HashMap::new();

    for (carrier, route) in AssignmentModel::selected(model, values, SELECTION_THRESHOLD) {
        if let Some(previous) = used.insert(carrier, route) {
            return Err(Error::Solver(format!(
                "carrier {} selected for routes {} and {}",
                carrier, previous, route
            )));
        }
        chosen[route].push(Candidate {
            carrier,
            route,
            cost: parameters.C[&(carrier, route)],
            capacity: parameters.Q[carrier],
        });
    }
    Ok(chosen)
}

/// Builds the exact model from the priced candidates, solves it and decodes the assignment.
///
/// When `warm_start` is given, its carriers are handed to the solver as the initial solution.
/// Candidates priced on the demand basis are rejected under aggregate demand.
pub fn solve_exact<S: Solver>(
    problem: &Problem,
    candidates: &Candidates,
    config: &ModelConfig,
    solver: &mut S,
    warm_start: Option<&Allocation>,
) -> Result<AssignmentSolution> {
    config.check(candidates.basis())?;

    let sets = assignment::Sets::new(problem, candidates, config);
    let parameters = assignment::Parameters::new(problem, candidates);
    let model = AssignmentModel::build(&sets, &parameters, config);

    let start = warm_start.map(|allocation| AssignmentModel::warm_start(&model, allocation));
    let outcome = solver.submit(&model, start.as_deref());
    info!("Exact model: {}", outcome);

    let optimal = outcome.is_optimal();
    let (values, objective) = match &outcome {
        Outcome::Optimal { values, objective } | Outcome::Feasible { values, objective } => {
            (values, *objective)
        }
        Outcome::Infeasible => return Err(Error::Infeasible),
        Outcome::SolverError(message) => return Err(Error::Solver(message.clone())),
    };
    if values.len() != model.num_vars() {
        return Err(Error::Solver(format!(
            "expected {} variable values, got {}",
            model.num_vars(),
            values.len()
        )));
    }
    if !optimal {
        warn!("Exact model stopped before optimality, using best solution found");
    }

    let routes = decode(&parameters, &model, values)?;
    Ok(AssignmentSolution {
        routes,
        objective,
        optimal,
    })
}
