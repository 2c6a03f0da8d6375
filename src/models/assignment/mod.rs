//! Exact carrier-to-route assignment model.
//!
//! One binary variable per (carrier, route) pair where the carrier departs from the route's origin,
//! minimising the total candidate cost subject to
//!
//! * single use: every carrier serves at most one route, or exactly one when assignment is mandatory;
//! * demand: every route is served by one carrier that can carry its demand alone, or by a set of
//!   carriers whose combined capacity covers it.
//!
//! The two demand styles are alternatives; a model uses one of them for all routes.

pub mod model;
pub mod sets_and_parameters;

use serde::{Deserialize, Serialize};

pub use model::AssignmentModel;
pub use sets_and_parameters::{Parameters, Sets};

use crate::{
    candidates::Candidates, cost::CargoBasis, error::ConfigurationError,
    models::linear::LinearModel, problem::Problem,
};

/// How a route's demand is covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandMode {
    /// Exactly one carrier per route, whose own capacity covers the demand
    SingleCarrier,
    /// Any number of carriers whose capacities add up to the demand
    Aggregate,
}

impl Default for DemandMode {
    fn default() -> Self {
        DemandMode::SingleCarrier
    }
}

/// How often a carrier may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierUsage {
    AtMostOnce,
    /// Every carrier must be assigned to a route
    ExactlyOnce,
}

impl Default for CarrierUsage {
    fn default() -> Self {
        CarrierUsage::AtMostOnce
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub demand: DemandMode,
    pub usage: CarrierUsage,
}

impl ModelConfig {
    /// Rejects candidates priced on a basis the model cannot sum per route.
    ///
    /// Under the demand basis every candidate already carries the full route demand's commodity cost,
    /// so a route served by several carriers would be charged for it once per carrier.
    pub fn check(&self, basis: CargoBasis) -> Result<(), ConfigurationError> {
        match (self.demand, basis) {
            (DemandMode::Aggregate, CargoBasis::Demand) => {
                Err(ConfigurationError::DemandBasisWithAggregate)
            }
            _ => Ok(()),
        }
    }
}

/// Builds the assignment model for `problem` from the priced candidates.
pub fn build(problem: &Problem, candidates: &Candidates, config: &ModelConfig) -> LinearModel {
    let sets = Sets::new(problem, candidates, config);
    let parameters = Parameters::new(problem, candidates);
    AssignmentModel::build(&sets, &parameters, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cost::CargoBasis,
        greedy::GreedyAllocator,
        models::linear::Relation,
        problem::{CarrierIndex, RouteIndex},
        tariffs::{fixtures, Tariffs},
    };

    fn reference() -> (Problem, Candidates) {
        let problem = Problem::new(&Tariffs::reference()).unwrap();
        let candidates = Candidates::new(&problem, CargoBasis::Demand).unwrap();
        (problem, candidates)
    }

    #[test]
    fn one_constraint_per_carrier_and_route() {
        let (problem, candidates) = reference();
        for demand in [DemandMode::SingleCarrier, DemandMode::Aggregate] {
            for usage in [CarrierUsage::AtMostOnce, CarrierUsage::ExactlyOnce] {
                let model = build(&problem, &candidates, &ModelConfig { demand, usage });
                assert_eq!(model.constraints_named("single_use").count(), 24);
                assert_eq!(model.constraints_named("demand").count(), 16);
                assert_eq!(model.constraints.len(), 24 + 16);
            }
        }
    }

    #[test]
    fn aggregate_has_a_variable_per_candidate() {
        let (problem, candidates) = reference();
        let config = ModelConfig {
            demand: DemandMode::Aggregate,
            usage: CarrierUsage::AtMostOnce,
        };
        let model = build(&problem, &candidates, &config);
        assert_eq!(model.num_vars(), candidates.len());
        for (var, (carrier, route)) in model.index.iter() {
            let candidate = candidates.get(carrier, route).unwrap();
            assert!(model.objective.contains(&(var, candidate.cost)));
        }

        let demand = model.constraints_named("demand_0").next().unwrap();
        assert_eq!(demand.relation, Relation::Ge);
        assert_eq!(demand.rhs, 75000.0);
        // 8 GPT carriers depart from Ceyhan
        assert_eq!(demand.vars.len(), 8);
    }

    #[test]
    fn single_carrier_excludes_small_carriers() {
        let tariffs = fixtures::single_port(
            &[("A", 100.0, 1.0), ("B", 50.0, 5.0)],
            &[("D1", 50.0), ("D2", 90.0)],
        );
        let problem = Problem::new(&tariffs).unwrap();
        let candidates = Candidates::new(&problem, CargoBasis::Freight).unwrap();
        let model = build(&problem, &candidates, &ModelConfig::default());

        assert_eq!(model.num_vars(), 3);
        assert!(model
            .index
            .get(CarrierIndex::from(1), RouteIndex::from(1))
            .is_none());

        let demand = model.constraints_named("demand_1").next().unwrap();
        assert_eq!(demand.relation, Relation::Eq);
        assert_eq!(demand.rhs, 1.0);
        assert_eq!(demand.vars.len(), 1);
    }

    #[test]
    fn unservable_route_still_builds() {
        let tariffs = fixtures::single_port(&[("A", 10.0, 1.0)], &[("D", 500.0)]);
        let problem = Problem::new(&tariffs).unwrap();
        let candidates = Candidates::new(&problem, CargoBasis::Freight).unwrap();

        let model = build(&problem, &candidates, &ModelConfig::default());
        let demand = model.constraints_named("demand").next().unwrap();
        assert!(demand.vars.is_empty());
        assert!(!model.is_feasible(&[], 1e-6));

        let usage = model.constraints_named("single_use").next().unwrap();
        assert!(usage.vars.is_empty());
    }

    #[test]
    fn demand_basis_only_with_a_single_carrier() {
        let aggregate = ModelConfig {
            demand: DemandMode::Aggregate,
            usage: CarrierUsage::AtMostOnce,
        };
        assert_eq!(
            aggregate.check(CargoBasis::Demand),
            Err(ConfigurationError::DemandBasisWithAggregate)
        );
        assert_eq!(aggregate.check(CargoBasis::Capacity), Ok(()));
        assert_eq!(aggregate.check(CargoBasis::Freight), Ok(()));
        assert_eq!(ModelConfig::default().check(CargoBasis::Demand), Ok(()));
    }

    #[test]
    fn exactly_once_uses_equalities() {
        let (problem, candidates) = reference();
        let config = ModelConfig {
            demand: DemandMode::SingleCarrier,
            usage: CarrierUsage::ExactlyOnce,
        };
        let model = build(&problem, &candidates, &config);
        assert!(model
            .constraints_named("single_use")
            .all(|c| c.relation == Relation::Eq && c.rhs == 1.0));
    }

    #[test]
    fn greedy_allocation_is_a_feasible_start() {
        let (problem, candidates) = reference();
        let allocation = GreedyAllocator::new(&problem, &candidates).run();
        let model = build(&problem, &candidates, &ModelConfig::default());

        let start = AssignmentModel::warm_start(&model, &allocation);
        assert_eq!(start.iter().filter(|x| **x == 1.0).count(), 16);
        assert!(model.is_feasible(&start, 1e-6));
        assert_eq!(model.objective_value(&start), allocation.total_cost());

        let selected = AssignmentModel::selected(&model, &start, 0.5);
        assert_eq!(selected.len(), 16);
        for (carrier, route) in selected {
            assert_eq!(allocation.assignment(route).unwrap().carrier, carrier);
        }
    }
}
