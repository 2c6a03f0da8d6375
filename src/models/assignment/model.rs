use itertools::iproduct;
use log::{debug, info};

use super::sets_and_parameters::{Parameters, Sets};
use super::{CarrierUsage, DemandMode, ModelConfig};
use crate::greedy::Allocation;
use crate::models::linear::{Constraint, LinearModel, Relation, Sense, VarIndex};
use crate::problem::{CarrierIndex, RouteIndex};

pub struct AssignmentModel {}

#[allow(non_snake_case)]
impl AssignmentModel {
    /// Builds the carrier-to-route assignment model.
    ///
    /// The model is built even if some route can never be served; the solver reports the infeasibility.
    pub fn build(sets: &Sets, parameters: &Parameters, config: &ModelConfig) -> LinearModel {
        info!(
            "Building assignment model ({:?}, {:?})",
            config.demand, config.usage
        );

        let mut model = LinearModel::new("carrier_assignment", Sense::Minimize);

        //*************CREATE VARIABLES*************//
        // 1 if carrier v serves route r, 0 otherwise
        for (r, v) in iproduct!(&sets.R, &sets.V) {
            if !sets.Vr[*r].contains(v) {
                continue;
            }
            model.add_binary(
                format!("x_{}_{}", v, r),
                *v,
                *r,
                parameters.C[&(*v, *r)],
            );
        }

        // ******************** ADD CONSTRAINTS ********************
        // each carrier serves at most (or exactly) one route
        for v in &sets.V {
            let vars: Vec<VarIndex> = sets
                .R
                .iter()
                .filter_map(|r| model.index.get(*v, *r))
                .collect();
            let relation = match config.usage {
                CarrierUsage::AtMostOnce => Relation::Le,
                CarrierUsage::ExactlyOnce => Relation::Eq,
            };
            model.add_constraint(Constraint {
                name: format!("single_use_{}", v),
                coeffs: vec![1.0; vars.len()],
                vars,
                relation,
                rhs: 1.0,
            });
        }

        // each route receives enough capacity
        for r in &sets.R {
            let vars: Vec<VarIndex> = sets.Vr[*r]
                .iter()
                .filter_map(|v| model.index.get(*v, *r))
                .collect();
            let constraint = match config.demand {
                DemandMode::SingleCarrier => Constraint {
                    name: format!("demand_{}", r),
                    coeffs: vec![1.0; vars.len()],
                    vars,
                    relation: Relation::Eq,
                    rhs: 1.0,
                },
                DemandMode::Aggregate => Constraint {
                    name: format!("demand_{}", r),
                    coeffs: sets.Vr[*r].iter().map(|v| parameters.Q[*v]).collect(),
                    vars,
                    relation: Relation::Ge,
                    rhs: parameters.D[*r],
                },
            };
            model.add_constraint(constraint);
        }

        info!(
            "Successfully built assignment model with {} variables and {} constraints",
            model.num_vars(),
            model.constraints.len()
        );
        model
    }

    /// A 0/1 start vector for `model` with the carriers chosen by `allocation` set to 1.
    /// Chosen pairs without a variable in the model are skipped.
    pub fn warm_start(model: &LinearModel, allocation: &Allocation) -> Vec<f64> {
        let mut start = vec![0.0; model.num_vars()];
        for candidate in allocation.assignments() {
            match model.index.get(candidate.carrier, candidate.route) {
                Some(var) => start[*var] = 1.0,
                None => debug!(
                    "carrier {} on route {} has no variable, left out of the warm start",
                    candidate.carrier, candidate.route
                ),
            }
        }
        start
    }

    /// The (carrier, route) pairs whose variable is set in `values`
    pub fn selected(model: &LinearModel, values: &[f64], threshold: f64) -> Vec<(CarrierIndex, RouteIndex)> {
        model
            .index
            .iter()
            .filter(|(var, _)| values.get(**var).map_or(false, |x| *x > threshold))
            .map(|(_, key)| key)
            .collect()
    }
}
