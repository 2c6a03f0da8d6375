//! Greedy pre-allocation of carriers to routes.
//!
//! Routes are visited in a fixed order. Each route takes the cheapest carrier that is still free,
//! departs from the route's origin and can carry the full demand on its own. There is no
//! backtracking: a route visited early may take the carrier a later route needed, in which case the
//! later route falls back to the next cheapest carrier or goes unserved. The result is feasible but
//! not necessarily optimal, and serves as a baseline for (and warm start of) the exact model.

use float_ord::FloatOrd;
use log::{debug, info, warn};
use typed_index_collections::TiVec;

use crate::{
    candidates::{Candidate, Candidates},
    cost::{CargoBasis, CostModel},
    error::ConfigurationError,
    problem::{CarrierIndex, Cost, Problem, Quantity, RouteIndex},
};

/// The carriers committed so far, and the route each one serves.
///
/// Each allocation step takes the commitments by value and hands back the updated state.
#[derive(Debug, Clone, PartialEq)]
pub struct Commitments {
    committed: TiVec<CarrierIndex, Option<RouteIndex>>,
}

impl Commitments {
    /// No carrier committed
    pub fn new(carriers: usize) -> Commitments {
        Commitments {
            committed: vec![None; carriers].into(),
        }
    }

    pub fn is_committed(&self, carrier: CarrierIndex) -> bool {
        self.route_of(carrier).is_some()
    }

    /// The route the carrier is committed to, if any
    pub fn route_of(&self, carrier: CarrierIndex) -> Option<RouteIndex> {
        self.committed.get(carrier).copied().flatten()
    }

    /// The number of committed carriers
    pub fn count(&self) -> usize {
        self.committed.iter().filter(|r| r.is_some()).count()
    }

    fn commit(mut self, carrier: CarrierIndex, route: RouteIndex) -> Commitments {
        debug_assert!(!self.is_committed(carrier));
        self.committed[carrier] = Some(route);
        self
    }
}

/// Allocates a single route.
///
/// Picks the candidate with the strictly lowest cost among the carriers that are not yet committed and
/// whose capacity covers `demand`. Ties go to the carrier declared first. Returns the updated
/// commitments along with the chosen candidate, or `None` if no carrier is eligible.
pub fn allocate_route(
    candidates: &[Candidate],
    demand: Quantity,
    commitments: Commitments,
) -> (Commitments, Option<Candidate>) {
    let chosen = candidates
        .iter()
        .filter(|c| !commitments.is_committed(c.carrier) && c.capacity >= demand)
        .min_by_key(|c| FloatOrd(c.cost))
        .copied();

    match chosen {
        Some(c) => (commitments.commit(c.carrier, c.route), Some(c)),
        None => (commitments, None),
    }
}

/// The outcome of a greedy run: at most one carrier per route.
///
/// Routes without a carrier are unserved. That is a partial allocation, which is reported rather than
/// treated as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    basis: CargoBasis,
    routes: TiVec<RouteIndex, Option<Candidate>>,
    commitments: Commitments,
}

impl Allocation {
    /// The pricing basis the allocation was made with
    pub fn basis(&self) -> CargoBasis {
        self.basis
    }

    /// The candidate serving the route, if any
    pub fn assignment(&self, route: RouteIndex) -> Option<&Candidate> {
        self.routes.get(route).and_then(|c| c.as_ref())
    }

    /// All chosen candidates, in route order
    pub fn assignments(&self) -> impl Iterator<Item = &Candidate> + '_ {
        self.routes.iter().flatten()
    }

    /// Routes left without a carrier
    pub fn unserved(&self) -> Vec<RouteIndex> {
        self.routes
            .iter_enumerated()
            .filter(|(_, c)| c.is_none())
            .map(|(r, _)| r)
            .collect()
    }

    pub fn is_partial(&self) -> bool {
        self.routes.iter().any(|c| c.is_none())
    }

    pub fn commitments(&self) -> &Commitments {
        &self.commitments
    }

    /// Sum of the cost of every chosen candidate
    pub fn total_cost(&self) -> Cost {
        self.assignments().map(|c| c.cost).sum()
    }

    /// Recomputes the total cost of the chosen carriers through the cost model.
    pub fn repriced_cost(&self, model: &CostModel) -> Result<Cost, ConfigurationError> {
        self.assignments()
            .map(|c| model.candidate_cost(c.carrier, c.route, self.basis))
            .sum()
    }
}

pub struct GreedyAllocator<'a> {
    problem: &'a Problem,
    candidates: &'a Candidates,
}

impl<'a> GreedyAllocator<'a> {
    pub fn new(problem: &'a Problem, candidates: &'a Candidates) -> Self {
        GreedyAllocator {
            problem,
            candidates,
        }
    }

    /// Allocates the routes in declaration order: origin port outer, destination inner.
    pub fn run(&self) -> Allocation {
        let order: Vec<RouteIndex> = (0..self.problem.routes().len()).map(RouteIndex::from).collect();
        self.run_in_order(&order)
    }

    /// Allocates the routes in the given order. Routes missing from `order` stay unserved, repeated
    /// routes are only allocated the first time and routes outside the problem are skipped.
    pub fn run_in_order(&self, order: &[RouteIndex]) -> Allocation {
        info!("Greedy allocation of {} routes", order.len());

        let mut routes: TiVec<RouteIndex, Option<Candidate>> =
            vec![None; self.problem.routes().len()].into();
        let mut visited: TiVec<RouteIndex, bool> = vec![false; routes.len()].into();
        let mut commitments = Commitments::new(self.problem.carriers().len());

        for &route in order {
            match visited.get_mut(route) {
                None => {
                    warn!("Route {} is not part of the problem, skipping", route);
                    continue;
                }
                Some(true) => {
                    debug!("Route {} listed twice, skipping", self.problem.route_label(route));
                    continue;
                }
                Some(seen) => *seen = true,
            }

            let demand = self.problem.route(route).demand;
            let (next, chosen) =
                allocate_route(self.candidates.for_route(route), demand, commitments);
            commitments = next;

            match &chosen {
                Some(c) => debug!(
                    "{}: {} (capacity {}, cost {})",
                    self.problem.route_label(route),
                    self.problem.carrier(c.carrier).name(),
                    c.capacity,
                    c.cost
                ),
                None => warn!(
                    "{}: no free carrier can deliver {}, route left unserved",
                    self.problem.route_label(route),
                    demand
                ),
            }
            routes[route] = chosen;
        }

        let allocation = Allocation {
            basis: self.candidates.basis(),
            routes,
            commitments,
        };
        let unserved = allocation.unserved().len();
        if unserved > 0 {
            warn!("Partial allocation: {} route(s) unserved", unserved);
        }
        info!(
            "Greedy allocation committed {} carriers at total cost {}",
            allocation.commitments().count(),
            allocation.total_cost()
        );
        allocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tariffs::{fixtures, Tariffs};
    use std::collections::HashSet;

    fn reference(basis: CargoBasis) -> (Problem, Candidates) {
        let problem = Problem::new(&Tariffs::reference()).unwrap();
        let candidates = Candidates::new(&problem, basis).unwrap();
        (problem, candidates)
    }

    fn chosen_names(problem: &Problem, allocation: &Allocation) -> Vec<Option<String>> {
        (0..problem.routes().len())
            .map(RouteIndex::from)
            .map(|r| {
                allocation
                    .assignment(r)
                    .map(|c| problem.carrier(c.carrier).name().to_string())
            })
            .collect()
    }

    #[test]
    fn reference_allocation() {
        let (problem, candidates) = reference(CargoBasis::Freight);
        let allocation = GreedyAllocator::new(&problem, &candidates).run();

        let expected = [
            "Gudrun", "Estrid", "Valborg", "Guam", // Ceyhan
            "Venture", "Ismine", "Pretty World", "York Gulls", // Houma
            "PTI Volans", "Galway", "Trinity", "Glasgow", // Puerto Miranda
            "Garonne", "Torm Rhone", "Thorpe", "Venus", // Melkoya
        ];
        let expected: Vec<Option<String>> = expected.iter().map(|n| Some(n.to_string())).collect();
        assert_eq!(chosen_names(&problem, &allocation), expected);
        assert!(!allocation.is_partial());
        assert_eq!(allocation.commitments().count(), 16);
    }

    #[test]
    fn gudrun_is_cheapest_for_ceyhan_greece() {
        let (problem, candidates) = reference(CargoBasis::Demand);
        let allocation = GreedyAllocator::new(&problem, &candidates).run();
        let first = allocation.assignment(RouteIndex::from(0)).unwrap();
        assert_eq!(problem.carrier(first.carrier).name(), "Gudrun");
        assert_eq!(first.cost, 4517000.0);

        let cheapest = candidates
            .for_route(RouteIndex::from(0))
            .iter()
            .filter(|c| c.capacity >= 75000.0)
            .map(|c| c.cost)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(first.cost, cheapest);
    }

    #[test]
    fn carriers_are_committed_once() {
        for basis in [CargoBasis::Freight, CargoBasis::Capacity, CargoBasis::Demand] {
            let (problem, candidates) = reference(basis);
            let allocation = GreedyAllocator::new(&problem, &candidates).run();
            let mut seen = HashSet::new();
            for c in allocation.assignments() {
                assert!(seen.insert(c.carrier), "carrier committed twice");
                assert_eq!(allocation.commitments().route_of(c.carrier), Some(c.route));
            }
        }
    }

    #[test]
    fn deterministic() {
        let (problem, candidates) = reference(CargoBasis::Capacity);
        let allocator = GreedyAllocator::new(&problem, &candidates);
        assert_eq!(allocator.run(), allocator.run());
    }

    #[test]
    fn total_matches_cost_model() {
        for basis in [CargoBasis::Freight, CargoBasis::Capacity, CargoBasis::Demand] {
            let (problem, candidates) = reference(basis);
            let allocation = GreedyAllocator::new(&problem, &candidates).run();
            let model = CostModel::new(&problem);
            assert_eq!(
                allocation.repriced_cost(&model).unwrap(),
                allocation.total_cost()
            );
        }
    }

    #[test]
    fn equal_split_allocation() {
        let tariffs = Tariffs::reference().with_equal_split(550000.0);
        let problem = Problem::new(&tariffs).unwrap();
        let candidates = Candidates::new(&problem, CargoBasis::Freight).unwrap();
        let allocation = GreedyAllocator::new(&problem, &candidates).run();
        let names = chosen_names(&problem, &allocation);
        // 137 500 per route rules out Gudrun and Rose
        assert_eq!(
            &names[..4],
            &[
                Some("Estrid".to_string()),
                Some("Chance".to_string()),
                Some("Valborg".to_string()),
                Some("Guam".to_string())
            ]
        );
        assert!(!allocation.is_partial());
    }

    #[test]
    fn ties_go_to_the_first_declared_carrier() {
        let tariffs = fixtures::single_port(
            &[("A", 100.0, 7.0), ("B", 100.0, 5.0), ("C", 100.0, 5.0)],
            &[("D", 10.0)],
        );
        let problem = Problem::new(&tariffs).unwrap();
        let candidates = Candidates::new(&problem, CargoBasis::Freight).unwrap();
        let allocation = GreedyAllocator::new(&problem, &candidates).run();
        let chosen = allocation.assignment(RouteIndex::from(0)).unwrap();
        assert_eq!(problem.carrier(chosen.carrier).name(), "B");
    }

    #[test]
    fn demand_above_every_capacity_is_unserved() {
        let tariffs = fixtures::single_port(
            &[("A", 100.0, 1.0), ("B", 60.0, 2.0)],
            &[("D1", 50.0), ("D2", 500.0)],
        );
        let problem = Problem::new(&tariffs).unwrap();
        let candidates = Candidates::new(&problem, CargoBasis::Freight).unwrap();
        let allocation = GreedyAllocator::new(&problem, &candidates).run();
        assert!(allocation.is_partial());
        assert_eq!(allocation.unserved(), vec![RouteIndex::from(1)]);
        assert_eq!(allocation.total_cost(), 1.0);
    }

    #[test]
    fn route_order_decides_contested_carriers() {
        // A is cheapest everywhere but is the only carrier large enough for D2
        let tariffs = fixtures::single_port(
            &[("A", 100.0, 1.0), ("B", 50.0, 5.0)],
            &[("D1", 50.0), ("D2", 90.0)],
        );
        let problem = Problem::new(&tariffs).unwrap();
        let candidates = Candidates::new(&problem, CargoBasis::Freight).unwrap();
        let allocator = GreedyAllocator::new(&problem, &candidates);

        let declared = allocator.run();
        assert_eq!(declared.commitments().count(), 1);
        assert_eq!(declared.unserved(), vec![RouteIndex::from(1)]);

        let reversed = allocator.run_in_order(&[RouteIndex::from(1), RouteIndex::from(0)]);
        assert_eq!(reversed.commitments().count(), 2);
        assert!(!reversed.is_partial());
        assert_eq!(reversed.total_cost(), 6.0);
    }

    #[test]
    fn routes_missing_from_the_order_stay_unserved() {
        let (problem, candidates) = reference(CargoBasis::Freight);
        let allocator = GreedyAllocator::new(&problem, &candidates);
        let order = [RouteIndex::from(3), RouteIndex::from(3)];
        let allocation = allocator.run_in_order(&order);
        assert_eq!(allocation.commitments().count(), 1);
        assert_eq!(allocation.unserved().len(), 15);
    }

    #[test]
    fn routes_outside_the_problem_are_skipped() {
        let (problem, candidates) = reference(CargoBasis::Freight);
        let allocator = GreedyAllocator::new(&problem, &candidates);
        let order = [RouteIndex::from(16), RouteIndex::from(0), RouteIndex::from(99)];
        let allocation = allocator.run_in_order(&order);
        assert_eq!(allocation.commitments().count(), 1);
        let greece = allocation.assignment(RouteIndex::from(0)).unwrap();
        assert_eq!(problem.carrier(greece.carrier).name(), "Gudrun");
    }

    #[test]
    fn single_step_in_isolation() {
        let (problem, candidates) = reference(CargoBasis::Freight);
        let route = RouteIndex::from(0);
        let commitments = Commitments::new(problem.carriers().len());

        let (commitments, first) = allocate_route(candidates.for_route(route), 75000.0, commitments);
        let first = first.unwrap();
        assert_eq!(problem.carrier(first.carrier).name(), "Gudrun");

        // Same route again: Gudrun is taken, Rose (14 000) is next
        let (commitments, second) =
            allocate_route(candidates.for_route(route), 75000.0, commitments);
        assert_eq!(problem.carrier(second.unwrap().carrier).name(), "Rose");
        assert_eq!(commitments.count(), 2);
    }
}
