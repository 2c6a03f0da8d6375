use log::info;
use typed_index_collections::TiVec;

use crate::{
    cost::{CargoBasis, CostModel},
    error::ConfigurationError,
    problem::{CarrierIndex, Cost, Problem, Quantity, RouteIndex},
};

/// A carrier that may serve a route, with the derived cost of doing so.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub carrier: CarrierIndex,
    pub route: RouteIndex,
    pub cost: Cost,
    pub capacity: Quantity,
}

/// Every (carrier, route) pair where the carrier departs from the route's origin, priced once.
///
/// Pricing happens up front so that a bad tariff table is reported before any allocation
/// or solver run starts.
#[derive(Debug, Clone)]
pub struct Candidates {
    basis: CargoBasis,
    /// Candidates per route, in carrier declaration order
    by_route: TiVec<RouteIndex, Vec<Candidate>>,
}

impl Candidates {
    pub fn new(problem: &Problem, basis: CargoBasis) -> Result<Candidates, ConfigurationError> {
        let model = CostModel::new(problem);
        let mut by_route: TiVec<RouteIndex, Vec<Candidate>> = TiVec::new();

        for (route, r) in problem.routes().iter_enumerated() {
            let mut candidates = Vec::new();
            for carrier in problem.carriers_from(r.origin) {
                let capacity = problem
                    .registry()
                    .capacity(problem.carrier(carrier).name())?;
                candidates.push(Candidate {
                    carrier,
                    route,
                    cost: model.candidate_cost(carrier, route, basis)?,
                    capacity,
                });
            }
            by_route.push(candidates);
        }

        let candidates = Candidates { basis, by_route };
        info!(
            "Priced {} candidates for {} routes ({:?} basis)",
            candidates.len(),
            candidates.by_route.len(),
            basis
        );
        Ok(candidates)
    }

    pub fn basis(&self) -> CargoBasis {
        self.basis
    }

    /// Candidates for a route, in carrier declaration order
    pub fn for_route(&self, route: RouteIndex) -> &[Candidate] {
        &self.by_route[route]
    }

    pub fn get(&self, carrier: CarrierIndex, route: RouteIndex) -> Option<&Candidate> {
        self.by_route
            .get(route)?
            .iter()
            .find(|c| c.carrier == carrier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> + '_ {
        self.by_route.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_route.iter().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
