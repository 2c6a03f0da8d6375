use std::collections::HashMap;

use log::trace;
use typed_index_collections::TiVec;

use super::{DemandMode, ModelConfig};
use crate::{
    candidates::Candidates,
    problem::{CarrierIndex, Problem, RouteIndex},
};

/// Sets for the assignment model
#[derive(Debug)]
#[allow(non_snake_case)]
pub struct Sets {
    /// Set of carriers
    pub V: Vec<CarrierIndex>,
    /// Set of routes
    pub R: Vec<RouteIndex>,
    /// The carriers that may serve each route, in declaration order
    pub Vr: TiVec<RouteIndex, Vec<CarrierIndex>>,
}

/// Parameters for the assignment model
#[allow(non_snake_case)]
pub struct Parameters {
    /// Cost of carrier v serving route r
    pub C: HashMap<(CarrierIndex, RouteIndex), f64>,
    /// Capacity of carrier v
    pub Q: TiVec<CarrierIndex, f64>,
    /// Quantity required on route r
    pub D: TiVec<RouteIndex, f64>,
}

#[allow(non_snake_case)]
impl Sets {
    /// Every carrier departing from a route's origin may serve it. With a single carrier per route,
    /// only the carriers that can carry the full demand on their own are kept.
    pub fn new(problem: &Problem, candidates: &Candidates, config: &ModelConfig) -> Sets {
        let V = (0..problem.carriers().len()).map(CarrierIndex::from).collect();
        let R: Vec<RouteIndex> = (0..problem.routes().len()).map(RouteIndex::from).collect();

        let Vr = R
            .iter()
            .map(|&r| {
                let demand = problem.route(r).demand;
                let carriers: Vec<CarrierIndex> = candidates
                    .for_route(r)
                    .iter()
                    .filter(|c| match config.demand {
                        DemandMode::SingleCarrier => c.capacity >= demand,
                        DemandMode::Aggregate => true,
                    })
                    .map(|c| c.carrier)
                    .collect();
                trace!("route {}: {} eligible carriers", r, carriers.len());
                carriers
            })
            .collect();

        Sets { V, R, Vr }
    }
}

#[allow(non_snake_case)]
impl Parameters {
    pub fn new(problem: &Problem, candidates: &Candidates) -> Parameters {
        let C = candidates
            .iter()
            .map(|c| ((c.carrier, c.route), c.cost))
            .collect();
        let Q = problem.carriers().iter().map(|c| c.capacity()).collect();
        let D = problem.routes().iter().map(|r| r.demand).collect();

        Parameters { C, Q, D }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cost::CargoBasis, models::assignment::CarrierUsage, tariffs::fixtures};

    #[test]
    fn single_carrier_keeps_sufficient_carriers_only() {
        let tariffs = fixtures::single_port(
            &[("A", 100.0, 1.0), ("B", 50.0, 5.0)],
            &[("D1", 50.0), ("D2", 90.0)],
        );
        let problem = Problem::new(&tariffs).unwrap();
        let candidates = Candidates::new(&problem, CargoBasis::Freight).unwrap();

        let single = ModelConfig {
            demand: DemandMode::SingleCarrier,
            usage: CarrierUsage::AtMostOnce,
        };
        let sets = Sets::new(&problem, &candidates, &single);
        assert_eq!(sets.Vr[RouteIndex::from(0)].len(), 2);
        assert_eq!(sets.Vr[RouteIndex::from(1)], vec![CarrierIndex::from(0)]);

        let aggregate = ModelConfig {
            demand: DemandMode::Aggregate,
            ..single
        };
        let sets = Sets::new(&problem, &candidates, &aggregate);
        assert_eq!(sets.Vr[RouteIndex::from(1)].len(), 2);

        let parameters = Parameters::new(&problem, &candidates);
        assert_eq!(parameters.C[&(CarrierIndex::from(1), RouteIndex::from(0))], 5.0);
        assert_eq!(parameters.Q[CarrierIndex::from(1)], 50.0);
        assert_eq!(parameters.D[RouteIndex::from(1)], 90.0);
    }
}
