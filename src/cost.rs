use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigurationError,
    problem::{
        CarrierIndex, Cost, DestinationIndex, Hours, PortIndex, Problem, Quantity, RouteIndex,
        SizeClass,
    },
};

pub const HOURS_PER_DAY: f64 = 24.0;

/// The quantity the commodity price is charged on when pricing a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CargoBasis {
    /// Charter, port fee and fuel only. No commodity cost.
    Freight,
    /// The carrier's full capacity is bought and shipped
    Capacity,
    /// Exactly the route's demand is bought and shipped
    Demand,
}

impl Default for CargoBasis {
    fn default() -> Self {
        CargoBasis::Freight
    }
}

/// Derives the monetary cost of sending a carrier along a route.
///
/// `charter_rate + port_fee[port][class] + fuel_rate[class] * transit_hours + unit_price * quantity`
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'p> {
    problem: &'p Problem,
}

impl<'p> CostModel<'p> {
    pub fn new(problem: &'p Problem) -> Self {
        CostModel { problem }
    }

    pub fn problem(&self) -> &'p Problem {
        self.problem
    }

    /// Hours at sea from `port` to `destination`.
    /// A destination missing from the port's transit table counts as zero transit time.
    pub fn transit_hours(&self, port: PortIndex, destination: DestinationIndex) -> Hours {
        match self.problem.port(port).transit_days(destination) {
            Some(days) => days * HOURS_PER_DAY,
            None => {
                warn!(
                    "No transit time from {} to {}, fuel cost counted as zero",
                    self.problem.port(port).name(),
                    self.problem.destination(destination)
                );
                0.0
            }
        }
    }

    pub fn port_fee(&self, port: PortIndex, class: SizeClass) -> Result<Cost, ConfigurationError> {
        let port = self.problem.port(port);
        port.fee(class)
            .ok_or_else(|| ConfigurationError::MissingPortFee {
                port: port.name().to_string(),
                class,
            })
    }

    pub fn fuel_cost(
        &self,
        class: SizeClass,
        port: PortIndex,
        destination: DestinationIndex,
    ) -> Result<Cost, ConfigurationError> {
        let rate = self
            .problem
            .fuel_rate(class)
            .ok_or(ConfigurationError::MissingFuelRate(class))?;
        Ok(rate * self.transit_hours(port, destination))
    }

    /// Total cost of `carrier` leaving `port` for `destination` with `quantity` units bought at `unit_price`.
    pub fn cost(
        &self,
        carrier: CarrierIndex,
        port: PortIndex,
        destination: DestinationIndex,
        unit_price: Cost,
        quantity: Quantity,
    ) -> Result<Cost, ConfigurationError> {
        let c = self.problem.carrier(carrier);
        let fee = self.port_fee(port, c.class())?;
        let fuel = self.fuel_cost(c.class(), port, destination)?;
        let commodity = unit_price * quantity;
        trace!(
            "cost of {} from {} to {}: rate {} + fee {} + fuel {} + commodity {}",
            c.name(),
            self.problem.port(port).name(),
            self.problem.destination(destination),
            c.charter_rate(),
            fee,
            fuel,
            commodity
        );
        Ok(c.charter_rate() + fee + fuel + commodity)
    }

    /// Unit price of the cargo moved on `route`. Zero under the freight basis.
    pub fn unit_price(&self, route: RouteIndex, basis: CargoBasis) -> Result<Cost, ConfigurationError> {
        if basis == CargoBasis::Freight {
            return Ok(0.0);
        }
        let origin = self.problem.route(route).origin;
        self.problem
            .commodity_at(origin)
            .map(|c| c.unit_price())
            .ok_or_else(|| {
                ConfigurationError::NoCommodityForPort(self.problem.port(origin).name().to_string())
            })
    }

    /// The quantity the commodity price is charged on
    pub fn quantity(
        &self,
        carrier: CarrierIndex,
        route: RouteIndex,
        basis: CargoBasis,
    ) -> Result<Quantity, ConfigurationError> {
        match basis {
            CargoBasis::Freight => Ok(0.0),
            CargoBasis::Capacity => {
                let name = self.problem.carrier(carrier).name();
                Ok(self.problem.registry().capacity(name)?)
            }
            CargoBasis::Demand => Ok(self.problem.route(route).demand),
        }
    }

    /// Cost of `carrier` serving `route`, departing from the route's origin.
    pub fn candidate_cost(
        &self,
        carrier: CarrierIndex,
        route: RouteIndex,
        basis: CargoBasis,
    ) -> Result<Cost, ConfigurationError> {
        let r = self.problem.route(route);
        let unit_price = self.unit_price(route, basis)?;
        let quantity = self.quantity(carrier, route, basis)?;
        self.cost(carrier, r.origin, r.destination, unit_price, quantity)
    }
}
