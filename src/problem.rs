use std::{collections::HashMap, str::FromStr};

use derive_more::{Deref, Display, From, Into};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use typed_index_collections::TiVec;

use crate::{
    error::ConfigurationError,
    registry::CapacityRegistry,
    tariffs::{DemandTable, Tariffs},
};

/// The type used for cargo quantity
pub type Quantity = f64;
/// The type used for cost
pub type Cost = f64;
/// Transit time in days
pub type Days = f64;
/// Transit time in hours
pub type Hours = f64;

#[derive(Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash)]
pub struct CarrierIndex(usize);

#[derive(Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash)]
pub struct PortIndex(usize);

#[derive(Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash)]
pub struct DestinationIndex(usize);

#[derive(Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash)]
pub struct RouteIndex(usize);

/// Tanker size classes. The class decides which fee and fuel tables apply to a carrier.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    /// General purpose
    GPT,
    /// Medium range
    MRT,
    /// Long range 1
    LR1,
    /// Long range 2
    LR2,
}

impl SizeClass {
    pub const ALL: [SizeClass; 4] = [SizeClass::GPT, SizeClass::MRT, SizeClass::LR1, SizeClass::LR2];
}

impl FromStr for SizeClass {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GPT" => Ok(SizeClass::GPT),
            "MRT" => Ok(SizeClass::MRT),
            "LR1" => Ok(SizeClass::LR1),
            "LR2" => Ok(SizeClass::LR2),
            other => Err(ConfigurationError::UnknownClass(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Carrier {
    /// Unique name of the carrier
    name: String,
    /// The size class the carrier belongs to
    class: SizeClass,
    /// Maximum quantity the carrier delivers in one trip
    capacity: Quantity,
    /// Flat cost of hiring the carrier
    charter_rate: Cost,
    /// The port the carrier departs from
    home_port: PortIndex,
}

impl Carrier {
    /// Unique name of the carrier
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    /// The size class the carrier belongs to
    pub fn class(&self) -> SizeClass {
        self.class
    }
    /// Maximum quantity the carrier delivers in one trip
    pub fn capacity(&self) -> Quantity {
        self.capacity
    }
    /// Flat cost of hiring the carrier
    pub fn charter_rate(&self) -> Cost {
        self.charter_rate
    }
    /// The port the carrier departs from
    pub fn home_port(&self) -> PortIndex {
        self.home_port
    }
}

#[derive(Debug, Clone)]
pub struct Port {
    name: String,
    /// Handling fee per size class
    fees: HashMap<SizeClass, Cost>,
    /// Transit time to each destination, `None` where the tables have no entry
    transit_days: TiVec<DestinationIndex, Option<Days>>,
}

impl Port {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The handling fee charged to carriers of the given class
    pub fn fee(&self, class: SizeClass) -> Option<Cost> {
        self.fees.get(&class).copied()
    }

    /// Transit time in days to the given destination, if the tables list one
    pub fn transit_days(&self, destination: DestinationIndex) -> Option<Days> {
        self.transit_days.get(destination).copied().flatten()
    }
}

#[derive(Debug, Clone)]
pub struct Commodity {
    name: String,
    unit_price: Cost,
    port: PortIndex,
    class: SizeClass,
}

impl Commodity {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    /// Acquisition cost per unit of cargo
    pub fn unit_price(&self) -> Cost {
        self.unit_price
    }
    /// The port the commodity is loaded at
    pub fn port(&self) -> PortIndex {
        self.port
    }
    /// The size class used to ship the commodity
    pub fn class(&self) -> SizeClass {
        self.class
    }
}

/// A shipping lane from a loading port to a destination, with the quantity that must be delivered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub origin: PortIndex,
    pub destination: DestinationIndex,
    pub demand: Quantity,
}

#[derive(Debug, Clone)]
pub struct Problem {
    /// The fleet, in declaration order
    carriers: TiVec<CarrierIndex, Carrier>,
    /// Loading ports, in declaration order
    ports: TiVec<PortIndex, Port>,
    /// Destination names, in declaration order
    destinations: TiVec<DestinationIndex, String>,
    commodities: Vec<Commodity>,
    /// Fuel cost per hour at sea
    fuel_rates: HashMap<SizeClass, Cost>,
    /// Routes ordered with the origin port as the outer and the destination as the inner loop
    routes: TiVec<RouteIndex, Route>,
    registry: CapacityRegistry,
}

fn non_negative(what: impl Into<String>, value: f64) -> Result<f64, ConfigurationError> {
    if value < 0.0 || value.is_nan() {
        return Err(ConfigurationError::NegativeValue {
            what: what.into(),
            value,
        });
    }
    Ok(value)
}

impl Problem {
    /// Resolves the raw tables into typed records.
    ///
    /// Structural references (class names, port and destination names, charter rates and demand) are
    /// checked here. Port fees and fuel rates are checked when a candidate is priced.
    pub fn new(tariffs: &Tariffs) -> Result<Problem, ConfigurationError> {
        let destinations: TiVec<DestinationIndex, String> =
            tariffs.destinations.iter().cloned().collect();

        let mut ports: TiVec<PortIndex, Port> = TiVec::new();
        for entry in &tariffs.ports {
            let mut fees = HashMap::new();
            for (class, fee) in &entry.fees {
                let what = format!("fee of port `{}` for class {}", entry.name, class);
                fees.insert(class.parse::<SizeClass>()?, non_negative(what, *fee)?);
            }

            let mut transit_days: TiVec<DestinationIndex, Option<Days>> =
                vec![None; destinations.len()].into();
            for (destination, days) in &entry.transit_days {
                let d = Self::find_destination(&destinations, destination)?;
                let what = format!("transit time from `{}` to `{}`", entry.name, destination);
                transit_days[d] = Some(non_negative(what, *days)?);
            }

            ports.push(Port {
                name: entry.name.clone(),
                fees,
                transit_days,
            });
        }

        let mut fuel_rates = HashMap::new();
        for (class, rate) in &tariffs.fuel_costs {
            let what = format!("fuel cost of class {}", class);
            fuel_rates.insert(class.parse::<SizeClass>()?, non_negative(what, *rate)?);
        }

        let mut commodities = Vec::with_capacity(tariffs.commodities.len());
        for entry in &tariffs.commodities {
            let what = format!("unit price of `{}`", entry.name);
            commodities.push(Commodity {
                name: entry.name.clone(),
                unit_price: non_negative(what, entry.unit_price)?,
                port: Self::find_port(&ports, &entry.port)?,
                class: entry.class.parse::<SizeClass>()?,
            });
        }

        let mut carriers: TiVec<CarrierIndex, Carrier> = TiVec::new();
        for entry in &tariffs.carriers {
            if carriers.iter().any(|c| c.name == entry.name) {
                return Err(ConfigurationError::DuplicateCarrier(entry.name.clone()));
            }
            let class = entry.class.parse::<SizeClass>()?;
            let charter_rate = tariffs
                .charter_rates
                .get(&entry.class)
                .and_then(|rates| rates.get(&entry.name))
                .copied()
                .ok_or_else(|| ConfigurationError::MissingCharterRate {
                    carrier: entry.name.clone(),
                    class,
                })?;
            let home_port = commodities
                .iter()
                .find(|c| c.class == class)
                .map(|c| c.port)
                .ok_or(ConfigurationError::NoCommodityForClass(class))?;

            carriers.push(Carrier {
                name: entry.name.clone(),
                class,
                capacity: non_negative(format!("capacity of `{}`", entry.name), entry.capacity)?,
                charter_rate: non_negative(format!("charter rate of `{}`", entry.name), charter_rate)?,
                home_port,
            });
        }

        let mut routes: TiVec<RouteIndex, Route> = TiVec::new();
        for (origin, _) in ports.iter_enumerated() {
            for (destination, name) in destinations.iter_enumerated() {
                let demand = match &tariffs.demand {
                    DemandTable::PerDestination(table) => *table
                        .get(name)
                        .ok_or_else(|| ConfigurationError::MissingDemand(name.clone()))?,
                    DemandTable::EqualSplit(total) => *total / destinations.len() as f64,
                };
                routes.push(Route {
                    origin,
                    destination,
                    demand: non_negative(format!("demand of `{}`", name), demand)?,
                });
            }
        }

        let registry = CapacityRegistry::new(
            carriers
                .iter()
                .map(|c| (c.class, c.name.clone(), c.capacity)),
        );

        debug!(
            "Problem with {} carriers, {} ports, {} destinations and {} routes",
            carriers.len(),
            ports.len(),
            destinations.len(),
            routes.len()
        );
        trace!("routes: {:?}", routes);

        Ok(Problem {
            carriers,
            ports,
            destinations,
            commodities,
            fuel_rates,
            routes,
            registry,
        })
    }

    fn find_destination(
        destinations: &TiVec<DestinationIndex, String>,
        name: &str,
    ) -> Result<DestinationIndex, ConfigurationError> {
        destinations
            .iter()
            .position(|d| d == name)
            .map(DestinationIndex)
            .ok_or_else(|| ConfigurationError::UnknownDestination(name.to_string()))
    }

    fn find_port(
        ports: &TiVec<PortIndex, Port>,
        name: &str,
    ) -> Result<PortIndex, ConfigurationError> {
        ports
            .iter()
            .position(|p| p.name == name)
            .map(PortIndex)
            .ok_or_else(|| ConfigurationError::UnknownPort(name.to_string()))
    }
}

impl Problem {
    /// The fleet, in declaration order
    pub fn carriers(&self) -> &TiVec<CarrierIndex, Carrier> {
        &self.carriers
    }

    pub fn carrier(&self, carrier: CarrierIndex) -> &Carrier {
        &self.carriers[carrier]
    }

    /// Loading ports, in declaration order
    pub fn ports(&self) -> &TiVec<PortIndex, Port> {
        &self.ports
    }

    pub fn port(&self, port: PortIndex) -> &Port {
        &self.ports[port]
    }

    /// Destination names, in declaration order
    pub fn destinations(&self) -> &TiVec<DestinationIndex, String> {
        &self.destinations
    }

    pub fn destination(&self, destination: DestinationIndex) -> &str {
        self.destinations[destination].as_str()
    }

    pub fn commodities(&self) -> &[Commodity] {
        &self.commodities
    }

    /// The commodity loaded at the given port
    pub fn commodity_at(&self, port: PortIndex) -> Option<&Commodity> {
        self.commodities.iter().find(|c| c.port == port)
    }

    /// Fuel cost per hour at sea for the given class
    pub fn fuel_rate(&self, class: SizeClass) -> Option<Cost> {
        self.fuel_rates.get(&class).copied()
    }

    /// All routes, origin port outer and destination inner
    pub fn routes(&self) -> &TiVec<RouteIndex, Route> {
        &self.routes
    }

    pub fn route(&self, route: RouteIndex) -> &Route {
        &self.routes[route]
    }

    pub fn registry(&self) -> &CapacityRegistry {
        &self.registry
    }

    /// Carriers departing from the given port, in declaration order
    pub fn carriers_from(&self, port: PortIndex) -> impl Iterator<Item = CarrierIndex> + '_ {
        self.carriers
            .iter_enumerated()
            .filter(move |(_, c)| c.home_port == port)
            .map(|(i, _)| i)
    }

    pub fn carrier_by_name(&self, name: &str) -> Result<CarrierIndex, ConfigurationError> {
        self.carriers
            .iter()
            .position(|c| c.name == name)
            .map(CarrierIndex)
            .ok_or_else(|| ConfigurationError::UnknownCarrier(name.to_string()))
    }

    pub fn port_by_name(&self, name: &str) -> Result<PortIndex, ConfigurationError> {
        Self::find_port(&self.ports, name)
    }

    pub fn destination_by_name(&self, name: &str) -> Result<DestinationIndex, ConfigurationError> {
        Self::find_destination(&self.destinations, name)
    }

    /// The route from `origin` to `destination`
    pub fn route_between(&self, origin: PortIndex, destination: DestinationIndex) -> Option<RouteIndex> {
        self.routes
            .iter()
            .position(|r| r.origin == origin && r.destination == destination)
            .map(RouteIndex)
    }

    /// Human readable `origin -> destination` label of a route
    pub fn route_label(&self, route: RouteIndex) -> String {
        let r = &self.routes[route];
        format!("{} -> {}", self.port(r.origin).name(), self.destination(r.destination))
    }
}
