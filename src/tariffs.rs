//! Raw tariff tables as they are read from disk.
//!
//! Everything here is keyed by name. The tables are resolved into typed records by
//! [`Problem::new`](crate::problem::Problem::new), which is where missing or inconsistent entries are reported.
//! Ordered lists (carriers, ports, destinations) keep their declaration order, since the greedy heuristic
//! depends on it.

use std::{collections::HashMap, io::Read, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    problem::{Cost, Days, Quantity},
};

/// The reference fleet: 24 crude tankers in four size classes, four loading ports and four refineries.
const REFERENCE: &str = include_str!("../data/reference.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierEntry {
    pub name: String,
    /// Name of the size class
    pub class: String,
    /// Maximum quantity delivered in one trip
    pub capacity: Quantity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortEntry {
    pub name: String,
    /// Handling fee per size class
    pub fees: HashMap<String, Cost>,
    /// Transit time in days per destination
    #[serde(default)]
    pub transit_days: HashMap<String, Days>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommodityEntry {
    pub name: String,
    /// Acquisition cost per unit of cargo
    pub unit_price: Cost,
    /// The port the commodity is loaded at
    pub port: String,
    /// The size class used to ship the commodity
    pub class: String,
}

/// Where the required quantity of each route comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DemandTable {
    /// The quantity each destination requires from every origin port
    PerDestination(HashMap<String, Quantity>),
    /// A total that is split equally across the declared destinations
    EqualSplit(Quantity),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tariffs {
    /// The fleet, in declaration order
    pub carriers: Vec<CarrierEntry>,
    /// Charter rate keyed by (class, carrier)
    pub charter_rates: HashMap<String, HashMap<String, Cost>>,
    /// Loading ports, in declaration order
    pub ports: Vec<PortEntry>,
    /// Fuel cost per hour at sea keyed by class
    pub fuel_costs: HashMap<String, Cost>,
    pub commodities: Vec<CommodityEntry>,
    /// Destinations, in declaration order
    pub destinations: Vec<String>,
    pub demand: DemandTable,
}

impl Tariffs {
    /// The embedded reference data set.
    pub fn reference() -> Tariffs {
        serde_json::from_str(REFERENCE).expect("embedded reference tariffs are valid")
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Tariffs> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Tariffs> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Replaces the demand table with an equal split of `total` across the destinations.
    pub fn with_equal_split(mut self, total: Quantity) -> Tariffs {
        self.demand = DemandTable::EqualSplit(total);
        self
    }
}

/// Small hand-built fleets, shared by the unit and integration tests.
#[doc(hidden)]
pub mod fixtures {
    use super::*;

    /// One port `P` loading commodity `X` with GPT carriers only. Fees, fuel and prices are zero,
    /// so a candidate costs exactly its charter rate. Every destination is one day away.
    pub fn single_port(carriers: &[(&str, Quantity, Cost)], demand: &[(&str, Quantity)]) -> Tariffs {
        let destinations: Vec<String> = demand.iter().map(|(d, _)| d.to_string()).collect();
        Tariffs {
            carriers: carriers
                .iter()
                .map(|(name, capacity, _)| CarrierEntry {
                    name: name.to_string(),
                    class: "GPT".to_string(),
                    capacity: *capacity,
                })
                .collect(),
            charter_rates: HashMap::from([(
                "GPT".to_string(),
                carriers
                    .iter()
                    .map(|(name, _, rate)| (name.to_string(), *rate))
                    .collect(),
            )]),
            ports: vec![PortEntry {
                name: "P".to_string(),
                fees: HashMap::from([("GPT".to_string(), 0.0)]),
                transit_days: destinations.iter().map(|d| (d.clone(), 1.0)).collect(),
            }],
            fuel_costs: HashMap::from([("GPT".to_string(), 0.0)]),
            commodities: vec![CommodityEntry {
                name: "X".to_string(),
                unit_price: 0.0,
                port: "P".to_string(),
                class: "GPT".to_string(),
            }],
            destinations,
            demand: DemandTable::PerDestination(
                demand.iter().map(|(d, q)| (d.to_string(), *q)).collect(),
            ),
        }
    }
}
