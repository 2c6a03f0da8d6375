use std::collections::HashMap;

use derive_more::Display;

use crate::{
    error::ConfigurationError,
    problem::{Quantity, SizeClass},
};

/// Lookup of a carrier that the registry does not know about.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display(fmt = "carrier `{}` not found in the capacity registry", _0)]
pub struct NotFound(pub String);

impl std::error::Error for NotFound {}

impl From<NotFound> for ConfigurationError {
    fn from(err: NotFound) -> Self {
        ConfigurationError::UnknownCarrier(err.0)
    }
}

/// Capacity of every carrier, organized per size class and then per carrier name.
///
/// Lookups of unknown carriers fail instead of falling back to a default capacity.
#[derive(Debug, Clone, Default)]
pub struct CapacityRegistry {
    classes: HashMap<SizeClass, HashMap<String, Quantity>>,
}

impl CapacityRegistry {
    pub fn new<I>(entries: I) -> CapacityRegistry
    where
        I: IntoIterator<Item = (SizeClass, String, Quantity)>,
    {
        let mut classes: HashMap<SizeClass, HashMap<String, Quantity>> = HashMap::new();
        for (class, name, capacity) in entries {
            classes.entry(class).or_default().insert(name, capacity);
        }
        CapacityRegistry { classes }
    }

    /// The maximum quantity the named carrier delivers in one trip
    pub fn capacity(&self, carrier: &str) -> Result<Quantity, NotFound> {
        self.classes
            .values()
            .find_map(|carriers| carriers.get(carrier).copied())
            .ok_or_else(|| NotFound(carrier.to_string()))
    }

    /// The size class of the named carrier
    pub fn class_of(&self, carrier: &str) -> Result<SizeClass, NotFound> {
        self.classes
            .iter()
            .find(|(_, carriers)| carriers.contains_key(carrier))
            .map(|(class, _)| *class)
            .ok_or_else(|| NotFound(carrier.to_string()))
    }

    /// Capacity of a carrier looked up within a single class
    pub fn capacity_in(&self, class: SizeClass, carrier: &str) -> Result<Quantity, NotFound> {
        self.classes
            .get(&class)
            .and_then(|carriers| carriers.get(carrier).copied())
            .ok_or_else(|| NotFound(carrier.to_string()))
    }

    /// Combined capacity of every carrier in the class. Zero for a class without carriers.
    pub fn total_capacity(&self, class: SizeClass) -> Quantity {
        self.classes
            .get(&class)
            .map(|carriers| carriers.values().sum())
            .unwrap_or(0.0)
    }

    /// Names of the carriers in the class, sorted by name
    pub fn carriers_in(&self, class: SizeClass) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .classes
            .get(&class)
            .map(|carriers| carriers.keys().map(|k| k.as_str()).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.classes.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CapacityRegistry {
        CapacityRegistry::new(vec![
            (SizeClass::GPT, "Gudrun".to_string(), 84500.0),
            (SizeClass::GPT, "Rose".to_string(), 101399.0),
            (SizeClass::LR2, "Venus".to_string(), 1352000.0),
        ])
    }

    #[test]
    fn lookups() {
        let registry = registry();
        assert_eq!(registry.capacity("Rose"), Ok(101399.0));
        assert_eq!(registry.class_of("Venus"), Ok(SizeClass::LR2));
        assert_eq!(registry.capacity_in(SizeClass::GPT, "Gudrun"), Ok(84500.0));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn unknown_carrier_is_not_found() {
        let registry = registry();
        assert_eq!(
            registry.capacity("Titanic"),
            Err(NotFound("Titanic".to_string()))
        );
        assert!(registry.class_of("Titanic").is_err());
        // known carrier, wrong class
        assert!(registry.capacity_in(SizeClass::LR2, "Gudrun").is_err());
    }

    #[test]
    fn not_found_becomes_configuration_error() {
        let err: ConfigurationError = NotFound("Titanic".to_string()).into();
        assert_eq!(err, ConfigurationError::UnknownCarrier("Titanic".to_string()));
    }

    #[test]
    fn class_totals() {
        let registry = registry();
        assert_eq!(registry.total_capacity(SizeClass::GPT), 185899.0);
        assert_eq!(registry.total_capacity(SizeClass::MRT), 0.0);
        assert_eq!(registry.carriers_in(SizeClass::GPT), vec!["Gudrun", "Rose"]);
    }

    #[test]
    fn reference_capacities_are_non_negative() {
        let problem =
            crate::problem::Problem::new(&crate::tariffs::Tariffs::reference()).unwrap();
        for carrier in problem.carriers().iter() {
            let capacity = problem.registry().capacity(carrier.name()).unwrap();
            assert!(capacity >= 0.0);
            assert_eq!(capacity, carrier.capacity());
        }
    }
}
