//! A solver-agnostic 0/1 linear model.
//!
//! Variables are keyed by (carrier, route) through [`VariableIndex`]. Names are only generated for solver
//! logs; decoding a solution always goes through the index.

use std::collections::HashMap;
use std::fmt;

use derive_more::{Deref, Display, From, Into};
use typed_index_collections::TiVec;

use crate::problem::{CarrierIndex, RouteIndex};

#[derive(Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash)]
pub struct VarIndex(usize);

/// The (carrier, route) pair a binary variable decides on
pub type VarKey = (CarrierIndex, RouteIndex);

/// Bijection between (carrier, route) keys and variable positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableIndex {
    keys: TiVec<VarIndex, VarKey>,
    positions: HashMap<VarKey, VarIndex>,
}

impl VariableIndex {
    pub fn new() -> VariableIndex {
        VariableIndex::default()
    }

    /// Adds a key, returning its position. Adding a key twice returns the existing position.
    pub fn insert(&mut self, carrier: CarrierIndex, route: RouteIndex) -> VarIndex {
        let key = (carrier, route);
        if let Some(&idx) = self.positions.get(&key) {
            return idx;
        }
        let idx = VarIndex::from(self.keys.len());
        self.keys.push(key);
        self.positions.insert(key, idx);
        idx
    }

    pub fn get(&self, carrier: CarrierIndex, route: RouteIndex) -> Option<VarIndex> {
        self.positions.get(&(carrier, route)).copied()
    }

    pub fn key(&self, var: VarIndex) -> Option<VarKey> {
        self.keys.get(var).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarIndex, VarKey)> + '_ {
        self.keys.iter_enumerated().map(|(i, k)| (i, *k))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    /// Whether objective value `a` is strictly better than `b`
    pub fn improves(&self, a: f64, b: f64) -> bool {
        match self {
            Sense::Minimize => a < b,
            Sense::Maximize => a > b,
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    #[display(fmt = "<=")]
    Le,
    #[display(fmt = "=")]
    Eq,
    #[display(fmt = ">=")]
    Ge,
}

impl Relation {
    /// Whether `lhs relation rhs` holds, within `tolerance`
    pub fn holds(&self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Relation::Le => lhs <= rhs + tolerance,
            Relation::Eq => (lhs - rhs).abs() <= tolerance,
            Relation::Ge => lhs + tolerance >= rhs,
        }
    }
}

/// A binary decision variable
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub key: VarKey,
}

/// `Σ coeffs[i] * x[vars[i]]  relation  rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub vars: Vec<VarIndex>,
    pub coeffs: Vec<f64>,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    /// Left hand side evaluated at `values`, indexed by variable position
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.vars
            .iter()
            .zip(&self.coeffs)
            .map(|(v, c)| c * values.get(**v).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.relation.holds(self.lhs(values), self.rhs, tolerance)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        if self.vars.is_empty() {
            write!(f, "0")?;
        }
        for (i, (v, c)) in self.vars.iter().zip(&self.coeffs).enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{} x{}", c, v)?;
        }
        write!(f, " {} {}", self.relation, self.rhs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub name: String,
    pub variables: TiVec<VarIndex, Variable>,
    /// (variable, coefficient) pairs of the objective
    pub objective: Vec<(VarIndex, f64)>,
    pub constraints: Vec<Constraint>,
    pub sense: Sense,
    pub index: VariableIndex,
}

impl LinearModel {
    pub fn new(name: impl Into<String>, sense: Sense) -> LinearModel {
        LinearModel {
            name: name.into(),
            variables: TiVec::new(),
            objective: Vec::new(),
            constraints: Vec::new(),
            sense,
            index: VariableIndex::new(),
        }
    }

    /// Adds a binary variable for `(carrier, route)` with the given objective coefficient
    pub fn add_binary(
        &mut self,
        name: String,
        carrier: CarrierIndex,
        route: RouteIndex,
        cost: f64,
    ) -> VarIndex {
        let idx = self.index.insert(carrier, route);
        debug_assert_eq!(*idx, self.variables.len());
        self.variables.push(Variable {
            name,
            key: (carrier, route),
        });
        self.objective.push((idx, cost));
        idx
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// Objective value at `values`
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|(v, c)| c * values.get(**v).copied().unwrap_or(0.0))
            .sum()
    }

    /// Whether `values` satisfies every constraint
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.num_vars()
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied(values, tolerance))
    }

    /// Constraints whose name starts with `prefix`
    pub fn constraints_named<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Constraint> + 'a {
        self.constraints
            .iter()
            .filter(move |c| c.name.starts_with(prefix))
    }
}
