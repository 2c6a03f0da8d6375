use derive_more::{Display, From};

use crate::problem::SizeClass;

/// A table referenced while building the problem or pricing a candidate is missing an entry,
/// or holds a value that cannot be used.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum ConfigurationError {
    #[display(fmt = "unknown carrier `{}`", _0)]
    UnknownCarrier(String),
    #[display(fmt = "unknown port `{}`", _0)]
    UnknownPort(String),
    #[display(fmt = "unknown destination `{}`", _0)]
    UnknownDestination(String),
    #[display(fmt = "unknown commodity `{}`", _0)]
    UnknownCommodity(String),
    #[display(fmt = "unknown size class `{}`", _0)]
    UnknownClass(String),
    #[display(fmt = "carrier `{}` is declared more than once", _0)]
    DuplicateCarrier(String),
    #[display(fmt = "no charter rate for carrier `{}` of class {}", carrier, class)]
    MissingCharterRate { carrier: String, class: SizeClass },
    #[display(fmt = "port `{}` has no fee for class {}", port, class)]
    MissingPortFee { port: String, class: SizeClass },
    #[display(fmt = "no fuel rate for class {}", _0)]
    MissingFuelRate(SizeClass),
    #[display(fmt = "no demand for destination `{}`", _0)]
    MissingDemand(String),
    #[display(fmt = "no commodity is shipped with class {}", _0)]
    NoCommodityForClass(SizeClass),
    #[display(fmt = "no commodity is loaded at port `{}`", _0)]
    NoCommodityForPort(String),
    #[display(fmt = "{} must be non-negative, got {}", what, value)]
    NegativeValue { what: String, value: f64 },
    /// Charging each carrier for the whole demand would buy the cargo once per carrier on a route
    #[display(fmt = "the demand cargo basis cannot be combined with aggregate demand")]
    DemandBasisWithAggregate,
}

impl std::error::Error for ConfigurationError {}

#[derive(Debug, Display, From)]
pub enum Error {
    /// Bad input tables. Raised before anything reaches the solver.
    #[display(fmt = "configuration error: {}", _0)]
    Configuration(ConfigurationError),
    /// The exact model admits no assignment satisfying all constraints.
    #[display(fmt = "the assignment model is infeasible")]
    #[from(ignore)]
    Infeasible,
    /// The solver failed. The message is passed on verbatim.
    #[display(fmt = "solver error: {}", _0)]
    #[from(ignore)]
    Solver(String),
    #[display(fmt = "i/o error: {}", _0)]
    Io(std::io::Error),
    #[display(fmt = "malformed tariff file: {}", _0)]
    Json(serde_json::Error),
    #[display(fmt = "cannot serialize output: {}", _0)]
    #[from(ignore)]
    Output(serde_json::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Configuration(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Json(e) | Error::Output(e) => Some(e),
            Error::Infeasible | Error::Solver(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
