//! Assignment of a tanker fleet to shipping routes.
//!
//! Tariff tables are resolved into a [`Problem`](problem::Problem), every eligible (carrier, route) pair is
//! priced once into [`Candidates`](candidates::Candidates), and the routes are then allocated either
//! greedily or through an exact 0/1 model handed to an external [`Solver`](solver::Solver).

pub mod candidates;
pub mod cost;
pub mod error;
pub mod exact;
pub mod greedy;
pub mod models;
pub mod problem;
pub mod registry;
pub mod report;
pub mod solver;
pub mod tariffs;

pub use error::{ConfigurationError, Error, Result};
