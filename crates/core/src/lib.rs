#![warn(clippy::all, missing_docs)]

//! Core domain logic for the ecotrip carbon calculator.
//!
//! This crate hosts the configuration tables, the static route
//! dataset with bidirectional distance lookup, and the pure
//! emission/savings/credit arithmetic consumed by the terminal UI
//! and any future frontends.

pub mod calculator;
pub mod collation;
pub mod config;
pub mod models;
pub mod routes;

pub use calculator::Calculator;
pub use config::{AppConfig, CarbonCreditConfig, EmissionFactorTable, ModeFactor};
pub use models::{ComparisonEntry, CreditPriceEstimate, Route, SavingsResult};
pub use routes::RouteTable;
