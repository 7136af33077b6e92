//! Shared domain models.

use serde::{Deserialize, Serialize};

/// Undirected city-pair record with a known road distance.
///
/// A route is valid for lookup in either direction; city names follow
/// the `"City, StateCode"` convention of the built-in dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// First endpoint of the route.
    pub origin: String,
    /// Second endpoint of the route.
    pub destination: String,
    /// Road distance between the endpoints in kilometres.
    pub distance_km: f64,
}

/// Per-mode emission figure compared against the car baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// Transport mode identifier (e.g. `car`, `bus`).
    pub mode: String,
    /// Emitted mass of CO₂ in kilograms, rounded to 2 decimals.
    pub emission_kg: f64,
    /// Emission as a percentage of the car baseline. `None` when the
    /// baseline mode is missing from the factor table or the ratio is
    /// undefined (zero baseline with non-zero emission).
    pub percentage_vs_car: Option<f64>,
}

/// Saved mass and relative reduction against a baseline emission.
///
/// `saved_kg` is negative when the chosen mode emits more than the
/// baseline; callers must not clamp it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsResult {
    /// Baseline emission minus the chosen mode's emission (kg).
    pub saved_kg: f64,
    /// Relative reduction, only defined for a positive baseline.
    pub percentage: Option<f64>,
}

/// Estimated price range for the carbon credits offsetting a trip.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CreditPriceEstimate {
    /// Lower bound in BRL.
    pub min: f64,
    /// Upper bound in BRL.
    pub max: f64,
    /// Midpoint of the range in BRL.
    pub average: f64,
}
