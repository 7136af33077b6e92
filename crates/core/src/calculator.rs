//! Emission, savings, and carbon-credit arithmetic.
//!
//! Every operation is a pure function of its inputs plus the two
//! injected configuration tables. Bad input never raises: unknown
//! modes and undefined ratios come back as `None`.

use crate::{
    config::{CarbonCreditConfig, EmissionFactorTable},
    models::{ComparisonEntry, CreditPriceEstimate, SavingsResult},
};

/// Mode used as the savings/percentage baseline.
pub const BASELINE_MODE: &str = "car";

/// Round to 2 decimals, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Stateless emission calculator over injected configuration tables.
#[derive(Debug, Clone)]
pub struct Calculator {
    factors: EmissionFactorTable,
    carbon_credit: CarbonCreditConfig,
}

impl Calculator {
    /// Build a calculator over the given tables.
    pub fn new(factors: EmissionFactorTable, carbon_credit: CarbonCreditConfig) -> Self {
        Self {
            factors,
            carbon_credit,
        }
    }

    /// The emission factor table this calculator was built with.
    pub fn factors(&self) -> &EmissionFactorTable {
        &self.factors
    }

    /// Emission in kg CO₂ for a distance and mode, rounded to 2
    /// decimals. `None` for a mode absent from the factor table — a
    /// zero-factor mode (bicycle) still yields `Some(0.0)`. Distance
    /// positivity is validated upstream, not here.
    pub fn calculate_emission(&self, distance_km: f64, mode: &str) -> Option<f64> {
        let factor = self.factors.factor(mode)?;
        Some(round2(distance_km * factor))
    }

    /// One [`ComparisonEntry`] per configured mode, sorted ascending
    /// by emission; ties keep factor-table order. The percentage
    /// column compares against the car baseline when "car" is
    /// configured; a zero baseline yields 100% only for modes that
    /// also emit exactly zero.
    pub fn calculate_all_modes(&self, distance_km: f64) -> Vec<ComparisonEntry> {
        let baseline = self.calculate_emission(distance_km, BASELINE_MODE);

        let mut entries: Vec<ComparisonEntry> = self
            .factors
            .entries()
            .iter()
            .map(|entry| {
                let emission = round2(distance_km * entry.factor);
                let percentage_vs_car = match baseline {
                    Some(base) if base != 0.0 => Some(round2(emission / base * 100.0)),
                    Some(_) if emission == 0.0 => Some(100.0),
                    _ => None,
                };
                ComparisonEntry {
                    mode: entry.mode.clone(),
                    emission_kg: emission,
                    percentage_vs_car,
                }
            })
            .collect();

        // sort_by is stable, preserving table order for equal emissions
        entries.sort_by(|a, b| a.emission_kg.total_cmp(&b.emission_kg));
        entries
    }

    /// Saved mass and relative reduction against a baseline emission.
    /// Negative savings (mode emits more than the baseline) pass
    /// through unclamped; the percentage is only defined for a
    /// positive baseline.
    pub fn calculate_savings(&self, emission: f64, baseline: f64) -> SavingsResult {
        let saved = baseline - emission;
        let percentage = if baseline > 0.0 {
            Some(round2(saved / baseline * 100.0))
        } else {
            None
        };
        SavingsResult {
            saved_kg: round2(saved),
            percentage,
        }
    }

    /// Number of carbon credits needed to offset `emission_kg`.
    /// Unrounded; feeds both the credits display and the price
    /// estimate.
    pub fn credits_needed(&self, emission_kg: f64) -> f64 {
        emission_kg / self.carbon_credit.kg_per_credit
    }

    /// Price range in BRL for buying `credits` carbon credits.
    /// Negative credit counts propagate arithmetically; rejecting them
    /// is the caller's decision.
    pub fn estimate_credit_price(&self, credits: f64) -> CreditPriceEstimate {
        let min = credits * self.carbon_credit.price_min_brl;
        let max = credits * self.carbon_credit.price_max_brl;
        CreditPriceEstimate {
            min: round2(min),
            max: round2(max),
            average: round2((min + max) / 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, ModeFactor};

    fn default_calculator() -> Calculator {
        let config = AppConfig::default();
        Calculator::new(config.factors, config.carbon_credit)
    }

    fn credit_config() -> CarbonCreditConfig {
        CarbonCreditConfig {
            kg_per_credit: 1000.0,
            price_min_brl: 50.0,
            price_max_brl: 150.0,
        }
    }

    fn factor(mode: &str, value: f64) -> ModeFactor {
        ModeFactor {
            mode: mode.to_string(),
            factor: value,
            label: None,
            icon: None,
        }
    }

    #[test]
    fn emission_is_distance_times_factor() {
        let calc = default_calculator();
        assert_eq!(calc.calculate_emission(100.0, "car"), Some(12.0));
        assert_eq!(calc.calculate_emission(100.0, "bus"), Some(8.9));
    }

    #[test]
    fn zero_factor_mode_is_zero_not_unknown() {
        let calc = default_calculator();
        assert_eq!(calc.calculate_emission(100.0, "bicycle"), Some(0.0));
    }

    #[test]
    fn unknown_mode_is_none() {
        let calc = default_calculator();
        assert_eq!(calc.calculate_emission(100.0, "spaceship"), None);
    }

    #[test]
    fn emission_rounds_to_two_decimals() {
        let calc = default_calculator();
        // 123.45 km by bus: 10.98705 -> 10.99
        assert_eq!(calc.calculate_emission(123.45, "bus"), Some(10.99));
    }

    #[test]
    fn all_modes_sorted_ascending_with_car_percentages() {
        let calc = default_calculator();
        let entries = calc.calculate_all_modes(100.0);

        let summary: Vec<(&str, f64, Option<f64>)> = entries
            .iter()
            .map(|e| (e.mode.as_str(), e.emission_kg, e.percentage_vs_car))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("bicycle", 0.0, Some(0.0)),
                ("bus", 8.9, Some(74.17)),
                ("car", 12.0, Some(100.0)),
                ("truck", 96.0, Some(800.0)),
            ]
        );
    }

    #[test]
    fn all_modes_ties_keep_table_order() {
        let factors = EmissionFactorTable::new(vec![
            factor("walk", 0.0),
            factor("bicycle", 0.0),
            factor("car", 0.1),
        ]);
        let calc = Calculator::new(factors, credit_config());

        let entries = calc.calculate_all_modes(50.0);
        assert_eq!(entries[0].mode, "walk");
        assert_eq!(entries[1].mode, "bicycle");
        assert_eq!(entries[2].mode, "car");
    }

    #[test]
    fn all_modes_without_car_has_no_percentages() {
        let factors = EmissionFactorTable::new(vec![factor("bus", 0.089), factor("truck", 0.96)]);
        let calc = Calculator::new(factors, credit_config());

        for entry in calc.calculate_all_modes(100.0) {
            assert_eq!(entry.percentage_vs_car, None);
        }
    }

    #[test]
    fn zero_car_baseline_only_matches_zero_emitters() {
        let factors = EmissionFactorTable::new(vec![
            factor("car", 0.0),
            factor("bicycle", 0.0),
            factor("bus", 0.089),
        ]);
        let calc = Calculator::new(factors, credit_config());

        let entries = calc.calculate_all_modes(100.0);
        let by_mode = |mode: &str| {
            entries
                .iter()
                .find(|e| e.mode == mode)
                .expect("mode present")
                .percentage_vs_car
        };
        assert_eq!(by_mode("car"), Some(100.0));
        assert_eq!(by_mode("bicycle"), Some(100.0));
        assert_eq!(by_mode("bus"), None);
    }

    #[test]
    fn empty_table_yields_empty_comparison() {
        let calc = Calculator::new(EmissionFactorTable::default(), credit_config());
        assert!(calc.calculate_all_modes(100.0).is_empty());
    }

    #[test]
    fn savings_rounds_and_keeps_percentage() {
        let calc = default_calculator();
        let savings = calc.calculate_savings(8.9, 12.0);
        assert_eq!(savings.saved_kg, 3.1);
        assert_eq!(savings.percentage, Some(25.83));
    }

    #[test]
    fn negative_savings_are_not_clamped() {
        let calc = default_calculator();
        let savings = calc.calculate_savings(15.0, 12.0);
        assert_eq!(savings.saved_kg, -3.0);
        assert_eq!(savings.percentage, Some(-25.0));
    }

    #[test]
    fn savings_percentage_undefined_for_non_positive_baseline() {
        let calc = default_calculator();
        assert_eq!(calc.calculate_savings(5.0, 0.0).percentage, None);
        assert_eq!(calc.calculate_savings(5.0, -1.0).percentage, None);
    }

    #[test]
    fn credit_price_scales_with_credits() {
        let calc = default_calculator();
        let estimate = calc.estimate_credit_price(2.5);
        assert_eq!(estimate.min, 125.0);
        assert_eq!(estimate.max, 375.0);
        assert_eq!(estimate.average, 250.0);
    }

    #[test]
    fn negative_credits_propagate() {
        let calc = default_calculator();
        let estimate = calc.estimate_credit_price(-1.0);
        assert_eq!(estimate.min, -50.0);
        assert_eq!(estimate.max, -150.0);
        assert_eq!(estimate.average, -100.0);
    }

    #[test]
    fn credits_needed_divides_by_kg_per_credit() {
        let calc = default_calculator();
        assert_eq!(calc.credits_needed(2500.0), 2.5);
    }

    #[test]
    fn calculations_are_idempotent() {
        let calc = default_calculator();
        assert_eq!(
            calc.calculate_all_modes(123.45),
            calc.calculate_all_modes(123.45)
        );
        assert_eq!(
            calc.calculate_emission(123.45, "truck"),
            calc.calculate_emission(123.45, "truck")
        );
        assert_eq!(
            calc.calculate_savings(8.9, 12.0),
            calc.calculate_savings(8.9, 12.0)
        );
    }
}
