//! Candidate versus baseline balances.

use serde::{Deserialize, Serialize};

use super::metrics::SimulationMetrics;

/// Baseline minus candidate: positive values favour the candidate.
///
/// Cost and carbon balances are annual. NPV balance is the candidate's NPV
/// gain over the baseline. Derived ratios are `None` when undefined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Annual standing-charge saving (£/yr).
    pub meter_balance: f64,
    /// Annual operating cost saving (£/yr).
    pub operating_balance: f64,
    /// Annualised cost saving (£/yr).
    pub cost_balance: f64,
    /// Lifetime NPV gain (£).
    pub npv_balance: f64,
    /// Annual scope 1 saving (kg CO2e/yr).
    pub carbon_balance_scope_1: f64,
    /// Annual scope 2 saving (kg CO2e/yr).
    pub carbon_balance_scope_2: f64,
    /// Annual combined saving (kg CO2e/yr).
    pub combined_carbon_balance: f64,
    /// Years of operating savings needed to repay the capex.
    pub payback_horizon_years: Option<f64>,
    /// Annual operating saving per £ of capex.
    pub return_on_investment: Option<f64>,
    /// Capex per tonne CO2e saved over the project lifetime (£/t).
    pub carbon_cost: Option<f64>,
}

impl Comparison {
    /// Compares candidate metrics against baseline metrics.
    ///
    /// # Arguments
    ///
    /// * `baseline` - Metrics of the as-is configuration
    /// * `candidate` - Metrics of the configuration under test
    /// * `horizon_years` - Simulated horizon, for annualising totals
    /// * `lifetime_years` - Project lifetime, for the carbon cost
    pub fn between(
        baseline: &SimulationMetrics,
        candidate: &SimulationMetrics,
        horizon_years: f64,
        lifetime_years: u32,
    ) -> Self {
        let annual = |base: f64, cand: f64| {
            if horizon_years > 0.0 {
                (base - cand) / horizon_years
            } else {
                0.0
            }
        };
        let mut comparison = Self {
            meter_balance: annual(baseline.total_meter_cost, candidate.total_meter_cost),
            operating_balance: baseline.annual_operating_cost - candidate.annual_operating_cost,
            cost_balance: baseline.total_annualised_cost - candidate.total_annualised_cost,
            npv_balance: candidate.total_net_present_value - baseline.total_net_present_value,
            carbon_balance_scope_1: annual(
                baseline.total_scope_1_emissions,
                candidate.total_scope_1_emissions,
            ),
            carbon_balance_scope_2: annual(
                baseline.total_scope_2_emissions,
                candidate.total_scope_2_emissions,
            ),
            combined_carbon_balance: annual(
                baseline.total_combined_carbon_emissions,
                candidate.total_combined_carbon_emissions,
            ),
            ..Self::default()
        };
        comparison.derive_ratios(candidate.total_capex - baseline.total_capex, lifetime_years);
        comparison
    }

    /// Recomputes payback, return on investment and carbon cost from the
    /// additive balances and `capex`.
    pub fn derive_ratios(&mut self, capex: f64, lifetime_years: u32) {
        self.payback_horizon_years =
            (self.operating_balance > 0.0).then(|| capex / self.operating_balance);
        self.return_on_investment = (capex > 0.0).then(|| self.operating_balance / capex);
        let lifetime_tonnes = self.combined_carbon_balance / 1000.0 * f64::from(lifetime_years);
        self.carbon_cost = (lifetime_tonnes > 0.0).then(|| capex / lifetime_tonnes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn metrics(capex: f64, annual_opex: f64, carbon: f64) -> SimulationMetrics {
        SimulationMetrics {
            total_capex: capex,
            annual_operating_cost: annual_opex,
            total_annualised_cost: annual_opex,
            total_combined_carbon_emissions: carbon,
            total_scope_2_emissions: carbon,
            ..SimulationMetrics::default()
        }
    }

    #[test]
    fn identical_metrics_balance_to_zero() {
        let m = metrics(0.0, 1_000.0, 500.0);
        let c = Comparison::between(&m, &m, 1.0, 15);
        assert_eq!(c.cost_balance, 0.0);
        assert_eq!(c.combined_carbon_balance, 0.0);
        assert_eq!(c.payback_horizon_years, None);
        assert_eq!(c.return_on_investment, None);
        assert_eq!(c.carbon_cost, None);
    }

    #[test]
    fn saving_candidate_pays_back() {
        let base = metrics(0.0, 3_000.0, 2_000.0);
        let cand = metrics(10_000.0, 1_000.0, 1_000.0);
        let c = Comparison::between(&base, &cand, 1.0, 10);
        assert_eq!(c.operating_balance, 2_000.0);
        assert_eq!(c.payback_horizon_years, Some(5.0));
        assert_eq!(c.return_on_investment, Some(0.2));
        // 1 t/yr over 10 years.
        assert_relative_eq!(c.carbon_cost.unwrap_or_default(), 1_000.0);
    }

    #[test]
    fn horizon_totals_are_annualised() {
        let base = metrics(0.0, 0.0, 600.0);
        let cand = metrics(0.0, 0.0, 300.0);
        let c = Comparison::between(&base, &cand, 0.5, 15);
        assert_relative_eq!(c.combined_carbon_balance, 600.0);
    }

    #[test]
    fn costlier_candidate_has_no_payback() {
        let base = metrics(0.0, 1_000.0, 0.0);
        let cand = metrics(5_000.0, 1_200.0, 0.0);
        let c = Comparison::between(&base, &cand, 1.0, 15);
        assert_eq!(c.payback_horizon_years, None);
        assert_eq!(c.return_on_investment.map(|r| r < 0.0), Some(true));
    }
}
