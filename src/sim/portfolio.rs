//! Combining per-site results into one portfolio result.

use super::comparison::Comparison;
use super::metrics::{SimulationMetrics, SimulationResult};
use crate::error::SimError;

/// Aggregates per-site results into a single portfolio result.
///
/// Additive metrics and balances are summed. Payback, return on investment
/// and carbon cost are recomputed from the summed capex and balances rather
/// than summed, and the environmental rating is left unset.
///
/// # Errors
///
/// Returns `SimError::Portfolio` when `results` is empty or the sites were
/// simulated over different horizons or lifetimes.
pub fn aggregate(results: &[SimulationResult]) -> Result<SimulationResult, SimError> {
    let Some(first) = results.first() else {
        return Err(SimError::Portfolio("no site results to aggregate".into()));
    };

    let mut baseline = SimulationMetrics::default();
    let mut metrics = SimulationMetrics::default();
    let mut comparison = Comparison::default();

    for (i, site) in results.iter().enumerate() {
        if site.horizon_years.to_bits() != first.horizon_years.to_bits() {
            return Err(SimError::Portfolio(format!(
                "site {i} covers {} years, site 0 covers {}",
                site.horizon_years, first.horizon_years
            )));
        }
        if site.lifetime_years != first.lifetime_years {
            return Err(SimError::Portfolio(format!(
                "site {i} uses a {}-year lifetime, site 0 uses {}",
                site.lifetime_years, first.lifetime_years
            )));
        }
        baseline.accumulate(&site.baseline);
        metrics.accumulate(&site.metrics);

        let c = &site.comparison;
        comparison.meter_balance += c.meter_balance;
        comparison.operating_balance += c.operating_balance;
        comparison.cost_balance += c.cost_balance;
        comparison.npv_balance += c.npv_balance;
        comparison.carbon_balance_scope_1 += c.carbon_balance_scope_1;
        comparison.carbon_balance_scope_2 += c.carbon_balance_scope_2;
        comparison.combined_carbon_balance += c.combined_carbon_balance;
    }

    comparison.derive_ratios(
        metrics.total_capex - baseline.total_capex,
        first.lifetime_years,
    );

    Ok(SimulationResult {
        baseline,
        metrics,
        comparison,
        horizon_years: first.horizon_years,
        lifetime_years: first.lifetime_years,
    })
}
