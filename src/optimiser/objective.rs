//! Objectives read from a simulation result.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::SimulationResult;

/// A quantity the optimiser minimises or maximises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Capex,
    AnnualisedCost,
    OperatingCost,
    CostBalance,
    NpvBalance,
    PaybackHorizon,
    ReturnOnInvestment,
    CarbonBalanceScope1,
    CarbonBalanceScope2,
    CombinedCarbonBalance,
    CarbonCost,
}

impl Objective {
    pub const ALL: [Objective; 11] = [
        Self::Capex,
        Self::AnnualisedCost,
        Self::OperatingCost,
        Self::CostBalance,
        Self::NpvBalance,
        Self::PaybackHorizon,
        Self::ReturnOnInvestment,
        Self::CarbonBalanceScope1,
        Self::CarbonBalanceScope2,
        Self::CombinedCarbonBalance,
        Self::CarbonCost,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Capex => "capex",
            Self::AnnualisedCost => "annualised_cost",
            Self::OperatingCost => "operating_cost",
            Self::CostBalance => "cost_balance",
            Self::NpvBalance => "npv_balance",
            Self::PaybackHorizon => "payback_horizon",
            Self::ReturnOnInvestment => "return_on_investment",
            Self::CarbonBalanceScope1 => "carbon_balance_scope_1",
            Self::CarbonBalanceScope2 => "carbon_balance_scope_2",
            Self::CombinedCarbonBalance => "combined_carbon_balance",
            Self::CarbonCost => "carbon_cost",
        }
    }

    /// Balances and return on investment improve upwards; costs, payback
    /// and carbon cost improve downwards.
    pub fn is_maximised(self) -> bool {
        matches!(
            self,
            Self::CostBalance
                | Self::NpvBalance
                | Self::ReturnOnInvestment
                | Self::CarbonBalanceScope1
                | Self::CarbonBalanceScope2
                | Self::CombinedCarbonBalance
        )
    }

    /// Reported value, or `None` where the ratio is undefined.
    pub fn value(self, r: &SimulationResult) -> Option<f64> {
        let m = &r.metrics;
        let c = &r.comparison;
        match self {
            Self::Capex => Some(m.total_capex),
            Self::AnnualisedCost => Some(m.total_annualised_cost),
            Self::OperatingCost => Some(m.annual_operating_cost),
            Self::CostBalance => Some(c.cost_balance),
            Self::NpvBalance => Some(c.npv_balance),
            Self::PaybackHorizon => c.payback_horizon_years,
            Self::ReturnOnInvestment => c.return_on_investment,
            Self::CarbonBalanceScope1 => Some(c.carbon_balance_scope_1),
            Self::CarbonBalanceScope2 => Some(c.carbon_balance_scope_2),
            Self::CombinedCarbonBalance => Some(c.combined_carbon_balance),
            Self::CarbonCost => c.carbon_cost,
        }
    }

    /// Value in minimisation form. Undefined values rank worst.
    pub fn minimised(self, r: &SimulationResult) -> f64 {
        match self.value(r) {
            Some(v) if self.is_maximised() => -v,
            Some(v) => v,
            None => f64::INFINITY,
        }
    }

    /// Inverse of [`minimised`](Self::minimised) for reporting.
    pub fn reported(self, minimised: f64) -> f64 {
        if self.is_maximised() { -minimised } else { minimised }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Objective vector of `r` in minimisation form.
pub fn objective_vector(objectives: &[Objective], r: &SimulationResult) -> Vec<f64> {
    objectives.iter().map(|o| o.minimised(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Comparison, SimulationMetrics};

    fn result() -> SimulationResult {
        SimulationResult {
            baseline: SimulationMetrics::default(),
            metrics: SimulationMetrics {
                total_capex: 5_000.0,
                ..SimulationMetrics::default()
            },
            comparison: Comparison {
                cost_balance: 120.0,
                payback_horizon_years: None,
                ..Comparison::default()
            },
            horizon_years: 1.0,
            lifetime_years: 15,
        }
    }

    #[test]
    fn balances_are_negated() {
        let r = result();
        assert_eq!(Objective::CostBalance.minimised(&r), -120.0);
        assert_eq!(Objective::Capex.minimised(&r), 5_000.0);
        assert_eq!(Objective::CostBalance.reported(-120.0), 120.0);
    }

    #[test]
    fn undefined_ratios_rank_worst() {
        let r = result();
        assert_eq!(Objective::PaybackHorizon.value(&r), None);
        assert_eq!(Objective::PaybackHorizon.minimised(&r), f64::INFINITY);
        assert_eq!(Objective::ReturnOnInvestment.minimised(&r), f64::INFINITY);
    }

    #[test]
    fn names_round_trip_through_serde() {
        for o in Objective::ALL {
            let json = serde_json::to_string(&o).unwrap();
            assert_eq!(json, format!("\"{}\"", o.name()));
        }
    }
}
