//! Aggregate outcome of one simulated configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::comparison::Comparison;

/// Hours in a non-leap year, used to annualise horizon totals.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Emission intensity (kg CO2e per kWh of demand) scoring 0 before clamping.
const REFERENCE_INTENSITY: f64 = 0.30;

/// Totals over the simulated horizon unless a field says otherwise.
///
/// Energies are kWh, costs £, emissions kg CO2e.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub total_gas_used: f64,
    pub total_electricity_imported: f64,
    pub total_electricity_generated: f64,
    pub total_electricity_exported: f64,
    pub total_electricity_curtailed: f64,
    pub total_electricity_used: f64,
    pub total_electrical_shortfall: f64,
    pub total_ev_load: f64,
    pub total_ev_shortfall: f64,

    pub total_heat_load: f64,
    pub total_dhw_load: f64,
    pub total_space_heat_load: f64,
    pub total_heat_shortfall: f64,
    pub total_dhw_shortfall: f64,
    pub total_space_heat_shortfall: f64,

    pub total_capex: f64,
    pub total_import_cost: f64,
    pub total_export_gains: f64,
    pub total_gas_cost: f64,
    pub total_meter_cost: f64,
    pub total_operating_cost: f64,
    /// Operating cost scaled to one year.
    pub annual_operating_cost: f64,
    /// Capex annuity plus annual operating cost.
    pub total_annualised_cost: f64,
    /// `-capex` minus discounted operating costs over the lifetime.
    pub total_net_present_value: f64,

    pub total_scope_1_emissions: f64,
    pub total_scope_2_emissions: f64,
    pub total_combined_carbon_emissions: f64,

    /// 1–100, higher is better. Single-site only.
    pub environmental_score: Option<f64>,
    /// Band of `environmental_score`. Single-site only.
    pub environmental_grade: Option<EnvironmentalGrade>,
}

/// Environmental rating band, A best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnvironmentalGrade {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl EnvironmentalGrade {
    /// Band for a 1–100 score.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 92.0 => Self::A,
            s if s >= 81.0 => Self::B,
            s if s >= 69.0 => Self::C,
            s if s >= 55.0 => Self::D,
            s if s >= 39.0 => Self::E,
            s if s >= 21.0 => Self::F,
            _ => Self::G,
        }
    }
}

impl fmt::Display for EnvironmentalGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Sums the listed fields of `$src` into `$dst`.
macro_rules! accumulate_fields {
    ($dst:expr, $src:expr, $($field:ident),+ $(,)?) => {
        $( $dst.$field += $src.$field; )+
    };
}

impl SimulationMetrics {
    /// Adds every additive total of `other` into `self`.
    ///
    /// The environmental score and grade are not additive and are cleared.
    pub fn accumulate(&mut self, other: &Self) {
        accumulate_fields!(
            self,
            other,
            total_gas_used,
            total_electricity_imported,
            total_electricity_generated,
            total_electricity_exported,
            total_electricity_curtailed,
            total_electricity_used,
            total_electrical_shortfall,
            total_ev_load,
            total_ev_shortfall,
            total_heat_load,
            total_dhw_load,
            total_space_heat_load,
            total_heat_shortfall,
            total_dhw_shortfall,
            total_space_heat_shortfall,
            total_capex,
            total_import_cost,
            total_export_gains,
            total_gas_cost,
            total_meter_cost,
            total_operating_cost,
            annual_operating_cost,
            total_annualised_cost,
            total_net_present_value,
            total_scope_1_emissions,
            total_scope_2_emissions,
            total_combined_carbon_emissions,
        );
        self.environmental_score = None;
        self.environmental_grade = None;
    }

    /// Sets the environmental score and grade from annual emissions per
    /// unit of energy demand.
    ///
    /// A site with no demand scores 100.
    pub fn rate_environment(&mut self) {
        let demand = self.total_electricity_used + self.total_heat_load;
        let intensity = if demand > 0.0 {
            self.total_combined_carbon_emissions / demand
        } else {
            0.0
        };
        let score = (100.0 * (1.0 - intensity / REFERENCE_INTENSITY))
            .round()
            .clamp(1.0, 100.0);
        self.environmental_score = Some(score);
        self.environmental_grade = Some(EnvironmentalGrade::from_score(score));
    }
}

/// Outcome of simulating one configuration against its site baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Metrics of the site's as-is configuration.
    pub baseline: SimulationMetrics,
    /// Metrics of the candidate.
    pub metrics: SimulationMetrics,
    /// Baseline minus candidate.
    pub comparison: Comparison,
    /// Simulated horizon in years.
    pub horizon_years: f64,
    /// Project lifetime used for annuities and NPV.
    pub lifetime_years: u32,
}

impl fmt::Display for SimulationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Electricity imported:  {:.1} kWh", self.total_electricity_imported)?;
        writeln!(f, "Electricity exported:  {:.1} kWh", self.total_electricity_exported)?;
        writeln!(f, "Generation:            {:.1} kWh", self.total_electricity_generated)?;
        writeln!(f, "Gas used:              {:.1} kWh", self.total_gas_used)?;
        writeln!(
            f,
            "Shortfall (elec/heat): {:.2} / {:.2} kWh",
            self.total_electrical_shortfall, self.total_heat_shortfall
        )?;
        writeln!(f, "Capex:                 £{:.0}", self.total_capex)?;
        writeln!(f, "Annual operating cost: £{:.0}", self.annual_operating_cost)?;
        writeln!(f, "Annualised cost:       £{:.0}", self.total_annualised_cost)?;
        write!(
            f,
            "Carbon (scope 1 + 2):  {:.1} kg",
            self.total_combined_carbon_emissions
        )?;
        if let (Some(score), Some(grade)) = (self.environmental_score, self.environmental_grade) {
            write!(f, "\nEnvironmental rating:  {grade} ({score:.0})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_bands() {
        assert_eq!(EnvironmentalGrade::from_score(100.0), EnvironmentalGrade::A);
        assert_eq!(EnvironmentalGrade::from_score(92.0), EnvironmentalGrade::A);
        assert_eq!(EnvironmentalGrade::from_score(91.0), EnvironmentalGrade::B);
        assert_eq!(EnvironmentalGrade::from_score(55.0), EnvironmentalGrade::D);
        assert_eq!(EnvironmentalGrade::from_score(1.0), EnvironmentalGrade::G);
    }

    #[test]
    fn zero_emission_site_rates_a() {
        let mut m = SimulationMetrics {
            total_electricity_used: 100.0,
            ..SimulationMetrics::default()
        };
        m.rate_environment();
        assert_eq!(m.environmental_score, Some(100.0));
        assert_eq!(m.environmental_grade, Some(EnvironmentalGrade::A));
    }

    #[test]
    fn dirty_site_clamps_to_one() {
        let mut m = SimulationMetrics {
            total_heat_load: 10.0,
            total_combined_carbon_emissions: 50.0,
            ..SimulationMetrics::default()
        };
        m.rate_environment();
        assert_eq!(m.environmental_score, Some(1.0));
        assert_eq!(m.environmental_grade, Some(EnvironmentalGrade::G));
    }

    #[test]
    fn accumulate_sums_and_clears_rating() {
        let mut a = SimulationMetrics {
            total_capex: 10.0,
            total_scope_2_emissions: 2.0,
            environmental_score: Some(80.0),
            environmental_grade: Some(EnvironmentalGrade::C),
            ..SimulationMetrics::default()
        };
        let b = SimulationMetrics {
            total_capex: 5.0,
            total_scope_2_emissions: 1.5,
            ..SimulationMetrics::default()
        };
        a.accumulate(&b);
        assert_eq!(a.total_capex, 15.0);
        assert_eq!(a.total_scope_2_emissions, 3.5);
        assert_eq!(a.environmental_score, None);
        assert_eq!(a.environmental_grade, None);
    }

    #[test]
    fn display_includes_rating_when_present() {
        let mut m = SimulationMetrics::default();
        m.rate_environment();
        let text = m.to_string();
        assert!(text.contains("Environmental rating:  A (100)"));
    }
}
