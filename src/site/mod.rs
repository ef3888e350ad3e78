//! Site inputs: immutable time series and static lookup tables.

/// Synthetic site profiles for scenarios without recorded data.
pub mod synthetic;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::task::TaskData;

/// Everything known about one site before a configuration is applied.
///
/// All series are parallel and hold exactly one entry per timestep. Energy
/// series are per-timestep quantities (kWh), not powers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteData {
    /// First instant covered by the series.
    pub start_ts: DateTime<Utc>,
    /// Instant just after the last timestep.
    pub end_ts: DateTime<Utc>,
    /// Duration of one timestep in hours.
    pub timestep_hours: f32,
    /// Building electrical demand (kWh per step).
    pub building_eload: Vec<f32>,
    /// Building space-heating demand (kWh heat per step).
    pub building_hload: Vec<f32>,
    /// EV charging demand (kWh per step).
    pub ev_eload: Vec<f32>,
    /// Domestic hot water demand (kWh heat per step).
    pub dhw_demand: Vec<f32>,
    /// Outdoor air temperature (°C).
    pub air_temperature: Vec<f32>,
    /// Grid carbon intensity (g CO2e per kWh).
    pub grid_co2: Vec<f32>,
    /// Solar yield profiles (kWh per kWp per step), one per panel orientation.
    pub solar_yields: Vec<Vec<f32>>,
    /// Import tariffs (£/kWh), one series per tariff definition.
    pub import_tariffs: Vec<Vec<f32>>,
    /// Fabric retrofit options.
    pub fabric_interventions: Vec<FabricIntervention>,
    /// As-is configuration every candidate is compared against.
    pub baseline: TaskData,
    /// Peak space-heating load of the as-is building (kW).
    pub peak_hload: f32,
    /// Heat pump electrical input per kW of rated output.
    pub ashp_input_table: HeatPumpTable,
    /// Heat pump heat output per kW of rated output.
    pub ashp_output_table: HeatPumpTable,
}

/// A building-envelope retrofit option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricIntervention {
    /// Capital cost (£).
    pub cost: f64,
    /// Optional itemised cost breakdown.
    #[serde(default)]
    pub cost_breakdown: Option<Vec<CostItem>>,
    /// Reduction of the peak heating load (kW).
    pub peak_hload_reduction: f32,
    /// Per-timestep reduction of space-heating demand (kWh heat).
    pub hload_reduction: Vec<f32>,
}

/// One line of a cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    /// Item description.
    pub name: String,
    /// Item cost (£).
    pub cost: f64,
}

/// Sparse heat pump performance data.
///
/// `values[row][col]` is the value at `air_temperatures[row]` and
/// `send_temperatures[col]`. Both axes must be strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpTable {
    /// Air temperatures (°C), one per row.
    pub air_temperatures: Vec<f32>,
    /// Send (flow) temperatures (°C), one per column.
    pub send_temperatures: Vec<f32>,
    /// Table values.
    pub values: Vec<Vec<f32>>,
}

/// Air temperature axis of the built-in performance tables (°C).
const TYPICAL_AIR_TEMPS: [f32; 14] = [
    -20.0, -15.0, -10.0, -5.0, 0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0,
];

/// Send temperature axis of the built-in performance tables (°C).
const TYPICAL_SEND_TEMPS: [f32; 9] = [30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0];

/// Upper bound applied to the built-in coefficient of performance.
const MAX_TYPICAL_COP: f32 = 7.0;

impl HeatPumpTable {
    /// Returns the built-in air source performance tables as `(input, output)`.
    ///
    /// Output capacity rises with air temperature and falls with flow
    /// temperature; input follows a derated Carnot COP.
    pub fn typical_air_source() -> (Self, Self) {
        let mut input = Vec::with_capacity(TYPICAL_AIR_TEMPS.len());
        let mut output = Vec::with_capacity(TYPICAL_AIR_TEMPS.len());
        for &air in &TYPICAL_AIR_TEMPS {
            let mut in_row = Vec::with_capacity(TYPICAL_SEND_TEMPS.len());
            let mut out_row = Vec::with_capacity(TYPICAL_SEND_TEMPS.len());
            for &send in &TYPICAL_SEND_TEMPS {
                let heat = (1.0 + 0.012 * (air - 7.0) - 0.004 * (send - 35.0)).max(0.4);
                let cop = (0.4 * (send + 273.15) / (send - air).max(10.0)).min(MAX_TYPICAL_COP);
                out_row.push(heat);
                in_row.push(heat / cop);
            }
            input.push(in_row);
            output.push(out_row);
        }
        let table = |values| Self {
            air_temperatures: TYPICAL_AIR_TEMPS.to_vec(),
            send_temperatures: TYPICAL_SEND_TEMPS.to_vec(),
            values,
        };
        (table(input), table(output))
    }

    fn validate(&self, name: &str) -> Result<(), SimError> {
        let bad = |msg: String| Err(SimError::InvalidSite(format!("{name}: {msg}")));
        if self.air_temperatures.is_empty() || self.send_temperatures.is_empty() {
            return bad("table has no rows or columns".into());
        }
        if !strictly_increasing(&self.air_temperatures) {
            return bad("air temperatures must be finite and strictly increasing".into());
        }
        if !strictly_increasing(&self.send_temperatures) {
            return bad("send temperatures must be finite and strictly increasing".into());
        }
        if self.values.len() != self.air_temperatures.len() {
            return bad(format!(
                "{} rows for {} air temperatures",
                self.values.len(),
                self.air_temperatures.len()
            ));
        }
        for (i, row) in self.values.iter().enumerate() {
            if row.len() != self.send_temperatures.len() {
                return bad(format!(
                    "row {i} has {} columns, expected {}",
                    row.len(),
                    self.send_temperatures.len()
                ));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return bad(format!("row {i} contains a non-finite value"));
            }
        }
        Ok(())
    }
}

fn strictly_increasing(xs: &[f32]) -> bool {
    xs.iter().all(|x| x.is_finite()) && xs.windows(2).all(|w| w[0] < w[1])
}

impl SiteData {
    /// Number of timesteps in the horizon.
    pub fn timesteps(&self) -> usize {
        self.building_eload.len()
    }

    /// Length of the simulated horizon in hours.
    pub fn horizon_hours(&self) -> f64 {
        self.timesteps() as f64 * f64::from(self.timestep_hours)
    }

    /// Checks the structural invariants every simulation relies on.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidSite` on an empty horizon, a non-positive
    /// timestep, any series whose length differs from the timestep count,
    /// or a malformed heat pump table.
    pub fn validate(&self) -> Result<(), SimError> {
        let n = self.timesteps();
        if n == 0 {
            return Err(SimError::InvalidSite("site has no timesteps".into()));
        }
        if !(self.timestep_hours.is_finite() && self.timestep_hours > 0.0) {
            return Err(SimError::InvalidSite(format!(
                "timestep_hours must be > 0, got {}",
                self.timestep_hours
            )));
        }

        let check = |name: &str, series: &[f32]| {
            if series.len() == n {
                Ok(())
            } else {
                Err(SimError::InvalidSite(format!(
                    "{name} has {} entries, expected {n}",
                    series.len()
                )))
            }
        };
        check("building_hload", &self.building_hload)?;
        check("ev_eload", &self.ev_eload)?;
        check("dhw_demand", &self.dhw_demand)?;
        check("air_temperature", &self.air_temperature)?;
        check("grid_co2", &self.grid_co2)?;
        for (i, series) in self.solar_yields.iter().enumerate() {
            check(&format!("solar_yields[{i}]"), series)?;
        }
        for (i, series) in self.import_tariffs.iter().enumerate() {
            check(&format!("import_tariffs[{i}]"), series)?;
        }
        for (i, fabric) in self.fabric_interventions.iter().enumerate() {
            check(
                &format!("fabric_interventions[{i}].hload_reduction"),
                &fabric.hload_reduction,
            )?;
        }

        self.ashp_input_table.validate("ashp_input_table")?;
        self.ashp_output_table.validate("ashp_output_table")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_site(n: usize) -> SiteData {
        let (input, output) = HeatPumpTable::typical_air_source();
        SiteData {
            start_ts: DateTime::<Utc>::UNIX_EPOCH,
            end_ts: DateTime::<Utc>::UNIX_EPOCH,
            timestep_hours: 1.0,
            building_eload: vec![1.0; n],
            building_hload: vec![1.0; n],
            ev_eload: vec![0.0; n],
            dhw_demand: vec![0.0; n],
            air_temperature: vec![5.0; n],
            grid_co2: vec![200.0; n],
            solar_yields: vec![vec![0.0; n]],
            import_tariffs: vec![vec![0.3; n]],
            fabric_interventions: Vec::new(),
            baseline: TaskData::default(),
            peak_hload: 1.0,
            ashp_input_table: input,
            ashp_output_table: output,
        }
    }

    #[test]
    fn valid_site_passes() {
        let site = tiny_site(24);
        assert_eq!(site.validate(), Ok(()));
        assert_eq!(site.horizon_hours(), 24.0);
    }

    #[test]
    fn empty_site_rejected() {
        assert!(matches!(
            tiny_site(0).validate(),
            Err(SimError::InvalidSite(_))
        ));
    }

    #[test]
    fn mismatched_series_rejected() {
        let mut site = tiny_site(24);
        site.import_tariffs.push(vec![0.2; 23]);
        let err = site.validate();
        assert!(matches!(&err, Err(SimError::InvalidSite(m)) if m.contains("import_tariffs[1]")));
    }

    #[test]
    fn malformed_table_rejected() {
        let mut site = tiny_site(4);
        site.ashp_output_table.air_temperatures.swap(0, 1);
        assert!(site.validate().is_err());

        let mut site = tiny_site(4);
        site.ashp_input_table.values[2].pop();
        assert!(site.validate().is_err());
    }

    #[test]
    fn typical_tables_have_plausible_cop() {
        let (input, output) = HeatPumpTable::typical_air_source();
        // 7 °C air is between rows 5 (5 °C) and 6 (10 °C); check at 5 °C / 35 °C.
        let cop = output.values[5][1] / input.values[5][1];
        assert!(cop > 3.0 && cop < 5.0, "cop={cop}");
        for (r, row) in input.values.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                assert!(*v > 0.0);
                assert!(output.values[r][c] / v <= MAX_TYPICAL_COP + 1e-4);
            }
        }
    }
}
