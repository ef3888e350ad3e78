//! Capital cost model, standing charges and financial parameters.

use serde::{Deserialize, Serialize};

use crate::devices::FabricModel;
use crate::devices::ev_charger::charger_counts;
use crate::task::TaskData;

/// Fixed plus linear cost of one component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitCost {
    /// Cost incurred for any non-zero installation (£).
    pub fixed: f64,
    /// Cost per unit of size (£ per kW, kWh, kWp or litre).
    pub per_unit: f64,
}

impl UnitCost {
    /// Cost of an installation of `size`; nothing when `size` is not positive.
    pub fn cost(&self, size: f64) -> f64 {
        if size > 0.0 {
            self.fixed + self.per_unit * size
        } else {
            0.0
        }
    }
}

/// Prices and financial assumptions used to cost a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostModel {
    /// Annual discount rate (e.g. 0.035).
    pub discount_rate: f64,
    /// Project lifetime in years.
    pub lifetime_years: u32,
    /// Electricity standing charge (£/day), charged when a grid is connected.
    pub electricity_standing_charge: f64,
    /// Gas standing charge (£/day), charged when a boiler is installed.
    pub gas_standing_charge: f64,
    /// Heat pump, per kW rated.
    pub heat_pump: UnitCost,
    /// Battery, per kWh of capacity.
    pub battery: UnitCost,
    /// Battery inverter, per kW of the larger power rating.
    pub battery_power_per_kw: f64,
    /// Solar, per kWp, fixed part per array.
    pub solar: UnitCost,
    /// Per-charger cost: small, fast, rapid, ultra.
    pub ev_chargers: [f64; 4],
    /// Hot water cylinder, per litre.
    pub hot_water: UnitCost,
    /// Boiler, per kW output.
    pub gas_heater: UnitCost,
    /// Grid connection upgrade per kW of import above the baseline.
    pub grid_upgrade_per_kw: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            discount_rate: 0.035,
            lifetime_years: 15,
            electricity_standing_charge: 0.60,
            gas_standing_charge: 0.30,
            heat_pump: UnitCost {
                fixed: 4_000.0,
                per_unit: 1_200.0,
            },
            battery: UnitCost {
                fixed: 1_000.0,
                per_unit: 400.0,
            },
            battery_power_per_kw: 150.0,
            solar: UnitCost {
                fixed: 1_500.0,
                per_unit: 1_000.0,
            },
            ev_chargers: [1_200.0, 3_000.0, 25_000.0, 80_000.0],
            hot_water: UnitCost {
                fixed: 800.0,
                per_unit: 4.0,
            },
            gas_heater: UnitCost {
                fixed: 1_500.0,
                per_unit: 100.0,
            },
            grid_upgrade_per_kw: 200.0,
        }
    }
}

/// Capital cost per component (£).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapexBreakdown {
    pub heat_pump: f64,
    pub battery: f64,
    pub solar: f64,
    pub ev_chargers: f64,
    pub hot_water: f64,
    pub gas_heater: f64,
    pub grid: f64,
    pub fabric: f64,
}

impl CapexBreakdown {
    /// Sum of all components.
    pub fn total(&self) -> f64 {
        self.heat_pump
            + self.battery
            + self.solar
            + self.ev_chargers
            + self.hot_water
            + self.gas_heater
            + self.grid
            + self.fabric
    }
}

/// Returns `cost` of `candidate` unless it equals `baseline`.
fn if_changed<T: PartialEq>(
    candidate: Option<&T>,
    baseline: Option<&T>,
    cost: impl Fn(&T) -> f64,
) -> f64 {
    match candidate {
        Some(c) if Some(c) != baseline => cost(c),
        _ => 0.0,
    }
}

impl CostModel {
    /// Capital cost of `candidate` relative to `baseline`.
    ///
    /// Only components that differ from the baseline are costed, so the
    /// baseline itself costs nothing. EV chargers and grid capacity are
    /// costed on the increase over the baseline.
    ///
    /// # Arguments
    ///
    /// * `candidate` - Configuration under test
    /// * `baseline` - Site's as-is configuration
    /// * `fabric` - Fabric intervention selected by `candidate`
    pub fn capex(
        &self,
        candidate: &TaskData,
        baseline: &TaskData,
        fabric: &FabricModel<'_>,
    ) -> CapexBreakdown {
        let heat_pump = if_changed(
            candidate.heat_pump.as_ref(),
            baseline.heat_pump.as_ref(),
            |hp| self.heat_pump.cost(f64::from(hp.heat_power)),
        );

        let battery = if_changed(
            candidate.energy_storage_system.as_ref(),
            baseline.energy_storage_system.as_ref(),
            |ess| {
                let power = f64::from(ess.charge_power.max(ess.discharge_power).max(0.0));
                let energy = self.battery.cost(f64::from(ess.capacity));
                if energy > 0.0 {
                    energy + power * self.battery_power_per_kw
                } else {
                    0.0
                }
            },
        );

        let solar = candidate
            .solar_panels
            .iter()
            .enumerate()
            .filter(|(i, p)| baseline.solar_panels.get(*i) != Some(*p))
            .map(|(_, p)| self.solar.cost(f64::from(p.yield_scalar)))
            .sum();

        let ev_chargers = match &candidate.electric_vehicles {
            Some(ev) => {
                let base = baseline
                    .electric_vehicles
                    .as_ref()
                    .map_or([0; 4], charger_counts);
                charger_counts(ev)
                    .iter()
                    .zip(base)
                    .zip(self.ev_chargers)
                    .map(|((&n, b), unit)| f64::from(n.saturating_sub(b)) * unit)
                    .sum()
            }
            None => 0.0,
        };

        let hot_water = if_changed(
            candidate.domestic_hot_water.as_ref(),
            baseline.domestic_hot_water.as_ref(),
            |dhw| self.hot_water.cost(f64::from(dhw.cylinder_volume)),
        );

        let gas_heater = if_changed(
            candidate.gas_heater.as_ref(),
            baseline.gas_heater.as_ref(),
            |g| self.gas_heater.cost(f64::from(g.maximum_output)),
        );

        let grid = match &candidate.grid {
            Some(g) => {
                let base_kw = baseline.grid.as_ref().map_or(0.0, |b| b.grid_import);
                f64::from((g.grid_import - base_kw).max(0.0)) * self.grid_upgrade_per_kw
            }
            None => 0.0,
        };

        let fabric_index = |t: &TaskData| {
            t.building
                .as_ref()
                .map_or(0, |b| b.fabric_intervention_index)
        };
        let fabric = if fabric_index(candidate) != fabric_index(baseline) {
            fabric.capex()
        } else {
            0.0
        };

        CapexBreakdown {
            heat_pump,
            battery,
            solar,
            ev_chargers,
            hot_water,
            gas_heater,
            grid,
            fabric,
        }
    }

    /// Capital recovery factor: converts capex into an equal annual payment.
    pub fn annuity_factor(&self) -> f64 {
        let n = f64::from(self.lifetime_years.max(1));
        let r = self.discount_rate;
        if r.abs() < 1e-12 {
            1.0 / n
        } else {
            r / (1.0 - (1.0 + r).powf(-n))
        }
    }

    /// Present value of a constant annual amount over the lifetime.
    pub fn present_value(&self, annual: f64) -> f64 {
        (1..=self.lifetime_years)
            .map(|y| annual / (1.0 + self.discount_rate).powi(y as i32))
            .sum()
    }

    /// Standing charges over `days` for whichever meters `task` needs.
    pub fn meter_cost(&self, task: &TaskData, days: f64) -> f64 {
        let electricity = if task.grid.is_some() {
            self.electricity_standing_charge
        } else {
            0.0
        };
        let gas = if task.gas_heater.is_some() {
            self.gas_standing_charge
        } else {
            0.0
        };
        (electricity + gas) * days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{ElectricVehicles, EnergyStorageSystem, Grid, HeatPump, SolarPanel};
    use approx::assert_relative_eq;

    #[test]
    fn baseline_costs_nothing() {
        let model = CostModel::default();
        let base = TaskData {
            grid: Some(Grid::default()),
            heat_pump: Some(HeatPump {
                heat_power: 8.0,
                ..HeatPump::default()
            }),
            solar_panels: vec![SolarPanel {
                yield_scalar: 4.0,
                yield_index: 0,
            }],
            ..TaskData::default()
        };
        let capex = model.capex(&base, &base, &FabricModel::none());
        assert_eq!(capex.total(), 0.0);
    }

    #[test]
    fn new_components_are_costed() {
        let model = CostModel::default();
        let base = TaskData::default();
        let cand = TaskData {
            energy_storage_system: Some(EnergyStorageSystem {
                capacity: 10.0,
                charge_power: 5.0,
                discharge_power: 4.0,
                ..EnergyStorageSystem::default()
            }),
            solar_panels: vec![SolarPanel {
                yield_scalar: 6.0,
                yield_index: 0,
            }],
            ..TaskData::default()
        };
        let capex = model.capex(&cand, &base, &FabricModel::none());
        assert_eq!(capex.battery, 1_000.0 + 4_000.0 + 750.0);
        assert_eq!(capex.solar, 1_500.0 + 6_000.0);
    }

    #[test]
    fn chargers_and_grid_costed_on_increase() {
        let model = CostModel::default();
        let base = TaskData {
            grid: Some(Grid::default()),
            electric_vehicles: Some(ElectricVehicles {
                fast_chargers: 2,
                ..ElectricVehicles::default()
            }),
            ..TaskData::default()
        };
        let cand = TaskData {
            grid: Some(Grid {
                grid_import: 130.0,
                ..Grid::default()
            }),
            electric_vehicles: Some(ElectricVehicles {
                fast_chargers: 3,
                small_chargers: 1,
                ..ElectricVehicles::default()
            }),
            ..TaskData::default()
        };
        let capex = model.capex(&cand, &base, &FabricModel::none());
        assert_eq!(capex.ev_chargers, 3_000.0 + 1_200.0);
        assert_eq!(capex.grid, 30.0 * 200.0);
    }

    #[test]
    fn annuity_matches_closed_form() {
        let model = CostModel {
            discount_rate: 0.05,
            lifetime_years: 10,
            ..CostModel::default()
        };
        assert_relative_eq!(model.annuity_factor(), 0.129_504_6, epsilon = 1e-6);
        assert_relative_eq!(model.present_value(1.0) * model.annuity_factor(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_rate_annuity_is_straight_line() {
        let model = CostModel {
            discount_rate: 0.0,
            lifetime_years: 20,
            ..CostModel::default()
        };
        assert_eq!(model.annuity_factor(), 0.05);
        assert_eq!(model.present_value(100.0), 2_000.0);
    }

    #[test]
    fn standing_charges_follow_meters() {
        let model = CostModel::default();
        let task = TaskData {
            grid: Some(Grid::default()),
            ..TaskData::default()
        };
        assert_relative_eq!(model.meter_cost(&task, 10.0), 6.0);
        assert_eq!(model.meter_cost(&TaskData::default(), 10.0), 0.0);
    }
}
