//! Candidate configurations: one point in the search space.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Most solar arrays a configuration may address by index.
pub const MAX_SOLAR_PANELS: usize = 64;

/// One candidate configuration of a site's energy system.
///
/// Each component is optional; `None` disables it so it contributes no load,
/// cost or carbon. Indices into site arrays are checked when the
/// configuration is simulated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskData {
    /// Task-wide settings.
    pub config: TaskConfig,
    /// Building load scaling and fabric intervention selection.
    pub building: Option<Building>,
    /// Constant data-centre load with a hot-room heat source.
    pub data_centre: Option<DataCentre>,
    /// Hot water cylinder buffering domestic hot water demand.
    pub domestic_hot_water: Option<DomesticHotWater>,
    /// EV charging infrastructure.
    pub electric_vehicles: Option<ElectricVehicles>,
    /// Stationary battery.
    pub energy_storage_system: Option<EnergyStorageSystem>,
    /// Fossil boiler.
    pub gas_heater: Option<GasHeater>,
    /// Grid connection and import tariff selection.
    pub grid: Option<Grid>,
    /// Heat pump.
    pub heat_pump: Option<HeatPump>,
    /// Mop-up load absorbing surplus generation.
    pub other_load: Option<OtherLoad>,
    /// Solar arrays; empty means no solar.
    pub solar_panels: Vec<SolarPanel>,
}

/// Task-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskConfig {
    /// Maximum capital expenditure (£) a candidate may incur.
    pub capex_limit: f64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            capex_limit: f64::MAX,
        }
    }
}

/// Building load scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Building {
    /// Multiplier applied to the site's electrical load series.
    pub scalar_electrical_load: f32,
    /// Multiplier applied to the site's heat load series.
    pub scalar_heat_load: f32,
    /// `0` for no intervention, otherwise `i` selects intervention `i - 1`.
    pub fabric_intervention_index: usize,
}

impl Default for Building {
    fn default() -> Self {
        Self {
            scalar_electrical_load: 1.0,
            scalar_heat_load: 1.0,
            fabric_intervention_index: 0,
        }
    }
}

/// Constant data-centre load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataCentre {
    /// Continuous electrical load (kW).
    pub maximum_load: f32,
    /// Hot-room air temperature available to a hot-room heat pump (°C).
    pub hotroom_temp: f32,
}

impl Default for DataCentre {
    fn default() -> Self {
        Self {
            maximum_load: 0.0,
            hotroom_temp: 43.0,
        }
    }
}

/// Hot water cylinder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DomesticHotWater {
    /// Cylinder volume in litres.
    pub cylinder_volume: f32,
}

impl Default for DomesticHotWater {
    fn default() -> Self {
        Self {
            cylinder_volume: 100.0,
        }
    }
}

/// EV charging infrastructure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElectricVehicles {
    /// Fraction of EV demand that can be deferred (0.0–1.0).
    pub flexible_load_ratio: f32,
    /// Number of 7 kW chargers.
    pub small_chargers: u32,
    /// Number of 22 kW chargers.
    pub fast_chargers: u32,
    /// Number of 50 kW chargers.
    pub rapid_chargers: u32,
    /// Number of 150 kW chargers.
    pub ultra_chargers: u32,
    /// Multiplier applied to the site's EV load series.
    pub scalar_electrical_load: f32,
}

impl Default for ElectricVehicles {
    fn default() -> Self {
        Self {
            flexible_load_ratio: 0.5,
            small_chargers: 0,
            fast_chargers: 0,
            rapid_chargers: 0,
            ultra_chargers: 0,
            scalar_electrical_load: 1.0,
        }
    }
}

/// Battery dispatch policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryMode {
    /// Charge only from surplus generation, discharge into any deficit.
    #[default]
    Consume,
    /// As `Consume`, plus tariff-aware grid charging and discharge gating.
    ConsumePlus,
}

/// Stationary battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnergyStorageSystem {
    /// Usable capacity (kWh).
    pub capacity: f32,
    /// Maximum charging power (kW).
    pub charge_power: f32,
    /// Maximum discharging power (kW).
    pub discharge_power: f32,
    /// Dispatch policy.
    pub battery_mode: BatteryMode,
    /// Stored energy at the start of the horizon (kWh).
    pub initial_charge: f32,
}

impl Default for EnergyStorageSystem {
    fn default() -> Self {
        Self {
            capacity: 0.0,
            charge_power: 0.0,
            discharge_power: 0.0,
            battery_mode: BatteryMode::Consume,
            initial_charge: 0.0,
        }
    }
}

/// Boiler fuel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    /// Mains natural gas.
    #[default]
    NaturalGas,
    /// Bottled or bulk LPG.
    LiquidPetroleumGas,
}

impl FuelType {
    /// Scope 1 emission factor in kg CO2e per kWh of fuel.
    pub fn emission_factor(self) -> f64 {
        match self {
            Self::NaturalGas => 0.18293,
            Self::LiquidPetroleumGas => 0.21449,
        }
    }
}

/// Fossil boiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GasHeater {
    /// Maximum heat output (kW).
    pub maximum_output: f32,
    /// Heat delivered per unit of fuel energy (0.0–1.0].
    pub boiler_efficiency: f32,
    /// Fuel burnt.
    pub fuel_type: FuelType,
    /// Fuel price (£/kWh).
    pub fuel_price: f32,
}

impl Default for GasHeater {
    fn default() -> Self {
        Self {
            maximum_output: 40.0,
            boiler_efficiency: 0.9,
            fuel_type: FuelType::NaturalGas,
            fuel_price: 0.068,
        }
    }
}

/// Grid connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Grid {
    /// Import capacity (kW).
    pub grid_import: f32,
    /// Export capacity (kW).
    pub grid_export: f32,
    /// Fraction of import capacity held in reserve (0.0–1.0).
    pub import_headroom: f32,
    /// Fraction of export capacity held in reserve (0.0–1.0).
    pub export_headroom: f32,
    /// Index into the site's import tariff series.
    pub tariff_index: usize,
    /// Price paid for exported energy (£/kWh).
    pub export_tariff: f32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            grid_import: 100.0,
            grid_export: 100.0,
            import_headroom: 0.0,
            export_headroom: 0.0,
            tariff_index: 0,
            export_tariff: 0.05,
        }
    }
}

/// Heat pump heat source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatSource {
    /// Outdoor air.
    #[default]
    Ambient,
    /// Exhaust air of the data-centre hot room.
    Hotroom,
}

/// Heat pump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeatPump {
    /// Rated heat output (kW).
    pub heat_power: f32,
    /// Air source.
    pub heat_source: HeatSource,
    /// Flow temperature (°C).
    pub send_temperature: f32,
}

impl Default for HeatPump {
    fn default() -> Self {
        Self {
            heat_power: 0.0,
            heat_source: HeatSource::Ambient,
            send_temperature: 50.0,
        }
    }
}

/// Mop-up load that consumes surplus generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OtherLoad {
    /// Maximum absorbed power (kW).
    pub maximum_load: f32,
}

/// One solar array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarPanel {
    /// Installed peak capacity (kWp).
    pub yield_scalar: f32,
    /// Index into the site's solar yield profiles.
    pub yield_index: usize,
}

impl TaskData {
    /// Sets a named parameter, enabling the owning component with its
    /// defaults when it is currently disabled.
    ///
    /// Names follow `component.field`, with solar arrays addressed as
    /// `solar_panels[i].field`. Integer fields take the rounded value;
    /// two-way enums (battery mode, heat source, fuel type) map 0 to the
    /// first variant and anything else to the second.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownParameter` if the name maps onto no field,
    /// and `SimError::IndexOutOfRange` for a solar array index at or past
    /// [`MAX_SOLAR_PANELS`].
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), SimError> {
        let v = value as f32;
        let idx = value.round().max(0.0) as usize;
        let count = value.round().max(0.0) as u32;

        if let Some(rest) = name.strip_prefix("solar_panels[") {
            let (i, field) = rest
                .split_once("].")
                .ok_or_else(|| SimError::UnknownParameter(name.to_string()))?;
            let i: usize = i
                .parse()
                .map_err(|_| SimError::UnknownParameter(name.to_string()))?;
            if i >= MAX_SOLAR_PANELS {
                return Err(SimError::IndexOutOfRange {
                    field: "solar_panels",
                    index: i,
                    len: MAX_SOLAR_PANELS,
                });
            }
            if self.solar_panels.len() <= i {
                self.solar_panels.resize_with(i + 1, SolarPanel::default);
            }
            let panel = &mut self.solar_panels[i];
            match field {
                "yield_scalar" => panel.yield_scalar = v,
                "yield_index" => panel.yield_index = idx,
                _ => return Err(SimError::UnknownParameter(name.to_string())),
            }
            return Ok(());
        }

        let (component, field) = name
            .split_once('.')
            .ok_or_else(|| SimError::UnknownParameter(name.to_string()))?;
        let unknown = || SimError::UnknownParameter(name.to_string());

        match component {
            "config" => match field {
                "capex_limit" => self.config.capex_limit = value,
                _ => return Err(unknown()),
            },
            "building" => {
                let b = self.building.get_or_insert_with(Building::default);
                match field {
                    "scalar_electrical_load" => b.scalar_electrical_load = v,
                    "scalar_heat_load" => b.scalar_heat_load = v,
                    "fabric_intervention_index" => b.fabric_intervention_index = idx,
                    _ => return Err(unknown()),
                }
            }
            "data_centre" => {
                let d = self.data_centre.get_or_insert_with(DataCentre::default);
                match field {
                    "maximum_load" => d.maximum_load = v,
                    "hotroom_temp" => d.hotroom_temp = v,
                    _ => return Err(unknown()),
                }
            }
            "domestic_hot_water" => {
                let d = self
                    .domestic_hot_water
                    .get_or_insert_with(DomesticHotWater::default);
                match field {
                    "cylinder_volume" => d.cylinder_volume = v,
                    _ => return Err(unknown()),
                }
            }
            "electric_vehicles" => {
                let e = self
                    .electric_vehicles
                    .get_or_insert_with(ElectricVehicles::default);
                match field {
                    "flexible_load_ratio" => e.flexible_load_ratio = v,
                    "small_chargers" => e.small_chargers = count,
                    "fast_chargers" => e.fast_chargers = count,
                    "rapid_chargers" => e.rapid_chargers = count,
                    "ultra_chargers" => e.ultra_chargers = count,
                    "scalar_electrical_load" => e.scalar_electrical_load = v,
                    _ => return Err(unknown()),
                }
            }
            "energy_storage_system" => {
                let e = self
                    .energy_storage_system
                    .get_or_insert_with(EnergyStorageSystem::default);
                match field {
                    "capacity" => e.capacity = v,
                    "charge_power" => e.charge_power = v,
                    "discharge_power" => e.discharge_power = v,
                    "initial_charge" => e.initial_charge = v,
                    "battery_mode" => {
                        e.battery_mode = if idx == 0 {
                            BatteryMode::Consume
                        } else {
                            BatteryMode::ConsumePlus
                        }
                    }
                    _ => return Err(unknown()),
                }
            }
            "gas_heater" => {
                let g = self.gas_heater.get_or_insert_with(GasHeater::default);
                match field {
                    "maximum_output" => g.maximum_output = v,
                    "boiler_efficiency" => g.boiler_efficiency = v,
                    "fuel_price" => g.fuel_price = v,
                    "fuel_type" => {
                        g.fuel_type = if idx == 0 {
                            FuelType::NaturalGas
                        } else {
                            FuelType::LiquidPetroleumGas
                        }
                    }
                    _ => return Err(unknown()),
                }
            }
            "grid" => {
                let g = self.grid.get_or_insert_with(Grid::default);
                match field {
                    "grid_import" => g.grid_import = v,
                    "grid_export" => g.grid_export = v,
                    "import_headroom" => g.import_headroom = v,
                    "export_headroom" => g.export_headroom = v,
                    "tariff_index" => g.tariff_index = idx,
                    "export_tariff" => g.export_tariff = v,
                    _ => return Err(unknown()),
                }
            }
            "heat_pump" => {
                let h = self.heat_pump.get_or_insert_with(HeatPump::default);
                match field {
                    "heat_power" => h.heat_power = v,
                    "send_temperature" => h.send_temperature = v,
                    "heat_source" => {
                        h.heat_source = if idx == 0 {
                            HeatSource::Ambient
                        } else {
                            HeatSource::Hotroom
                        }
                    }
                    _ => return Err(unknown()),
                }
            }
            "other_load" => {
                let o = self.other_load.get_or_insert_with(OtherLoad::default);
                match field {
                    "maximum_load" => o.maximum_load = v,
                    _ => return Err(unknown()),
                }
            }
            _ => return Err(unknown()),
        }
        Ok(())
    }
}
