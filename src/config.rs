//! TOML-based scenario configuration and preset definitions.
//!
//! A scenario describes a synthetic site, the configuration the site runs
//! today (its baseline), the cost assumptions, the search strategy and the
//! parameter ranges to explore.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SimError;
use crate::optimiser::{
    GeneticConfig, GridSearchConfig, Nsga2Config, Objective, ParameterRange, ParameterSpace,
    Selection, StrategyConfig,
};
use crate::sim::CostModel;
use crate::site::synthetic::SiteProfile;
use crate::task::{Building, GasHeater, Grid, TaskData};

/// Top-level scenario configuration parsed from TOML.
///
/// Missing sections take their values from [`ScenarioConfig::baseline`].
/// Load from TOML with [`ScenarioConfig::from_toml_file`] or pick a
/// built-in preset with [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Global run settings.
    pub simulation: SimulationConfig,
    /// Synthetic site waveforms.
    pub profile: SiteProfile,
    /// Configuration the site runs today.
    pub baseline: TaskData,
    /// Capital costs, standing charges and discounting.
    pub cost_model: CostModel,
    /// Objectives and search strategy.
    pub optimiser: OptimiserConfig,
    /// Parameter ranges, keyed by dotted configuration path.
    pub parameters: ParameterSpace,
}

/// Global run settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Seed of the synthetic site generator.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// Objectives and search strategy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimiserConfig {
    pub objectives: Vec<Objective>,
    pub strategy: StrategyConfig,
}

impl Default for OptimiserConfig {
    fn default() -> Self {
        Self {
            objectives: vec![Objective::CostBalance, Objective::CombinedCarbonBalance],
            strategy: StrategyConfig::Nsga2(Nsga2Config {
                population_size: 20,
                generations: 10,
                ..Nsga2Config::default()
            }),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"profile.days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e.to_string())
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Grid-connected building heated by a gas boiler.
fn gas_heated_building() -> TaskData {
    TaskData {
        building: Some(Building::default()),
        grid: Some(Grid::default()),
        gas_heater: Some(GasHeater::default()),
        ..TaskData::default()
    }
}

impl ScenarioConfig {
    /// Gas-heated building; searches solar and battery size for cost and
    /// carbon.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            profile: SiteProfile::default(),
            baseline: gas_heated_building(),
            cost_model: CostModel::default(),
            optimiser: OptimiserConfig::default(),
            parameters: ParameterSpace::new()
                .with(
                    "solar_panels[0].yield_scalar",
                    ParameterRange::new(0.0, 40.0, 10.0),
                )
                .with(
                    "energy_storage_system.capacity",
                    ParameterRange::new(0.0, 60.0, 20.0),
                )
                .with(
                    "energy_storage_system.charge_power",
                    ParameterRange::fixed(25.0),
                )
                .with(
                    "energy_storage_system.discharge_power",
                    ParameterRange::fixed(25.0),
                ),
        }
    }

    /// Exhaustive battery sizing on the economy tariff for the lowest
    /// annualised cost.
    pub fn battery_sizing() -> Self {
        let mut baseline = gas_heated_building();
        if let Some(grid) = baseline.grid.as_mut() {
            grid.tariff_index = 1;
        }
        Self {
            baseline,
            optimiser: OptimiserConfig {
                objectives: vec![Objective::AnnualisedCost],
                strategy: StrategyConfig::GridSearch(GridSearchConfig::default()),
            },
            parameters: ParameterSpace::new()
                .with(
                    "energy_storage_system.capacity",
                    ParameterRange::new(0.0, 100.0, 20.0),
                )
                .with(
                    "energy_storage_system.charge_power",
                    ParameterRange::new(10.0, 50.0, 20.0),
                )
                .with(
                    "energy_storage_system.discharge_power",
                    ParameterRange::new(10.0, 50.0, 20.0),
                )
                .with(
                    "energy_storage_system.battery_mode",
                    ParameterRange::new(0.0, 1.0, 1.0),
                ),
            ..Self::baseline()
        }
    }

    /// Replacing the boiler with a heat pump and fabric retrofit under a
    /// capex limit, trading annualised cost against carbon.
    pub fn heat_decarbonisation() -> Self {
        let mut baseline = gas_heated_building();
        baseline.config.capex_limit = 150_000.0;
        Self {
            profile: SiteProfile {
                mean_air_temp: 3.0,
                ..SiteProfile::default()
            },
            baseline,
            optimiser: OptimiserConfig {
                objectives: vec![
                    Objective::AnnualisedCost,
                    Objective::CombinedCarbonBalance,
                ],
                strategy: StrategyConfig::GeneticAlgorithm(GeneticConfig {
                    population_size: 24,
                    generations: 15,
                    selection: Selection::Rank,
                    weights: vec![1.0, 0.5],
                    ..GeneticConfig::default()
                }),
            },
            parameters: ParameterSpace::new()
                .with("heat_pump.heat_power", ParameterRange::new(0.0, 80.0, 10.0))
                .with(
                    "heat_pump.send_temperature",
                    ParameterRange::new(45.0, 65.0, 10.0),
                )
                .with(
                    "building.fabric_intervention_index",
                    ParameterRange::new(0.0, 2.0, 1.0),
                )
                .with(
                    "domestic_hot_water.cylinder_volume",
                    ParameterRange::new(100.0, 300.0, 100.0),
                ),
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "battery_sizing", "heat_decarbonisation"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "battery_sizing" => Ok(Self::battery_sizing()),
            "heat_decarbonisation" => Ok(Self::heat_decarbonisation()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let p = &self.profile;
        if p.days == 0 {
            errors.push(ConfigError::new("profile.days", "must be > 0"));
        }
        if p.steps_per_day == 0 {
            errors.push(ConfigError::new("profile.steps_per_day", "must be > 0"));
        }
        if !(0.0..=24.0).contains(&p.sunrise_hour) || p.sunrise_hour >= p.sunset_hour {
            errors.push(ConfigError::new(
                "profile.sunrise_hour",
                "must be in [0, 24) and before profile.sunset_hour",
            ));
        }
        if p.sunset_hour > 24.0 {
            errors.push(ConfigError::new("profile.sunset_hour", "must be <= 24"));
        }
        if p.tariffs.is_empty() {
            errors.push(ConfigError::new("profile.tariffs", "at least one tariff is required"));
        }
        for (i, f) in p.fabric.iter().enumerate() {
            if !(0.0..=1.0).contains(&f.heat_reduction) {
                errors.push(ConfigError::new(
                    format!("profile.fabric[{i}].heat_reduction"),
                    "must be in [0.0, 1.0]",
                ));
            }
        }

        let b = &self.baseline;
        if let Some(grid) = &b.grid {
            if grid.tariff_index >= p.tariffs.len() {
                errors.push(ConfigError::new(
                    "baseline.grid.tariff_index",
                    format!("must be < {} (number of tariffs)", p.tariffs.len()),
                ));
            }
        }
        if let Some(building) = &b.building {
            if building.fabric_intervention_index > p.fabric.len() {
                errors.push(ConfigError::new(
                    "baseline.building.fabric_intervention_index",
                    format!("must be <= {} (number of fabric options)", p.fabric.len()),
                ));
            }
        }
        for (i, panel) in b.solar_panels.iter().enumerate() {
            if panel.yield_index >= p.solar_orientations.len() {
                errors.push(ConfigError::new(
                    format!("baseline.solar_panels[{i}].yield_index"),
                    format!(
                        "must be < {} (number of solar orientations)",
                        p.solar_orientations.len()
                    ),
                ));
            }
        }

        let c = &self.cost_model;
        if c.discount_rate <= -1.0 || !c.discount_rate.is_finite() {
            errors.push(ConfigError::new("cost_model.discount_rate", "must be > -1"));
        }
        if c.lifetime_years == 0 {
            errors.push(ConfigError::new("cost_model.lifetime_years", "must be > 0"));
        }

        let o = &self.optimiser;
        if o.objectives.is_empty() {
            errors.push(ConfigError::new(
                "optimiser.objectives",
                "at least one objective is required",
            ));
        }
        match &o.strategy {
            StrategyConfig::GridSearch(g) => {
                if g.chunk_size == 0 {
                    errors.push(ConfigError::new("optimiser.strategy.chunk_size", "must be > 0"));
                }
            }
            StrategyConfig::GeneticAlgorithm(g) => {
                check_population(&mut errors, g.population_size, g.crossover_probability);
                if !g.weights.is_empty() && g.weights.len() != o.objectives.len() {
                    errors.push(ConfigError::new(
                        "optimiser.strategy.weights",
                        "must have one weight per objective",
                    ));
                }
            }
            StrategyConfig::Nsga2(n) => {
                check_population(&mut errors, n.population_size, n.crossover_probability);
            }
        }

        let solar_profiles = self.profile.solar_orientations.len();
        if let Err(e) = self.parameters.validate(&self.baseline, solar_profiles) {
            errors.push(ConfigError::new("parameters", e.to_string()));
        }
        if self.parameters.size().is_none() {
            errors.push(ConfigError::new("parameters", "grid is too large to enumerate"));
        }

        errors
    }
}

fn check_population(errors: &mut Vec<ConfigError>, population_size: usize, crossover: f64) {
    if population_size < 2 {
        errors.push(ConfigError::new(
            "optimiser.strategy.population_size",
            "must be >= 2",
        ));
    }
    if !(0.0..=1.0).contains(&crossover) {
        errors.push(ConfigError::new(
            "optimiser.strategy.crossover_probability",
            "must be in [0.0, 1.0]",
        ));
    }
}
