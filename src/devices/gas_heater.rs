use crate::task::{FuelType, GasHeater};

/// Heat and fuel for one boiler step (kWh).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoilerStep {
    /// Heat supplied.
    pub heat: f32,
    /// Fuel burnt.
    pub fuel: f32,
}

/// Fossil boiler with a fixed output ceiling and efficiency.
#[derive(Debug, Clone)]
pub struct Boiler {
    max_heat_kwh: f32,
    efficiency: f32,
    /// Fuel type, for scope 1 factors.
    pub fuel_type: FuelType,
    /// Fuel price (£/kWh).
    pub fuel_price: f32,
}

impl Boiler {
    /// Creates a boiler for timesteps of `dt_hours`.
    pub fn new(cfg: &GasHeater, dt_hours: f32) -> Self {
        Self {
            max_heat_kwh: cfg.maximum_output.max(0.0) * dt_hours,
            efficiency: cfg.boiler_efficiency,
            fuel_type: cfg.fuel_type,
            fuel_price: cfg.fuel_price,
        }
    }

    /// Burns fuel to meet up to `demand_kwh` of heat.
    ///
    /// A boiler with non-positive efficiency supplies nothing.
    pub fn burn(&self, demand_kwh: f32) -> BoilerStep {
        if self.efficiency <= 0.0 || demand_kwh <= 0.0 {
            return BoilerStep::default();
        }
        let heat = demand_kwh.min(self.max_heat_kwh);
        BoilerStep {
            heat,
            fuel: heat / self.efficiency,
        }
    }
}
