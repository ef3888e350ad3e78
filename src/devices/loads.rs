use crate::task::{DataCentre, OtherLoad};

/// Constant data-centre load.
#[derive(Debug, Clone, Copy)]
pub struct DataCentreLoad {
    per_step_kwh: f32,
    /// Hot-room air temperature (°C).
    pub hotroom_temp: f32,
}

impl DataCentreLoad {
    /// Creates the load for timesteps of `dt_hours`.
    pub fn new(dc: &DataCentre, dt_hours: f32) -> Self {
        Self {
            per_step_kwh: dc.maximum_load.max(0.0) * dt_hours,
            hotroom_temp: dc.hotroom_temp,
        }
    }

    /// Demand per step (kWh).
    pub fn demand(&self) -> f32 {
        self.per_step_kwh
    }
}

/// Mop-up load soaking up surplus generation.
#[derive(Debug, Clone, Copy)]
pub struct MopUpLoad {
    max_kwh: f32,
}

impl MopUpLoad {
    /// Creates the load for timesteps of `dt_hours`.
    pub fn new(other: &OtherLoad, dt_hours: f32) -> Self {
        Self {
            max_kwh: other.maximum_load.max(0.0) * dt_hours,
        }
    }

    /// Takes up to its maximum from `surplus_kwh`.
    pub fn absorb(&self, surplus_kwh: f32) -> f32 {
        surplus_kwh.max(0.0).min(self.max_kwh)
    }
}
