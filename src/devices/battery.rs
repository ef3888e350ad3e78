use crate::task::{BatteryMode, EnergyStorageSystem};

/// One-way charging efficiency.
pub const CHARGE_EFFICIENCY: f32 = 0.95;
/// One-way discharging efficiency.
pub const DISCHARGE_EFFICIENCY: f32 = 0.95;

/// Tariff position of the current timestep relative to its day.
#[derive(Debug, Clone, Copy)]
pub struct TariffSignal {
    /// Import price this step (£/kWh).
    pub price: f32,
    /// Mean import price of the day.
    pub day_average: f32,
    /// Low-percentile import price of the day.
    pub day_percentile: f32,
}

impl TariffSignal {
    /// Signal for a site without a grid connection: never cheap, always
    /// dear enough to discharge.
    pub fn off_grid() -> Self {
        Self {
            price: 0.0,
            day_average: 0.0,
            day_percentile: f32::NEG_INFINITY,
        }
    }

    /// Price is at or below the day's low percentile.
    pub fn is_cheap(&self) -> bool {
        self.price <= self.day_percentile
    }

    /// Price is at or above the day's mean.
    pub fn is_dear(&self) -> bool {
        self.price >= self.day_average
    }
}

/// Energy moved by the battery in one timestep (kWh at the bus).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatteryFlow {
    /// Energy taken from on-site surplus.
    pub charged_from_surplus: f32,
    /// Energy taken from the grid.
    pub charged_from_grid: f32,
    /// Energy delivered into the site deficit.
    pub discharged: f32,
}

/// A stationary battery with stored energy carried between timesteps.
///
/// All quantities are energies per timestep; power limits are converted
/// with the timestep length on construction.
///
/// # Bus convention
/// Charging draws energy from the bus, discharging supplies it. Losses are
/// applied inside the battery so the bus always sees the exchanged energy.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Usable capacity (kWh).
    pub capacity_kwh: f32,

    /// Stored energy (kWh).
    pub stored_kwh: f32,

    /// Largest energy drawn from the bus in one step (kWh).
    max_charge_kwh: f32,

    /// Largest energy delivered to the bus in one step (kWh).
    max_discharge_kwh: f32,

    mode: BatteryMode,
}

impl Battery {
    /// Creates a battery from its configuration.
    ///
    /// Negative sizes are treated as zero and the initial charge is clamped
    /// into `[0, capacity]`.
    ///
    /// # Arguments
    ///
    /// * `ess` - Battery configuration
    /// * `dt_hours` - Timestep length
    pub fn new(ess: &EnergyStorageSystem, dt_hours: f32) -> Self {
        let capacity_kwh = ess.capacity.max(0.0);
        Self {
            capacity_kwh,
            stored_kwh: ess.initial_charge.clamp(0.0, capacity_kwh),
            max_charge_kwh: ess.charge_power.max(0.0) * dt_hours,
            max_discharge_kwh: ess.discharge_power.max(0.0) * dt_hours,
            mode: ess.battery_mode,
        }
    }

    /// Energy the battery could absorb from the bus this step.
    pub fn charge_room(&self) -> f32 {
        let headroom = (self.capacity_kwh - self.stored_kwh).max(0.0) / CHARGE_EFFICIENCY;
        self.max_charge_kwh.min(headroom)
    }

    /// Energy the battery could supply to the bus this step.
    pub fn discharge_room(&self) -> f32 {
        self.max_discharge_kwh.min(self.stored_kwh * DISCHARGE_EFFICIENCY)
    }

    /// Absorbs up to `offered_kwh` from the bus and returns the amount taken.
    pub fn charge(&mut self, offered_kwh: f32) -> f32 {
        let taken = offered_kwh.max(0.0).min(self.charge_room());
        self.stored_kwh = (self.stored_kwh + taken * CHARGE_EFFICIENCY).min(self.capacity_kwh);
        taken
    }

    /// Supplies up to `wanted_kwh` to the bus and returns the amount given.
    pub fn discharge(&mut self, wanted_kwh: f32) -> f32 {
        let given = wanted_kwh.max(0.0).min(self.discharge_room());
        self.stored_kwh = (self.stored_kwh - given / DISCHARGE_EFFICIENCY).max(0.0);
        given
    }

    /// Applies the dispatch policy for one timestep.
    ///
    /// `Consume` charges from surplus and discharges into deficit.
    /// `ConsumePlus` also tops up from the grid (up to `grid_room_kwh`) when
    /// the tariff is cheap, and holds its charge unless the tariff is dear.
    ///
    /// # Arguments
    ///
    /// * `surplus_kwh` - On-site generation not yet used
    /// * `deficit_kwh` - Site demand not yet met
    /// * `grid_room_kwh` - Import capacity still free this step
    /// * `tariff` - Price position of this step
    pub fn dispatch(
        &mut self,
        surplus_kwh: f32,
        deficit_kwh: f32,
        grid_room_kwh: f32,
        tariff: TariffSignal,
    ) -> BatteryFlow {
        let mut flow = BatteryFlow {
            charged_from_surplus: self.charge(surplus_kwh),
            ..BatteryFlow::default()
        };

        match self.mode {
            BatteryMode::Consume => {
                flow.discharged = self.discharge(deficit_kwh);
            }
            BatteryMode::ConsumePlus => {
                if tariff.is_cheap() {
                    // Surplus charging already used part of this step's power.
                    let power_left = (self.max_charge_kwh - flow.charged_from_surplus).max(0.0);
                    flow.charged_from_grid = self.charge(grid_room_kwh.min(power_left));
                } else if tariff.is_dear() {
                    flow.discharged = self.discharge(deficit_kwh);
                }
            }
        }
        flow
    }
}
