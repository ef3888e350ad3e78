use crate::task::ElectricVehicles;

/// Charger power ratings (kW): small, fast, rapid, ultra.
pub const CHARGER_KW: [f32; 4] = [7.0, 22.0, 50.0, 150.0];

/// Charger counts in [`CHARGER_KW`] order.
pub fn charger_counts(ev: &ElectricVehicles) -> [u32; 4] {
    [
        ev.small_chargers,
        ev.fast_chargers,
        ev.rapid_chargers,
        ev.ultra_chargers,
    ]
}

/// EV demand met in one timestep (kWh).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvStep {
    /// Scaled demand arriving this step.
    pub demand: f32,
    /// Inflexible demand served immediately.
    pub served: f32,
    /// Inflexible demand beyond charger capacity.
    pub shortfall: f32,
}

/// Site EV charging with a deferrable backlog.
///
/// Each step splits demand into an inflexible part, served at once within
/// charger capacity, and a flexible part that joins a backlog carried
/// across timesteps. The caller decides how much energy the backlog may use
/// each step (surplus generation, plus grid import when the tariff is
/// cheap). Whatever is still queued when the horizon ends counts as
/// shortfall.
#[derive(Debug, Clone)]
pub struct EvCharger {
    /// Combined charger energy per timestep (kWh).
    capacity_kwh: f32,

    /// Fraction of demand that can be deferred (0.0–1.0).
    pub flexible_ratio: f32,

    /// Multiplier applied to the site EV series.
    scalar: f32,

    /// Deferred demand not yet delivered (kWh).
    pub backlog_kwh: f32,

    /// Charger energy still free in the current step (kWh).
    room_kwh: f32,
}

impl EvCharger {
    /// Creates the charging model from its configuration.
    ///
    /// # Arguments
    ///
    /// * `ev` - Charger counts and flexibility
    /// * `dt_hours` - Timestep length
    pub fn new(ev: &ElectricVehicles, dt_hours: f32) -> Self {
        let kw: f32 = charger_counts(ev)
            .iter()
            .zip(CHARGER_KW)
            .map(|(&n, rating)| n as f32 * rating)
            .sum();
        Self {
            capacity_kwh: kw * dt_hours,
            flexible_ratio: ev.flexible_load_ratio.clamp(0.0, 1.0),
            scalar: ev.scalar_electrical_load.max(0.0),
            backlog_kwh: 0.0,
            room_kwh: 0.0,
        }
    }

    /// Starts a timestep with raw site demand `demand_kwh`.
    ///
    /// Serves the inflexible share up to charger capacity and queues the
    /// flexible share.
    pub fn begin_step(&mut self, demand_kwh: f32) -> EvStep {
        let demand = demand_kwh.max(0.0) * self.scalar;
        let inflexible = demand * (1.0 - self.flexible_ratio);
        self.backlog_kwh += demand - inflexible;

        let served = inflexible.min(self.capacity_kwh);
        self.room_kwh = self.capacity_kwh - served;
        EvStep {
            demand,
            served,
            shortfall: inflexible - served,
        }
    }

    /// Serves queued flexible demand from at most `available_kwh` and
    /// returns the energy delivered.
    pub fn serve_backlog(&mut self, available_kwh: f32) -> f32 {
        let served = self
            .backlog_kwh
            .min(self.room_kwh)
            .min(available_kwh.max(0.0));
        self.backlog_kwh -= served;
        self.room_kwh -= served;
        served
    }

    /// Ends the horizon and returns the undelivered backlog.
    pub fn finish(&mut self) -> f32 {
        std::mem::take(&mut self.backlog_kwh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn charger(fast: u32, ratio: f32) -> EvCharger {
        EvCharger::new(
            &ElectricVehicles {
                flexible_load_ratio: ratio,
                fast_chargers: fast,
                ..ElectricVehicles::default()
            },
            0.5,
        )
    }

    #[test]
    fn capacity_sums_chargers() {
        let ev = EvCharger::new(
            &ElectricVehicles {
                small_chargers: 2,
                ultra_chargers: 1,
                ..ElectricVehicles::default()
            },
            1.0,
        );
        assert_eq!(ev.capacity_kwh, 164.0);
    }

    #[test]
    fn inflexible_demand_served_immediately() {
        let mut ev = charger(1, 0.0);
        let step = ev.begin_step(8.0);
        assert_eq!(step.served, 8.0);
        assert_eq!(step.shortfall, 0.0);
        assert_eq!(ev.backlog_kwh, 0.0);
    }

    #[test]
    fn over_capacity_is_shortfall() {
        // One 22 kW charger at half-hour steps delivers 11 kWh.
        let mut ev = charger(1, 0.0);
        let step = ev.begin_step(15.0);
        assert_eq!(step.served, 11.0);
        assert_eq!(step.shortfall, 4.0);
    }

    #[test]
    fn flexible_served_from_available_energy() {
        let mut ev = charger(1, 0.5);
        let step = ev.begin_step(10.0);
        assert_eq!(step.served, 5.0);
        assert_eq!(ev.serve_backlog(0.0), 0.0);
        assert_eq!(ev.serve_backlog(2.0), 2.0);
        // Remaining capacity this step: 11 - 5 - 2 = 4, backlog 3.
        assert_eq!(ev.serve_backlog(100.0), 3.0);
        assert_eq!(ev.finish(), 0.0);
    }

    #[test]
    fn backlog_left_at_end_is_returned() {
        let mut ev = charger(1, 1.0);
        ev.begin_step(6.0);
        ev.begin_step(6.0);
        assert_relative_eq!(ev.finish(), 12.0);
        assert_eq!(ev.backlog_kwh, 0.0);
    }

    #[test]
    fn no_chargers_means_all_inflexible_is_shortfall() {
        let mut ev = charger(0, 0.25);
        let step = ev.begin_step(4.0);
        assert_eq!(step.served, 0.0);
        assert_eq!(step.shortfall, 3.0);
        assert_eq!(ev.serve_backlog(100.0), 0.0);
        assert_eq!(ev.finish(), 1.0);
    }
}
