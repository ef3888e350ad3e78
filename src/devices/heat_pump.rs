use crate::precompute::TemperatureLookup;
use crate::task::HeatSource;

/// Heat delivered and electricity drawn by the heat pump in one step (kWh).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeatPumpStep {
    /// Heat supplied.
    pub heat: f32,
    /// Electricity consumed.
    pub electricity: f32,
}

/// Heat pump operating at part load against a temperature lookup.
#[derive(Debug, Clone)]
pub struct HeatPump<'a> {
    rated_kw: f32,
    source: HeatSource,
    /// Source temperature used in `Hotroom` mode.
    hotroom_temp: Option<f32>,
    lookup: &'a TemperatureLookup,
}

impl<'a> HeatPump<'a> {
    /// Creates a heat pump.
    ///
    /// A `Hotroom` source without a data centre falls back to ambient air.
    ///
    /// # Arguments
    ///
    /// * `rated_kw` - Rated heat output
    /// * `source` - Source air
    /// * `hotroom_temp` - Data-centre hot-room temperature, if any
    /// * `lookup` - Performance at the configured send temperature
    pub fn new(
        rated_kw: f32,
        source: HeatSource,
        hotroom_temp: Option<f32>,
        lookup: &'a TemperatureLookup,
    ) -> Self {
        Self {
            rated_kw: rated_kw.max(0.0),
            source,
            hotroom_temp,
            lookup,
        }
    }

    /// Source temperature for the current step.
    fn source_temp(&self, air_temp: f32) -> f32 {
        match (self.source, self.hotroom_temp) {
            (HeatSource::Hotroom, Some(t)) => t,
            _ => air_temp,
        }
    }

    /// Maximum heat and matching electricity this step (kWh).
    pub fn capacity(&self, air_temp: f32, dt_hours: f32) -> HeatPumpStep {
        let (heat, input) = self.lookup.lookup(self.source_temp(air_temp));
        HeatPumpStep {
            heat: heat * self.rated_kw * dt_hours,
            electricity: input * self.rated_kw * dt_hours,
        }
    }

    /// Meets as much of `demand_kwh` as capacity allows.
    ///
    /// Electricity scales with the fraction of capacity used.
    pub fn run(&self, demand_kwh: f32, air_temp: f32, dt_hours: f32) -> HeatPumpStep {
        let full = self.capacity(air_temp, dt_hours);
        if full.heat <= 0.0 || demand_kwh <= 0.0 {
            return HeatPumpStep::default();
        }
        let heat = demand_kwh.min(full.heat);
        HeatPumpStep {
            heat,
            electricity: full.electricity * heat / full.heat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::HeatPumpTable;
    use approx::assert_relative_eq;

    fn flat_lookup() -> TemperatureLookup {
        // Cold air: heat 0.8 at input 0.4 (COP 2); warm air: heat 1.2 at input 0.3.
        let input = HeatPumpTable {
            air_temperatures: vec![0.0, 40.0],
            send_temperatures: vec![50.0],
            values: vec![vec![0.4], vec![0.3]],
        };
        let output = HeatPumpTable {
            values: vec![vec![0.8], vec![1.2]],
            ..input.clone()
        };
        TemperatureLookup::new(&input, &output, 50.0)
    }

    #[test]
    fn part_load_scales_electricity() {
        let lk = flat_lookup();
        let hp = HeatPump::new(10.0, HeatSource::Ambient, None, &lk);
        let step = hp.run(4.0, 0.0, 1.0);
        assert_relative_eq!(step.heat, 4.0);
        assert_relative_eq!(step.electricity, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn output_capped_at_capacity() {
        let lk = flat_lookup();
        let hp = HeatPump::new(10.0, HeatSource::Ambient, None, &lk);
        let step = hp.run(50.0, 0.0, 0.5);
        assert_relative_eq!(step.heat, 4.0, epsilon = 1e-6);
        assert_relative_eq!(step.electricity, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn hotroom_uses_data_centre_temperature() {
        let lk = flat_lookup();
        let hot = HeatPump::new(10.0, HeatSource::Hotroom, Some(40.0), &lk);
        assert_relative_eq!(hot.capacity(0.0, 1.0).heat, 12.0, epsilon = 1e-5);
        let orphan = HeatPump::new(10.0, HeatSource::Hotroom, None, &lk);
        assert_relative_eq!(orphan.capacity(0.0, 1.0).heat, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn idle_without_demand() {
        let lk = flat_lookup();
        let hp = HeatPump::new(10.0, HeatSource::Ambient, None, &lk);
        assert_eq!(hp.run(0.0, 0.0, 1.0), HeatPumpStep::default());
    }
}
