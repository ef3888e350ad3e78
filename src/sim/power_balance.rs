//! Electrical bus balance within one timestep.

/// Running sum of site consumption and on-site supply for one timestep.
///
/// Components add their energies in dispatch order; later components see
/// the surplus or deficit left by earlier ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElectricalBalance {
    load_kwh: f32,
    supply_kwh: f32,
}

impl ElectricalBalance {
    /// Adds consumption.
    pub fn add_load(&mut self, kwh: f32) {
        self.load_kwh += kwh;
    }

    /// Adds on-site supply (generation or storage discharge).
    pub fn add_supply(&mut self, kwh: f32) {
        self.supply_kwh += kwh;
    }

    /// Net position: positive needs import, negative can export.
    pub fn net(&self) -> f32 {
        self.load_kwh - self.supply_kwh
    }

    /// Supply not yet consumed.
    pub fn surplus(&self) -> f32 {
        (-self.net()).max(0.0)
    }

    /// Consumption not yet supplied.
    pub fn deficit(&self) -> f32 {
        self.net().max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_only() {
        let mut bus = ElectricalBalance::default();
        bus.add_load(1.0);
        bus.add_load(2.0);
        assert_eq!(bus.net(), 3.0);
        assert_eq!(bus.deficit(), 3.0);
        assert_eq!(bus.surplus(), 0.0);
    }

    #[test]
    fn generation_creates_surplus() {
        let mut bus = ElectricalBalance::default();
        bus.add_load(1.0);
        bus.add_supply(3.0);
        assert_eq!(bus.net(), -2.0);
        assert_eq!(bus.surplus(), 2.0);
        assert_eq!(bus.deficit(), 0.0);
    }

    #[test]
    fn mixed_scenario() {
        // load 0.8 + 3.0, supply 2.5 + 1.0 leaves 0.3 to import.
        let mut bus = ElectricalBalance::default();
        bus.add_load(0.8);
        bus.add_load(3.0);
        bus.add_supply(2.5);
        bus.add_supply(1.0);
        assert!((bus.deficit() - 0.3).abs() < 1e-6);
    }
}
