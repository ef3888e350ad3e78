/// Specific heat of water (kWh per litre per K).
const WATER_KWH_PER_LITRE_K: f32 = 4.186 / 3600.0;

/// Temperature lift from cold feed to storage (K).
const CYLINDER_DELTA_T: f32 = 50.0;

/// Heat needed this step to serve hot water (kWh).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DhwRequest {
    /// Demand the cylinder could not cover; unmet heat here is shortfall.
    pub direct: f32,
    /// Energy to bring the cylinder back to full; unmet heat here is not.
    pub recharge: f32,
}

/// Hot water cylinder buffering domestic hot water demand.
///
/// Starts full. Each step draws from storage first and asks the heat
/// sources for the uncovered demand plus a recharge.
#[derive(Debug, Clone)]
pub struct Cylinder {
    capacity_kwh: f32,
    /// Stored heat (kWh).
    pub stored_kwh: f32,
}

impl Cylinder {
    /// Creates a full cylinder of `volume_litres`.
    pub fn new(volume_litres: f32) -> Self {
        let capacity_kwh = volume_litres.max(0.0) * WATER_KWH_PER_LITRE_K * CYLINDER_DELTA_T;
        Self {
            capacity_kwh,
            stored_kwh: capacity_kwh,
        }
    }

    /// Heat capacity (kWh).
    pub fn capacity_kwh(&self) -> f32 {
        self.capacity_kwh
    }

    /// Draws `demand_kwh` from storage and returns the heat request.
    pub fn draw(&mut self, demand_kwh: f32) -> DhwRequest {
        let from_store = demand_kwh.max(0.0).min(self.stored_kwh);
        self.stored_kwh -= from_store;
        DhwRequest {
            direct: demand_kwh.max(0.0) - from_store,
            recharge: self.capacity_kwh - self.stored_kwh,
        }
    }

    /// Adds recharge heat, capped at capacity.
    pub fn recharge(&mut self, heat_kwh: f32) {
        self.stored_kwh = (self.stored_kwh + heat_kwh.max(0.0)).min(self.capacity_kwh);
    }
}
