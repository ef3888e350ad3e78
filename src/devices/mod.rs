//! Physical components stepped by the simulation engine.
//!
//! Every component works in energy per timestep (kWh); power ratings are
//! converted with the timestep length when the component is built.

/// Stationary battery with tariff-aware dispatch.
pub mod battery;
/// Building loads and fabric retrofits.
pub mod building;
/// EV charging with a deferrable backlog.
pub mod ev_charger;
pub mod gas_heater;
/// Grid connection limits and settlement.
pub mod grid;
pub mod heat_pump;
/// Hot water cylinder.
pub mod hot_water;
pub mod loads;
/// Solar generation.
pub mod solar;

pub use battery::{Battery, BatteryFlow, TariffSignal};
pub use building::{BuildingLoads, FabricModel};
pub use ev_charger::EvCharger;
pub use gas_heater::Boiler;
pub use grid::GridConnection;
pub use heat_pump::HeatPump;
pub use hot_water::Cylinder;
pub use loads::{DataCentreLoad, MopUpLoad};
pub use solar::SolarArray;
