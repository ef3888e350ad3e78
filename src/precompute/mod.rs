//! Read-only tables built once per site and shared by every evaluation.

pub mod day_tariff_stats;
pub mod temperature_lookup;

pub use day_tariff_stats::DayTariffStats;
pub use temperature_lookup::TemperatureLookup;
