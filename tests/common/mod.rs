//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use site_sim::SiteData;
use site_sim::sim::{CostModel, Simulator};
use site_sim::site::HeatPumpTable;
use site_sim::task::{Building, Grid, TaskData};

/// Site of `n` one-hour steps where every input series holds `value`.
///
/// One solar profile, one tariff, no fabric options.
pub fn flat_site(n: usize, value: f32, baseline: TaskData) -> SiteData {
    let (input, output) = HeatPumpTable::typical_air_source();
    let start = DateTime::<Utc>::UNIX_EPOCH;
    SiteData {
        start_ts: start,
        end_ts: start + Duration::hours(n as i64),
        timestep_hours: 1.0,
        building_eload: vec![value; n],
        building_hload: vec![value; n],
        ev_eload: vec![value; n],
        dhw_demand: vec![value; n],
        air_temperature: vec![value; n],
        grid_co2: vec![value; n],
        solar_yields: vec![vec![value; n]],
        import_tariffs: vec![vec![value; n]],
        fabric_interventions: Vec::new(),
        baseline,
        peak_hload: value,
        ashp_input_table: input,
        ashp_output_table: output,
    }
}

/// Building on a default grid connection.
pub fn grid_only() -> TaskData {
    TaskData {
        building: Some(Building::default()),
        grid: Some(Grid::default()),
        ..TaskData::default()
    }
}

/// Simulator with the default cost model; panics on a rejected site.
pub fn simulator(site: &SiteData) -> Simulator<'_> {
    match Simulator::new(site, CostModel::default()) {
        Ok(sim) => sim,
        Err(e) => panic!("site rejected: {e}"),
    }
}
