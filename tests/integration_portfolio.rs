mod common;

use approx::assert_relative_eq;
use common::{flat_site, grid_only};
use site_sim::sim::aggregate;
use site_sim::task::{GasHeater, HeatPump, SolarPanel, TaskData};
use site_sim::{SimError, SimulationResult, simulate};

fn boiler_site() -> TaskData {
    TaskData {
        gas_heater: Some(GasHeater::default()),
        ..grid_only()
    }
}

fn retrofit() -> TaskData {
    TaskData {
        gas_heater: None,
        heat_pump: Some(HeatPump {
            heat_power: 15.0,
            ..HeatPump::default()
        }),
        solar_panels: vec![SolarPanel {
            yield_scalar: 5.0,
            yield_index: 0,
        }],
        ..grid_only()
    }
}

fn run(value: f32) -> SimulationResult {
    let site = flat_site(48, value, boiler_site());
    match simulate(&site, &retrofit()) {
        Ok(r) => r,
        Err(e) => panic!("simulation failed: {e}"),
    }
}

#[test]
fn two_sites_sum_additive_metrics() {
    let a = run(1.0);
    let b = run(2.0);
    let p = aggregate(&[a.clone(), b.clone()]).expect("matching sites");

    assert_relative_eq!(p.metrics.total_capex, a.metrics.total_capex + b.metrics.total_capex);
    assert_relative_eq!(
        p.metrics.total_electricity_imported,
        a.metrics.total_electricity_imported + b.metrics.total_electricity_imported
    );
    assert_relative_eq!(
        p.comparison.combined_carbon_balance,
        a.comparison.combined_carbon_balance + b.comparison.combined_carbon_balance,
        epsilon = 1e-9
    );
    assert_eq!(p.metrics.environmental_grade, None);
    assert_eq!(p.horizon_years, a.horizon_years);
}

#[test]
fn payback_is_derived_from_summed_capex_and_balance() {
    let a = run(1.0);
    let b = run(3.0);
    let Ok(p) = aggregate(&[a.clone(), b.clone()]) else {
        panic!("aggregation failed");
    };

    let capex = p.metrics.total_capex - p.baseline.total_capex;
    let balance = a.comparison.operating_balance + b.comparison.operating_balance;
    let expected = (balance > 0.0).then(|| capex / balance);
    assert_eq!(p.comparison.payback_horizon_years, expected);
    let expected_roi = (capex > 0.0).then(|| balance / capex);
    assert_eq!(p.comparison.return_on_investment, expected_roi);
}

#[test]
fn sites_with_different_horizons_are_rejected() {
    let a = run(1.0);
    let site = flat_site(24, 1.0, boiler_site());
    let Ok(short) = simulate(&site, &retrofit()) else {
        panic!("simulation failed");
    };
    assert!(matches!(aggregate(&[a, short]), Err(SimError::Portfolio(_))));
}
