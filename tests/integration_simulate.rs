mod common;

use approx::assert_relative_eq;
use common::{flat_site, grid_only, simulator};
use site_sim::task::{EnergyStorageSystem, GasHeater, HeatPump, SolarPanel, TaskData};
use site_sim::{SimError, simulate};

/// Building on the grid with a boiler, a small array and a battery.
fn mixed_baseline() -> TaskData {
    TaskData {
        gas_heater: Some(GasHeater::default()),
        solar_panels: vec![SolarPanel {
            yield_scalar: 2.0,
            yield_index: 0,
        }],
        energy_storage_system: Some(EnergyStorageSystem {
            capacity: 10.0,
            charge_power: 5.0,
            discharge_power: 5.0,
            ..EnergyStorageSystem::default()
        }),
        ..grid_only()
    }
}

#[test]
fn baseline_equal_candidate_balances_to_zero() {
    let site = flat_site(24, 1.0, mixed_baseline());
    let result =
        simulate(&site, &mixed_baseline()).expect("baseline copy should simulate");

    assert_eq!(result.comparison.cost_balance, 0.0);
    assert_eq!(result.comparison.carbon_balance_scope_1, 0.0);
    assert_eq!(result.comparison.carbon_balance_scope_2, 0.0);
    assert_eq!(result.metrics.total_capex, 0.0);
    assert_eq!(result.comparison.payback_horizon_years, None);
    assert_eq!(result.metrics, result.baseline);
}

#[test]
fn simulation_is_deterministic_across_simulators() {
    let site = flat_site(24, 1.0, mixed_baseline());
    let mut candidate = mixed_baseline();
    candidate.heat_pump = Some(HeatPump {
        heat_power: 10.0,
        ..HeatPump::default()
    });

    let first = simulator(&site).simulate(&candidate).expect("first run");
    let second = simulator(&site).simulate(&candidate).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn replacing_boiler_with_heat_pump_removes_scope_1() {
    let site = flat_site(24, 1.0, mixed_baseline());
    let mut candidate = mixed_baseline();
    candidate.gas_heater = None;
    candidate.heat_pump = Some(HeatPump {
        heat_power: 20.0,
        ..HeatPump::default()
    });

    let result = simulator(&site)
        .simulate(&candidate)
        .expect("heat pump retrofit should simulate");

    assert_eq!(result.metrics.total_scope_1_emissions, 0.0);
    assert!(result.baseline.total_scope_1_emissions > 0.0);
    assert!(result.comparison.carbon_balance_scope_1 > 0.0);
    assert!(result.metrics.total_capex > 0.0);
}

#[test]
fn missing_grid_is_recorded_as_shortfall() {
    let baseline = TaskData {
        grid: None,
        ..grid_only()
    };
    let site = flat_site(24, 1.0, baseline.clone());
    let result = simulate(&site, &baseline).expect("off-grid run");

    assert_relative_eq!(result.metrics.total_electrical_shortfall, 24.0, epsilon = 1e-6);
    assert!(result.metrics.total_heat_shortfall > 0.0);
    assert_eq!(result.metrics.total_electricity_imported, 0.0);
}

#[test]
fn out_of_range_tariff_fails_the_candidate() {
    let site = flat_site(24, 1.0, grid_only());
    let mut candidate = grid_only();
    if let Some(grid) = candidate.grid.as_mut() {
        grid.tariff_index = 3;
    }
    let result = simulate(&site, &candidate);
    assert!(matches!(
        result,
        Err(SimError::IndexOutOfRange { index: 3, len: 1, .. })
    ));
}

#[test]
fn malformed_site_is_rejected() {
    let mut site = flat_site(24, 1.0, grid_only());
    site.grid_co2.pop();
    assert!(matches!(
        simulate(&site, &grid_only()),
        Err(SimError::InvalidSite(_))
    ));
}
