//! Simulation engine: one configuration stepped over a site's horizon.

use std::borrow::Cow;

use tracing::debug;

use super::capex::{CapexBreakdown, CostModel};
use super::comparison::Comparison;
use super::metrics::{HOURS_PER_YEAR, SimulationMetrics, SimulationResult};
use super::power_balance::ElectricalBalance;
use crate::cancel::CancellationToken;
use crate::devices::gas_heater::BoilerStep;
use crate::devices::heat_pump::HeatPumpStep;
use crate::devices::hot_water::DhwRequest;
use crate::devices::{
    Battery, Boiler, BuildingLoads, Cylinder, DataCentreLoad, EvCharger, FabricModel,
    GridConnection, HeatPump, MopUpLoad, SolarArray, TariffSignal,
};
use crate::error::SimError;
use crate::precompute::{DayTariffStats, TemperatureLookup};
use crate::site::SiteData;
use crate::task::TaskData;

/// Evaluates configurations against one site.
///
/// Construction validates the site, builds the per-tariff day statistics
/// and the heat pump lookups for every send temperature it is told about,
/// then simulates the site's baseline once. Nothing changes after that, so
/// one simulator can serve many threads without locking. A run asking for
/// an unprepared send temperature builds its own lookup.
pub struct Simulator<'a> {
    site: &'a SiteData,
    cost_model: CostModel,
    tariff_stats: Vec<DayTariffStats>,
    /// Sorted by send temperature.
    lookups: Vec<TemperatureLookup>,
    baseline: SimulationMetrics,
}

/// Mutable component state carried between timesteps of one run.
struct RunState {
    battery: Option<Battery>,
    ev: Option<EvCharger>,
    cylinder: Option<Cylinder>,
}

impl RunState {
    fn new(task: &TaskData, dt_hours: f32) -> Self {
        Self {
            battery: task
                .energy_storage_system
                .as_ref()
                .map(|ess| Battery::new(ess, dt_hours)),
            ev: task
                .electric_vehicles
                .as_ref()
                .map(|ev| EvCharger::new(ev, dt_hours)),
            cylinder: task
                .domestic_hot_water
                .as_ref()
                .map(|dhw| Cylinder::new(dhw.cylinder_volume)),
        }
    }
}

impl<'a> Simulator<'a> {
    /// Prepares a simulator for `site`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidSite` if the site fails validation or its
    /// baseline configuration cannot be simulated.
    pub fn new(site: &'a SiteData, cost_model: CostModel) -> Result<Self, SimError> {
        Self::with_send_temperatures(site, cost_model, std::iter::empty::<f32>())
    }

    /// As [`new`](Self::new), also preparing heat pump lookups for
    /// `send_temperatures` (the baseline's is always prepared).
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn with_send_temperatures(
        site: &'a SiteData,
        cost_model: CostModel,
        send_temperatures: impl IntoIterator<Item = f32>,
    ) -> Result<Self, SimError> {
        site.validate()?;
        let tariff_stats = site
            .import_tariffs
            .iter()
            .map(|tariff| DayTariffStats::new(tariff, site.timestep_hours))
            .collect();

        let baseline_send = site
            .baseline
            .heat_pump
            .as_ref()
            .map(|hp| hp.send_temperature);
        let mut temps: Vec<f32> = send_temperatures.into_iter().chain(baseline_send).collect();
        temps.sort_by(f32::total_cmp);
        temps.dedup_by(|a, b| a.total_cmp(b).is_eq());
        let lookups = temps
            .into_iter()
            .map(|t| TemperatureLookup::new(&site.ashp_input_table, &site.ashp_output_table, t))
            .collect();

        let mut sim = Self {
            site,
            cost_model,
            tariff_stats,
            lookups,
            baseline: SimulationMetrics::default(),
        };
        sim.baseline = sim.run(&site.baseline, None).map_err(|e| match e {
            SimError::InvalidSite(_) => e,
            other => SimError::InvalidSite(format!("baseline configuration: {other}")),
        })?;
        debug!(
            "Baseline simulated over {} timesteps: {:.1} kWh imported, £{:.2} operating",
            site.timesteps(),
            sim.baseline.total_electricity_imported,
            sim.baseline.total_operating_cost
        );
        Ok(sim)
    }

    /// The site being simulated.
    pub fn site(&self) -> &'a SiteData {
        self.site
    }

    /// Cached metrics of the site baseline.
    pub fn baseline_metrics(&self) -> &SimulationMetrics {
        &self.baseline
    }

    /// Simulated horizon in years.
    pub fn horizon_years(&self) -> f64 {
        self.site.horizon_hours() / HOURS_PER_YEAR
    }

    /// Simulates `task` and compares it with the baseline.
    ///
    /// # Errors
    ///
    /// Returns `SimError::IndexOutOfRange` when the configuration refers to
    /// a tariff, solar profile or fabric intervention the site lacks.
    pub fn simulate(&self, task: &TaskData) -> Result<SimulationResult, SimError> {
        self.evaluate(task, None)
    }

    /// As [`simulate`](Self::simulate), checking `cancel` between timesteps.
    ///
    /// # Errors
    ///
    /// Additionally returns `SimError::Cancelled` once the token is set.
    pub fn simulate_cancellable(
        &self,
        task: &TaskData,
        cancel: &CancellationToken,
    ) -> Result<SimulationResult, SimError> {
        self.evaluate(task, Some(cancel))
    }

    /// Capital cost of `task` by component.
    ///
    /// # Errors
    ///
    /// Returns `SimError::IndexOutOfRange` for an invalid fabric index.
    pub fn capex_breakdown(&self, task: &TaskData) -> Result<CapexBreakdown, SimError> {
        let building = BuildingLoads::new(task.building.as_ref(), self.site)?;
        Ok(self
            .cost_model
            .capex(task, &self.site.baseline, &building.fabric))
    }

    /// Peak heating load of `task` after scaling and fabric reduction (kW).
    ///
    /// # Errors
    ///
    /// Returns `SimError::IndexOutOfRange` for an invalid fabric index.
    pub fn peak_heat_load(&self, task: &TaskData) -> Result<f32, SimError> {
        let building = BuildingLoads::new(task.building.as_ref(), self.site)?;
        Ok(building.peak_heat_load(self.site.peak_hload))
    }

    fn evaluate(
        &self,
        task: &TaskData,
        cancel: Option<&CancellationToken>,
    ) -> Result<SimulationResult, SimError> {
        let metrics = self.run(task, cancel)?;
        let horizon_years = self.horizon_years();
        let lifetime_years = self.cost_model.lifetime_years;
        let comparison =
            Comparison::between(&self.baseline, &metrics, horizon_years, lifetime_years);
        Ok(SimulationResult {
            comparison,
            baseline: self.baseline.clone(),
            metrics,
            horizon_years,
            lifetime_years,
        })
    }

    /// Prepared lookup for `send_temperature`, or one built for the caller.
    fn lookup(&self, send_temperature: f32) -> Cow<'_, TemperatureLookup> {
        match self
            .lookups
            .binary_search_by(|lk| lk.send_temperature().total_cmp(&send_temperature))
        {
            Ok(i) => Cow::Borrowed(&self.lookups[i]),
            Err(_) => Cow::Owned(TemperatureLookup::new(
                &self.site.ashp_input_table,
                &self.site.ashp_output_table,
                send_temperature,
            )),
        }
    }

    /// Runs one configuration over the horizon and returns its metrics.
    fn run(
        &self,
        task: &TaskData,
        cancel: Option<&CancellationToken>,
    ) -> Result<SimulationMetrics, SimError> {
        let site = self.site;
        let dt = site.timestep_hours;

        let building = BuildingLoads::new(task.building.as_ref(), site)?;
        let solar = SolarArray::new(&task.solar_panels, &site.solar_yields)?;
        let (grid, stats) = match &task.grid {
            Some(g) => (
                GridConnection::new(g, &site.import_tariffs, dt)?,
                self.tariff_stats.get(g.tariff_index),
            ),
            None => (GridConnection::disconnected(), None),
        };
        let data_centre = task
            .data_centre
            .as_ref()
            .map(|dc| DataCentreLoad::new(dc, dt));
        let mop_up = task.other_load.as_ref().map(|o| MopUpLoad::new(o, dt));
        let boiler = task.gas_heater.as_ref().map(|g| Boiler::new(g, dt));
        let lookup = task
            .heat_pump
            .as_ref()
            .map(|hp| self.lookup(hp.send_temperature));
        let heat_pump = match (&task.heat_pump, &lookup) {
            (Some(hp), Some(lk)) => Some(HeatPump::new(
                hp.heat_power,
                hp.heat_source,
                data_centre.map(|dc| dc.hotroom_temp),
                lk,
            )),
            _ => None,
        };

        let mut state = RunState::new(task, dt);
        let mut m = SimulationMetrics::default();

        for t in 0..site.timesteps() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(SimError::Cancelled);
            }

            // Exogenous inputs.
            let price = grid.import_price(t);
            let signal = match stats {
                Some(s) => TariffSignal {
                    price,
                    day_average: s.day_average(t),
                    day_percentile: s.day_percentile(t),
                },
                None => TariffSignal::off_grid(),
            };
            let space_heat = building.space_heat(t);
            let dhw = site.dhw_demand[t];
            let mut bus = ElectricalBalance::default();

            // Fixed electrical loads.
            let fixed = building.electrical(t) + data_centre.map_or(0.0, |dc| dc.demand());
            bus.add_load(fixed);

            // EV: inflexible share now, flexible share after generation.
            let mut ev_used = 0.0;
            if let Some(ev) = state.ev.as_mut() {
                let step = ev.begin_step(site.ev_eload[t]);
                bus.add_load(step.served);
                ev_used += step.served;
                m.total_ev_load += f64::from(step.demand);
                m.total_ev_shortfall += f64::from(step.shortfall);
            }

            let generated = solar.generation(t);
            bus.add_supply(generated);

            if let Some(ev) = state.ev.as_mut() {
                let grid_room = (grid.max_import_kwh() - bus.deficit()).max(0.0);
                let available = if signal.is_cheap() {
                    bus.surplus() + grid_room
                } else {
                    bus.surplus()
                };
                let flex = ev.serve_backlog(available);
                bus.add_load(flex);
                ev_used += flex;
            }

            // Storage.
            if let Some(battery) = state.battery.as_mut() {
                let grid_room = (grid.max_import_kwh() - bus.deficit()).max(0.0);
                let flow = battery.dispatch(bus.surplus(), bus.deficit(), grid_room, signal);
                bus.add_load(flow.charged_from_surplus + flow.charged_from_grid);
                bus.add_supply(flow.discharged);
            }

            // Heat: hot water first, then space heating, then cylinder recharge.
            let request = match state.cylinder.as_mut() {
                Some(cylinder) => cylinder.draw(dhw),
                None => DhwRequest {
                    direct: dhw,
                    recharge: 0.0,
                },
            };
            let heat_demand = request.direct + space_heat + request.recharge;
            let hp = heat_pump.as_ref().map_or(HeatPumpStep::default(), |hp| {
                hp.run(heat_demand, site.air_temperature[t], dt)
            });
            bus.add_load(hp.electricity);
            let burn = boiler
                .as_ref()
                .map_or(BoilerStep::default(), |b| b.burn(heat_demand - hp.heat));

            let mut heat = hp.heat + burn.heat;
            let dhw_served = heat.min(request.direct);
            heat -= dhw_served;
            let space_served = heat.min(space_heat);
            heat -= space_served;
            if let Some(cylinder) = state.cylinder.as_mut() {
                cylinder.recharge(heat.min(request.recharge));
            }

            // Mop-up load.
            let absorbed = mop_up.map_or(0.0, |load| load.absorb(bus.surplus()));
            bus.add_load(absorbed);

            let settled = grid.settle(bus.net());

            m.total_electricity_imported += f64::from(settled.import);
            m.total_electricity_exported += f64::from(settled.export);
            m.total_electricity_curtailed += f64::from(settled.curtailed);
            m.total_electrical_shortfall += f64::from(settled.shortfall);
            m.total_electricity_generated += f64::from(generated);
            m.total_electricity_used += f64::from(fixed + ev_used + hp.electricity + absorbed);

            m.total_dhw_load += f64::from(dhw);
            m.total_space_heat_load += f64::from(space_heat);
            m.total_dhw_shortfall += f64::from(request.direct - dhw_served);
            m.total_space_heat_shortfall += f64::from(space_heat - space_served);

            m.total_import_cost += f64::from(settled.import) * f64::from(price);
            m.total_export_gains += f64::from(settled.export) * f64::from(grid.export_tariff);
            m.total_scope_2_emissions +=
                f64::from(settled.import) * f64::from(site.grid_co2[t]) / 1000.0;

            if let Some(b) = &boiler {
                let fuel = f64::from(burn.fuel);
                m.total_gas_used += fuel;
                m.total_gas_cost += fuel * f64::from(b.fuel_price);
                m.total_scope_1_emissions += fuel * b.fuel_type.emission_factor();
            }
        }

        if let Some(ev) = state.ev.as_mut() {
            m.total_ev_shortfall += f64::from(ev.finish());
        }

        self.finalise(task, &building.fabric, &mut m);
        Ok(m)
    }

    /// Fills the end-of-horizon totals: heat and carbon sums, standing
    /// charges, capex, annualised cost, NPV and the environmental rating.
    fn finalise(&self, task: &TaskData, fabric: &FabricModel<'_>, m: &mut SimulationMetrics) {
        let horizon_hours = self.site.horizon_hours();
        let horizon_years = horizon_hours / HOURS_PER_YEAR;
        let model = &self.cost_model;

        m.total_heat_load = m.total_dhw_load + m.total_space_heat_load;
        m.total_heat_shortfall = m.total_dhw_shortfall + m.total_space_heat_shortfall;
        m.total_combined_carbon_emissions = m.total_scope_1_emissions + m.total_scope_2_emissions;

        m.total_meter_cost = model.meter_cost(task, horizon_hours / 24.0);
        m.total_capex = model.capex(task, &self.site.baseline, fabric).total();
        m.total_operating_cost =
            m.total_import_cost - m.total_export_gains + m.total_gas_cost + m.total_meter_cost;
        m.annual_operating_cost = if horizon_years > 0.0 {
            m.total_operating_cost / horizon_years
        } else {
            0.0
        };
        m.total_annualised_cost = m.total_capex * model.annuity_factor() + m.annual_operating_cost;
        m.total_net_present_value = -m.total_capex - model.present_value(m.annual_operating_cost);
        m.rate_environment();
    }
}

/// Simulates `task` on `site` with the default cost model.
///
/// Runs the baseline pass and the candidate pass. Use a [`Simulator`] to
/// evaluate many configurations against the same site.
///
/// # Errors
///
/// Returns `SimError::InvalidSite` for malformed site data or an invalid
/// baseline, and `SimError::IndexOutOfRange` for an invalid candidate.
pub fn simulate(site: &SiteData, task: &TaskData) -> Result<SimulationResult, SimError> {
    Simulator::new(site, CostModel::default())?.simulate(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{FabricIntervention, HeatPumpTable};
    use crate::task::{
        Building, EnergyStorageSystem, GasHeater, Grid, HeatPump as HeatPumpCfg, OtherLoad,
        SolarPanel,
    };
    use approx::assert_relative_eq;
    use chrono::{DateTime, Utc};

    fn flat_site(n: usize, baseline: TaskData) -> SiteData {
        let (input, output) = HeatPumpTable::typical_air_source();
        SiteData {
            start_ts: DateTime::<Utc>::UNIX_EPOCH,
            end_ts: DateTime::<Utc>::UNIX_EPOCH,
            timestep_hours: 1.0,
            building_eload: vec![1.0; n],
            building_hload: vec![0.0; n],
            ev_eload: vec![0.0; n],
            dhw_demand: vec![0.0; n],
            air_temperature: vec![7.0; n],
            grid_co2: vec![100.0; n],
            solar_yields: vec![vec![0.0; n]],
            import_tariffs: vec![vec![0.2; n]],
            fabric_interventions: Vec::new(),
            baseline,
            peak_hload: 0.0,
            ashp_input_table: input,
            ashp_output_table: output,
        }
    }

    fn grid_only() -> TaskData {
        TaskData {
            building: Some(Building::default()),
            grid: Some(Grid::default()),
            ..TaskData::default()
        }
    }

    fn simulator(site: &SiteData) -> Simulator<'_> {
        match Simulator::new(site, CostModel::default()) {
            Ok(sim) => sim,
            Err(e) => panic!("site rejected: {e}"),
        }
    }

    #[test]
    fn grid_covers_building_load() {
        let site = flat_site(10, grid_only());
        let m = simulator(&site).baseline_metrics().clone();
        assert_relative_eq!(m.total_electricity_imported, 10.0);
        assert_relative_eq!(m.total_import_cost, 2.0, epsilon = 1e-6);
        assert_relative_eq!(m.total_scope_2_emissions, 1.0, epsilon = 1e-6);
        assert_eq!(m.total_electrical_shortfall, 0.0);
        assert_eq!(m.total_capex, 0.0);
    }

    #[test]
    fn no_grid_means_shortfall() {
        let baseline = TaskData {
            building: Some(Building::default()),
            ..TaskData::default()
        };
        let site = flat_site(4, baseline);
        let m = simulator(&site).baseline_metrics().clone();
        assert_relative_eq!(m.total_electrical_shortfall, 4.0);
        assert_eq!(m.total_electricity_imported, 0.0);
    }

    #[test]
    fn solar_surplus_is_exported_then_absorbed_by_mop_up() {
        let mut site = flat_site(2, grid_only());
        site.solar_yields[0] = vec![0.5, 0.5];
        let sim = simulator(&site);

        let mut task = grid_only();
        task.solar_panels.push(SolarPanel {
            yield_scalar: 4.0,
            yield_index: 0,
        });
        let exported = sim.simulate(&task).map(|r| r.metrics.total_electricity_exported);
        assert_eq!(exported, Ok(2.0));

        task.other_load = Some(OtherLoad { maximum_load: 0.5 });
        let r = sim.simulate(&task);
        assert_eq!(r.as_ref().map(|r| r.metrics.total_electricity_exported), Ok(1.0));
        assert_eq!(r.map(|r| r.metrics.total_electricity_used), Ok(3.0));
    }

    #[test]
    fn gas_heating_emits_scope_one() {
        let mut site = flat_site(3, grid_only());
        site.building_hload = vec![9.0; 3];
        let sim = simulator(&site);
        let mut task = grid_only();
        task.gas_heater = Some(GasHeater::default());
        let m = sim.simulate(&task).expect("gas heater run").metrics;
        assert_relative_eq!(m.total_gas_used, 30.0, epsilon = 1e-4);
        assert_relative_eq!(m.total_scope_1_emissions, 30.0 * 0.18293, epsilon = 1e-4);
        assert_eq!(m.total_heat_shortfall, 0.0);
    }

    #[test]
    fn heat_without_source_is_shortfall() {
        let mut site = flat_site(2, grid_only());
        site.building_hload = vec![3.0; 2];
        site.dhw_demand = vec![1.0; 2];
        let m = simulator(&site).baseline_metrics().clone();
        assert_relative_eq!(m.total_space_heat_shortfall, 6.0);
        assert_relative_eq!(m.total_dhw_shortfall, 2.0);
        assert_relative_eq!(m.total_heat_shortfall, 8.0);
    }

    #[test]
    fn heat_pump_uses_surplus_before_grid() {
        let mut site = flat_site(1, grid_only());
        site.building_hload = vec![4.0];
        site.solar_yields[0] = vec![1.0];
        let sim = simulator(&site);
        let mut task = grid_only();
        task.heat_pump = Some(HeatPumpCfg {
            heat_power: 10.0,
            ..HeatPumpCfg::default()
        });
        task.solar_panels.push(SolarPanel {
            yield_scalar: 3.0,
            yield_index: 0,
        });
        let m = sim.simulate(&task).expect("heat pump run").metrics;
        // Building takes 1 kWh, the heat pump draws under 2 kWh of the 3 kWh.
        assert_eq!(m.total_electricity_imported, 0.0);
        assert_eq!(m.total_space_heat_shortfall, 0.0);
        assert!(m.total_electricity_exported > 0.0);
    }

    #[test]
    fn battery_shifts_solar_into_evening() {
        let mut site = flat_site(2, grid_only());
        site.solar_yields[0] = vec![1.0, 0.0];
        let sim = simulator(&site);
        let mut task = grid_only();
        task.solar_panels.push(SolarPanel {
            yield_scalar: 3.0,
            yield_index: 0,
        });
        task.energy_storage_system = Some(EnergyStorageSystem {
            capacity: 10.0,
            charge_power: 5.0,
            discharge_power: 5.0,
            ..EnergyStorageSystem::default()
        });
        let m = sim.simulate(&task).expect("battery run").metrics;
        assert_eq!(m.total_electricity_exported, 0.0);
        assert_eq!(m.total_electricity_imported, 0.0);
    }

    #[test]
    fn bad_indices_fail_fast() {
        let site = flat_site(2, grid_only());
        let sim = simulator(&site);
        let mut task = grid_only();
        task.grid = Some(Grid {
            tariff_index: 5,
            ..Grid::default()
        });
        assert!(matches!(
            sim.simulate(&task),
            Err(SimError::IndexOutOfRange { field: "grid.tariff_index", .. })
        ));
    }

    #[test]
    fn invalid_baseline_is_fatal() {
        let mut baseline = grid_only();
        baseline.building = Some(Building {
            fabric_intervention_index: 1,
            ..Building::default()
        });
        let site = flat_site(2, baseline);
        assert!(matches!(
            Simulator::new(&site, CostModel::default()),
            Err(SimError::InvalidSite(_))
        ));
    }

    #[test]
    fn cancelled_token_stops_run() {
        let site = flat_site(5, grid_only());
        let sim = simulator(&site);
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(
            sim.simulate_cancellable(&grid_only(), &token).err(),
            Some(SimError::Cancelled)
        );
    }

    #[test]
    fn identical_candidate_balances_to_zero() {
        let site = flat_site(24, grid_only());
        let c = simulator(&site)
            .simulate(&grid_only())
            .expect("baseline copy should simulate")
            .comparison;
        assert_eq!(c.cost_balance, 0.0);
        assert_eq!(c.carbon_balance_scope_1, 0.0);
        assert_eq!(c.payback_horizon_years, None);
    }

    #[test]
    fn lookups_are_prepared_once_per_send_temperature() {
        let mut baseline = grid_only();
        baseline.heat_pump = Some(HeatPumpCfg {
            send_temperature: 65.0,
            ..HeatPumpCfg::default()
        });
        let site = flat_site(1, baseline);
        let sim =
            Simulator::with_send_temperatures(&site, CostModel::default(), [55.0_f32, 45.0, 55.0])
                .expect("site should be accepted");
        let prepared: Vec<f32> = sim.lookups.iter().map(|lk| lk.send_temperature()).collect();
        assert_eq!(prepared, vec![45.0, 55.0, 65.0]);
        assert!(matches!(sim.lookup(55.0), Cow::Borrowed(_)));
        assert!(matches!(sim.lookup(50.0), Cow::Owned(_)));
    }

    #[test]
    fn unprepared_send_temperature_matches_prepared() {
        let mut site = flat_site(6, grid_only());
        site.building_hload = vec![5.0; 6];
        site.air_temperature = vec![-2.0, 0.0, 3.0, 7.0, 11.0, 15.0];
        let mut task = grid_only();
        task.heat_pump = Some(HeatPumpCfg {
            heat_power: 8.0,
            send_temperature: 60.0,
            ..HeatPumpCfg::default()
        });

        let cold = simulator(&site).simulate(&task).expect("unprepared run");
        let prepared = Simulator::with_send_temperatures(&site, CostModel::default(), [60.0_f32])
            .expect("site should be accepted");
        let warm = prepared.simulate(&task).expect("prepared run");
        assert_eq!(cold.metrics, warm.metrics);
    }

    #[test]
    fn fabric_intervention_lowers_peak_heat_load() {
        let mut site = flat_site(2, grid_only());
        site.peak_hload = 10.0;
        site.fabric_interventions.push(FabricIntervention {
            cost: 1_000.0,
            cost_breakdown: None,
            peak_hload_reduction: 3.0,
            hload_reduction: vec![0.0; 2],
        });
        let sim = simulator(&site);
        assert_eq!(sim.peak_heat_load(&grid_only()), Ok(10.0));
        let mut task = grid_only();
        task.building = Some(Building {
            fabric_intervention_index: 1,
            ..Building::default()
        });
        assert_eq!(sim.peak_heat_load(&task), Ok(7.0));
    }
}
