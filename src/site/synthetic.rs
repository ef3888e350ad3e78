//! Deterministic synthetic site generator.
//!
//! Produces a complete [`SiteData`] from a handful of waveform parameters so
//! scenarios and tests can run without recorded meter data. Every series is
//! a daily shape (sinusoid or half-sine daylight window) plus seeded
//! Gaussian noise.

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;

use super::{CostItem, FabricIntervention, HeatPumpTable, SiteData};
use crate::task::TaskData;

/// Waveform parameters for a synthetic site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteProfile {
    /// Start of the horizon (RFC 3339 string in TOML).
    pub start: DateTime<Utc>,
    /// Number of days to generate.
    pub days: usize,
    /// Timesteps per day; the timestep is `24 / steps_per_day` hours.
    pub steps_per_day: usize,
    /// Mean building electrical demand (kW).
    pub base_eload_kw: f32,
    /// Daily amplitude of the electrical demand (kW).
    pub eload_amp_kw: f32,
    /// Phase of the electrical demand sinusoid (radians).
    pub eload_phase_rad: f32,
    /// Noise on the electrical demand (kW).
    pub eload_noise_std: f32,
    /// Daily mean outdoor temperature (°C).
    pub mean_air_temp: f32,
    /// Peak-to-mean daily temperature swing (°C).
    pub air_temp_swing: f32,
    /// Building heat loss coefficient (kW per K below the base temperature).
    pub heat_loss_kw_per_k: f32,
    /// Outdoor temperature above which no space heating is needed (°C).
    pub heating_base_temp: f32,
    /// Domestic hot water demand per day (kWh heat).
    pub dhw_kwh_per_day: f32,
    /// EV charging demand per day (kWh), delivered in the evening.
    pub ev_kwh_per_day: f32,
    /// Hour of sunrise.
    pub sunrise_hour: f32,
    /// Hour of sunset.
    pub sunset_hour: f32,
    /// Relative noise on solar yields (e.g. 0.1 for ±10 %).
    pub solar_noise_std: f32,
    /// One yield profile per panel orientation.
    pub solar_orientations: Vec<SolarOrientation>,
    /// Mean grid carbon intensity (g CO2e/kWh).
    pub grid_co2_mean: f32,
    /// Daily amplitude of the grid carbon intensity (g CO2e/kWh).
    pub grid_co2_amp: f32,
    /// Import tariff definitions.
    pub tariffs: Vec<TariffProfile>,
    /// Fabric retrofit options.
    pub fabric: Vec<FabricProfile>,
}

/// Solar yield shape of one panel orientation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarOrientation {
    /// Peak yield at solar noon (kWh per kWp per hour).
    pub peak_yield: f32,
    /// Shift of the daylight window in hours (negative = earlier).
    pub shift_hours: f32,
}

impl Default for SolarOrientation {
    fn default() -> Self {
        Self {
            peak_yield: 0.7,
            shift_hours: 0.0,
        }
    }
}

/// Two-rate import tariff.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffProfile {
    /// Day rate (£/kWh).
    pub day_rate: f32,
    /// Night rate (£/kWh).
    pub night_rate: f32,
    /// Hour the night rate starts.
    pub night_start_hour: f32,
    /// Hour the night rate ends.
    pub night_end_hour: f32,
}

impl Default for TariffProfile {
    fn default() -> Self {
        Self {
            day_rate: 0.28,
            night_rate: 0.28,
            night_start_hour: 0.0,
            night_end_hour: 7.0,
        }
    }
}

/// Fabric retrofit option expressed as a fraction of space-heating demand.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FabricProfile {
    /// Label used in the cost breakdown.
    pub name: String,
    /// Capital cost (£).
    pub cost: f64,
    /// Fraction of the space-heating demand removed (0.0–1.0).
    pub heat_reduction: f32,
}

impl Default for FabricProfile {
    fn default() -> Self {
        Self {
            name: "insulation".to_string(),
            cost: 10_000.0,
            heat_reduction: 0.1,
        }
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            start: DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_723),
            days: 7,
            steps_per_day: 48,
            base_eload_kw: 20.0,
            eload_amp_kw: 8.0,
            eload_phase_rad: 1.2,
            eload_noise_std: 1.0,
            mean_air_temp: 6.0,
            air_temp_swing: 4.0,
            heat_loss_kw_per_k: 2.5,
            heating_base_temp: 15.5,
            dhw_kwh_per_day: 30.0,
            ev_kwh_per_day: 40.0,
            sunrise_hour: 7.0,
            sunset_hour: 17.0,
            solar_noise_std: 0.1,
            solar_orientations: vec![
                SolarOrientation::default(),
                SolarOrientation {
                    peak_yield: 0.55,
                    shift_hours: -1.5,
                },
            ],
            grid_co2_mean: 180.0,
            grid_co2_amp: 60.0,
            tariffs: vec![
                TariffProfile::default(),
                TariffProfile {
                    day_rate: 0.32,
                    night_rate: 0.12,
                    ..TariffProfile::default()
                },
            ],
            fabric: vec![
                FabricProfile {
                    name: "loft insulation".to_string(),
                    cost: 6_000.0,
                    heat_reduction: 0.1,
                },
                FabricProfile {
                    name: "cavity wall insulation".to_string(),
                    cost: 14_000.0,
                    heat_reduction: 0.25,
                },
            ],
        }
    }
}

/// Zero-mean Gaussian sample via Box-Muller.
fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}

/// Half-sine window between `start` and `end` hours, 0 outside.
fn window_frac(hour: f32, start: f32, end: f32) -> f32 {
    if end <= start || hour < start || hour >= end {
        return 0.0;
    }
    ((hour - start) / (end - start) * std::f32::consts::PI).sin()
}

/// True when `hour` falls inside a window that may wrap midnight.
fn in_window(hour: f32, start: f32, end: f32) -> bool {
    if start <= end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}

/// Builds a synthetic site.
///
/// # Arguments
///
/// * `profile` - Waveform parameters
/// * `baseline` - As-is configuration attached to the site
/// * `seed` - Seed for every noise source
///
/// # Returns
///
/// A `SiteData` with `days * steps_per_day` timesteps and the built-in
/// air source heat pump tables.
pub fn generate(profile: &SiteProfile, baseline: TaskData, seed: u64) -> SiteData {
    let steps_per_day = profile.steps_per_day.max(1);
    let n = profile.days * steps_per_day;
    let dt = 24.0 / steps_per_day as f32;
    let mut rng = StdRng::seed_from_u64(seed);
    let tau = 2.0 * std::f32::consts::PI;

    let hour_of = |t: usize| (t % steps_per_day) as f32 * dt;

    let mut building_eload = Vec::with_capacity(n);
    let mut air_temperature = Vec::with_capacity(n);
    let mut building_hload = Vec::with_capacity(n);
    let mut grid_co2 = Vec::with_capacity(n);
    for t in 0..n {
        let day_pos = hour_of(t) / 24.0;

        let kw = profile.base_eload_kw
            + profile.eload_amp_kw * (tau * day_pos + profile.eload_phase_rad).sin()
            + gaussian_noise(&mut rng, profile.eload_noise_std);
        building_eload.push(kw.max(0.0) * dt);

        // Coldest just before dawn, warmest mid-afternoon.
        let temp = profile.mean_air_temp
            + profile.air_temp_swing * (tau * (day_pos - 0.375)).sin()
            + gaussian_noise(&mut rng, 0.5);
        air_temperature.push(temp);

        let deficit_k = (profile.heating_base_temp - temp).max(0.0);
        building_hload.push(profile.heat_loss_kw_per_k * deficit_k * dt);

        let co2 = profile.grid_co2_mean
            + profile.grid_co2_amp * (tau * day_pos + 1.2).sin()
            + gaussian_noise(&mut rng, 5.0);
        grid_co2.push(co2.max(0.0));
    }

    // Hot water peaks morning and evening; EVs charge after work.
    let dhw_shape: Vec<f32> = (0..steps_per_day)
        .map(|t| {
            let h = hour_of(t);
            window_frac(h, 6.0, 9.0) + window_frac(h, 17.0, 22.0)
        })
        .collect();
    let ev_shape: Vec<f32> = (0..steps_per_day)
        .map(|t| window_frac(hour_of(t), 17.0, 24.0))
        .collect();
    let spread = |shape: &[f32], kwh_per_day: f32| -> Vec<f32> {
        let total: f32 = shape.iter().sum();
        (0..n)
            .map(|t| {
                if total > 0.0 {
                    kwh_per_day * shape[t % steps_per_day] / total
                } else {
                    kwh_per_day / steps_per_day as f32
                }
            })
            .collect()
    };
    let dhw_demand = spread(&dhw_shape, profile.dhw_kwh_per_day);
    let ev_eload = spread(&ev_shape, profile.ev_kwh_per_day);

    let solar_yields = profile
        .solar_orientations
        .iter()
        .map(|o| {
            (0..n)
                .map(|t| {
                    let frac = window_frac(
                        hour_of(t),
                        profile.sunrise_hour + o.shift_hours,
                        profile.sunset_hour + o.shift_hours,
                    );
                    if frac <= 0.0 {
                        return 0.0;
                    }
                    let mult = 1.0 + gaussian_noise(&mut rng, profile.solar_noise_std);
                    (o.peak_yield * frac * mult * dt).max(0.0)
                })
                .collect()
        })
        .collect();

    let import_tariffs = profile
        .tariffs
        .iter()
        .map(|tariff| {
            (0..n)
                .map(|t| {
                    if in_window(hour_of(t), tariff.night_start_hour, tariff.night_end_hour) {
                        tariff.night_rate
                    } else {
                        tariff.day_rate
                    }
                })
                .collect()
        })
        .collect();

    let peak_hload = building_hload.iter().fold(0.0_f32, |m, &h| m.max(h / dt));
    let fabric_interventions = profile
        .fabric
        .iter()
        .map(|f| {
            let r = f.heat_reduction.clamp(0.0, 1.0);
            FabricIntervention {
                cost: f.cost,
                cost_breakdown: Some(vec![CostItem {
                    name: f.name.clone(),
                    cost: f.cost,
                }]),
                peak_hload_reduction: peak_hload * r,
                hload_reduction: building_hload.iter().map(|h| h * r).collect(),
            }
        })
        .collect();

    let (ashp_input_table, ashp_output_table) = HeatPumpTable::typical_air_source();
    let step = Duration::seconds((f64::from(dt) * 3600.0).round() as i64);

    SiteData {
        start_ts: profile.start,
        end_ts: profile.start + step * n as i32,
        timestep_hours: dt,
        building_eload,
        building_hload,
        ev_eload,
        dhw_demand,
        air_temperature,
        grid_co2,
        solar_yields,
        import_tariffs,
        fabric_interventions,
        baseline,
        peak_hload,
        ashp_input_table,
        ashp_output_table,
    }
}
