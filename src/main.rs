//! Site simulator entry point: CLI wiring and config-driven optimisation.

use std::path::Path;
use std::process;

use site_sim::config::ScenarioConfig;
use site_sim::io::export::export_csv;
use site_sim::optimiser::{HEAT_PUMP_SEND_TEMPERATURE, optimise_with};
use site_sim::reporting::print_report;
use site_sim::site::synthetic;
use site_sim::telemetry::init_tracing;
use site_sim::{CancellationToken, Simulator};
use tracing::info;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    out: Option<String>,
}

fn print_help() {
    eprintln!("site-sim: site energy simulation and configuration search");
    eprintln!();
    eprintln!("Usage: site-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>     Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>        Override site and search seed");
    eprintln!("  --out <path>        Export final candidates to CSV");
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

/// Value following the flag at `args[*i]`; exits when it is missing.
fn flag_value(args: &[String], i: &mut usize, what: &str) -> String {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => cli.scenario_path = Some(flag_value(&args, &mut i, "a path argument")),
            "--preset" => cli.preset = Some(flag_value(&args, &mut i, "a name argument")),
            "--out" => cli.out = Some(flag_value(&args, &mut i, "a path argument")),
            "--seed" => {
                let raw = flag_value(&args, &mut i, "a u64 argument");
                match raw.parse::<u64>() {
                    Ok(s) => cli.seed_override = Some(s),
                    Err(_) => {
                        eprintln!("error: --seed value \"{raw}\" is not a valid u64");
                        process::exit(1);
                    }
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();
    init_tracing();

    // --scenario takes priority, then --preset, then baseline
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
        scenario.optimiser.strategy = scenario.optimiser.strategy.with_seed(seed);
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let site = synthetic::generate(
        &scenario.profile,
        scenario.baseline.clone(),
        scenario.simulation.seed,
    );
    info!(
        "Generated site: {} days of {} steps, seed {}",
        scenario.profile.days, scenario.profile.steps_per_day, scenario.simulation.seed
    );

    let send_temperatures = scenario
        .parameters
        .grid_values(HEAT_PUMP_SEND_TEMPERATURE)
        .into_iter()
        .map(|t| t as f32);
    let simulator = match Simulator::with_send_temperatures(
        &site,
        scenario.cost_model.clone(),
        send_temperatures,
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    if let Ok(peak) = simulator.peak_heat_load(&site.baseline) {
        info!("Baseline peak heat load: {:.1} kW", peak);
    }

    let cancel = CancellationToken::new();
    let result = match optimise_with(
        &simulator,
        &site.baseline,
        &scenario.parameters,
        &scenario.optimiser.objectives,
        &scenario.optimiser.strategy,
        &cancel,
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    print_report(
        scenario.optimiser.strategy.name(),
        simulator.baseline_metrics(),
        &result,
        &scenario.parameters,
    );

    if let Some(ref path) = cli.out {
        if let Err(e) = export_csv(&result, &scenario.parameters, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Candidates written to {path}");
    }
}
