//! Site energy system simulation and configuration search.
//!
//! [`simulate`] runs one configuration of a site's energy system over the
//! site's time series and compares it with the site baseline;
//! [`sim::portfolio::aggregate`] combines per-site results; [`optimise`]
//! searches a parameter space with grid search, a genetic algorithm or
//! NSGA-II.

pub mod cancel;
pub mod config;
pub mod devices;
pub mod error;
/// File export of optimisation results.
pub mod io {
    pub mod export;
}
pub mod optimiser;
/// Pre-computed per-site lookup tables.
pub mod precompute;
pub mod reporting;
/// Simulation engine, metrics, costing and portfolio aggregation.
pub mod sim;
pub mod site;
pub mod task;
pub mod telemetry;

pub use cancel::CancellationToken;
pub use error::SimError;
pub use optimiser::{OptimisationResult, optimise};
pub use sim::{SimulationResult, Simulator, simulate};
pub use site::SiteData;
pub use task::TaskData;
