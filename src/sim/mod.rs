/// Capital cost model and standing charges.
pub mod capex;
pub mod comparison;
pub mod engine;
pub mod metrics;
/// Portfolio aggregation across sites.
pub mod portfolio;
pub mod power_balance;

pub use capex::{CapexBreakdown, CostModel};
pub use comparison::Comparison;
pub use engine::{Simulator, simulate};
pub use metrics::{EnvironmentalGrade, SimulationMetrics, SimulationResult};
pub use portfolio::aggregate;
