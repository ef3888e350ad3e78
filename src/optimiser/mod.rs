//! Configuration search over a discretised parameter space.
//!
//! Every strategy shares one [`Evaluator`]: a candidate is built from a
//! template configuration and a grid-index genome, simulated against the
//! site baseline and scored on the requested objectives. Candidates that
//! fail (bad indices, capex over limit) are counted and excluded.

pub mod evaluate;
pub mod genetic;
pub mod grid_search;
pub mod nsga2;
pub mod objective;
pub mod operators;
pub mod pareto;
pub mod space;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use self::evaluate::{Candidate, Evaluator};
pub use self::genetic::{GeneticConfig, Selection};
pub use self::grid_search::GridSearchConfig;
pub use self::nsga2::Nsga2Config;
pub use self::objective::Objective;
pub use self::space::{Genome, ParameterRange, ParameterSpace};
pub use crate::cancel::CancellationToken;

use self::evaluate::Tally;
use crate::error::SimError;
use crate::sim::{CostModel, Simulator};
use crate::site::SiteData;
use crate::task::TaskData;

/// Parameter whose grid values need their own heat pump lookup.
pub const HEAT_PUMP_SEND_TEMPERATURE: &str = "heat_pump.send_temperature";

/// Search strategy and its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    GridSearch(GridSearchConfig),
    GeneticAlgorithm(GeneticConfig),
    Nsga2(Nsga2Config),
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::Nsga2(Nsga2Config::default())
    }
}

impl StrategyConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GridSearch(_) => "grid_search",
            Self::GeneticAlgorithm(_) => "genetic_algorithm",
            Self::Nsga2(_) => "nsga2",
        }
    }

    /// Replaces the random seed of stochastic strategies.
    pub fn with_seed(mut self, seed: u64) -> Self {
        match &mut self {
            Self::GridSearch(_) => {}
            Self::GeneticAlgorithm(c) => c.seed = seed,
            Self::Nsga2(c) => c.seed = seed,
        }
        self
    }
}

/// What a search found.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Best candidate of a single-objective (or weighted) search.
    Best(Box<Candidate>),
    /// Non-dominated candidates of a multi-objective search.
    ParetoFront(Vec<Candidate>),
    /// Every evaluated candidate was infeasible, or none was evaluated.
    NoFeasibleCandidate,
}

/// Result of [`optimise`].
#[derive(Debug, Clone)]
pub struct OptimisationResult {
    pub objectives: Vec<Objective>,
    pub outcome: Outcome,
    /// Completed evaluations, feasible or not.
    pub evaluations: usize,
    /// Infeasible evaluations.
    pub failures: usize,
    /// Completed generations (zero for grid search).
    pub generations: usize,
    /// The search stopped early on cancellation.
    pub cancelled: bool,
}

impl OptimisationResult {
    fn new(objectives: &[Objective], outcome: Outcome, tally: Tally, generations: usize) -> Self {
        Self {
            objectives: objectives.to_vec(),
            outcome,
            evaluations: tally.evaluations,
            failures: tally.failures,
            generations,
            cancelled: tally.cancelled,
        }
    }

    /// The best candidate, or the front, as a slice.
    pub fn candidates(&self) -> &[Candidate] {
        match &self.outcome {
            Outcome::Best(c) => std::slice::from_ref(&**c),
            Outcome::ParetoFront(front) => front,
            Outcome::NoFeasibleCandidate => &[],
        }
    }

    pub fn best(&self) -> Option<&Candidate> {
        match &self.outcome {
            Outcome::Best(c) => Some(c.as_ref()),
            _ => None,
        }
    }
}

/// Runs a search on `site`, starting from its baseline configuration and
/// the default cost model.
///
/// # Errors
///
/// `SimError::InvalidSite` for malformed site data or an invalid baseline,
/// `SimError::InvalidParameterSpace` / `SimError::UnknownParameter` for a
/// bad space, and `SimError::Config` for bad strategy settings.
pub fn optimise(
    site: &SiteData,
    space: &ParameterSpace,
    objectives: &[Objective],
    strategy: &StrategyConfig,
    cancel: &CancellationToken,
) -> Result<OptimisationResult, SimError> {
    let send_temperatures = space
        .grid_values(HEAT_PUMP_SEND_TEMPERATURE)
        .into_iter()
        .map(|t| t as f32);
    let simulator =
        Simulator::with_send_temperatures(site, CostModel::default(), send_temperatures)?;
    optimise_with(&simulator, &site.baseline, space, objectives, strategy, cancel)
}

/// As [`optimise`], reusing a prepared simulator and a custom template.
///
/// # Errors
///
/// As [`optimise`], minus site validation.
pub fn optimise_with(
    simulator: &Simulator<'_>,
    template: &TaskData,
    space: &ParameterSpace,
    objectives: &[Objective],
    strategy: &StrategyConfig,
    cancel: &CancellationToken,
) -> Result<OptimisationResult, SimError> {
    if objectives.is_empty() {
        return Err(SimError::Config("at least one objective is required".into()));
    }
    space.validate(template, simulator.site().solar_yields.len())?;
    let evaluator = Evaluator::new(simulator, space, template, objectives, cancel);
    match strategy {
        StrategyConfig::GridSearch(c) => grid_search::run(&evaluator, c),
        StrategyConfig::GeneticAlgorithm(c) => genetic::run(&evaluator, c),
        StrategyConfig::Nsga2(c) => nsga2::run(&evaluator, c),
    }
}

/// Drops every candidate whose genome appeared earlier in `candidates`.
fn unique_genomes(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.genome.clone()))
        .collect()
}

/// First non-dominated front of `candidates`, one per genome, in input
/// order.
fn first_front(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let candidates = unique_genomes(candidates);
    let points: Vec<Vec<f64>> = candidates.iter().map(|c| c.objectives.clone()).collect();
    let Some(front) = pareto::non_dominated_sort(&points).into_iter().next() else {
        return Vec::new();
    };
    let mut keep = vec![false; candidates.len()];
    for i in front {
        keep[i] = true;
    }
    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(c, k)| k.then_some(c))
        .collect()
}
