//! Exhaustive enumeration of the parameter grid.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::evaluate::{Candidate, Evaluator, Tally};
use super::{OptimisationResult, Outcome, first_front};
use crate::error::SimError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSearchConfig {
    /// Grid points evaluated in parallel before the archive is pruned and
    /// cancellation is rechecked.
    pub chunk_size: usize,
}

impl Default for GridSearchConfig {
    fn default() -> Self {
        Self { chunk_size: 256 }
    }
}

/// Evaluates every grid point once, in chunks.
///
/// With one objective the lowest value wins (ties go to the earlier grid
/// point); with several, the non-dominated archive is kept.
///
/// # Errors
///
/// `SimError::InvalidParameterSpace` if the grid cannot be enumerated.
pub fn run(
    ev: &Evaluator<'_, '_>,
    config: &GridSearchConfig,
) -> Result<OptimisationResult, SimError> {
    let total = ev.space().size().ok_or_else(|| {
        SimError::InvalidParameterSpace("grid has more points than can be enumerated".into())
    })?;
    let chunk = config.chunk_size.max(1);
    let single = ev.objectives().len() == 1;
    info!("Grid search over {} candidates in chunks of {}", total, chunk);

    let mut tally = Tally::default();
    let mut archive: Vec<Candidate> = Vec::new();
    let mut start = 0;

    while start < total {
        if ev.is_cancelled() {
            tally.cancelled = true;
            break;
        }
        let end = start.saturating_add(chunk).min(total);
        let genomes: Vec<_> = (start..end).map(|i| ev.space().decode(i)).collect();
        let batch = ev.evaluate_batch(&genomes)?;
        tally.record(&batch);
        archive.extend(batch.candidates);
        archive = if single {
            best_only(archive)
        } else {
            first_front(archive)
        };
        debug!("Grid search at {}/{}, archive holds {}", end, total, archive.len());
        if tally.cancelled {
            break;
        }
        start = end;
    }

    if tally.cancelled {
        warn!(
            "Grid search cancelled after {} of {} evaluations",
            tally.evaluations, total
        );
    }

    let outcome = match (single, archive.is_empty()) {
        (_, true) => Outcome::NoFeasibleCandidate,
        (true, false) => Outcome::Best(Box::new(archive.swap_remove(0))),
        (false, false) => Outcome::ParetoFront(archive),
    };
    Ok(OptimisationResult::new(ev.objectives(), outcome, tally, 0))
}

fn best_only(candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates
        .into_iter()
        .reduce(|best, c| if c.objectives[0] < best.objectives[0] { c } else { best })
        .into_iter()
        .collect()
}
