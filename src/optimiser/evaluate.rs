//! Fitness evaluation shared by every search strategy.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::objective::{Objective, objective_vector};
use super::space::{Genome, ParameterSpace};
use crate::cancel::CancellationToken;
use crate::error::SimError;
use crate::sim::{SimulationResult, Simulator};
use crate::task::TaskData;

/// A feasible, evaluated configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub genome: Genome,
    pub task: TaskData,
    /// Objective values in minimisation form.
    pub objectives: Vec<f64>,
    pub result: SimulationResult,
}

/// Outcome of evaluating a batch of genomes.
#[derive(Debug, Default)]
pub struct Batch {
    /// Feasible candidates, in input order.
    pub candidates: Vec<Candidate>,
    /// Completed evaluations, feasible or not.
    pub evaluations: usize,
    /// Evaluations rejected as infeasible.
    pub failures: usize,
    /// At least one genome was skipped or interrupted by cancellation.
    pub cancelled: bool,
}

/// Turns genomes into candidates by running the simulator.
pub struct Evaluator<'s, 'a> {
    simulator: &'s Simulator<'a>,
    space: &'s ParameterSpace,
    template: &'s TaskData,
    objectives: &'s [Objective],
    cancel: &'s CancellationToken,
}

impl<'s, 'a> Evaluator<'s, 'a> {
    pub fn new(
        simulator: &'s Simulator<'a>,
        space: &'s ParameterSpace,
        template: &'s TaskData,
        objectives: &'s [Objective],
        cancel: &'s CancellationToken,
    ) -> Self {
        Self {
            simulator,
            space,
            template,
            objectives,
            cancel,
        }
    }

    pub fn space(&self) -> &ParameterSpace {
        self.space
    }

    pub fn objectives(&self) -> &[Objective] {
        self.objectives
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Simulates `task` and reads its objective vector.
    ///
    /// The capex limit is checked before simulating.
    ///
    /// # Errors
    ///
    /// `SimError::CapexLimitExceeded` above the task's limit, any
    /// configuration fault from the simulator, or `SimError::Cancelled`.
    pub fn evaluate(&self, task: &TaskData) -> Result<(Vec<f64>, SimulationResult), SimError> {
        if self.cancel.is_cancelled() {
            return Err(SimError::Cancelled);
        }
        let capex = self.simulator.capex_breakdown(task)?.total();
        if capex > task.config.capex_limit {
            return Err(SimError::CapexLimitExceeded {
                capex,
                limit: task.config.capex_limit,
            });
        }
        let result = self.simulator.simulate_cancellable(task, self.cancel)?;
        Ok((objective_vector(self.objectives, &result), result))
    }

    /// Builds and evaluates the candidate at `genome`.
    ///
    /// # Errors
    ///
    /// As [`evaluate`](Self::evaluate), plus unknown parameter names.
    pub fn evaluate_genome(&self, genome: &[usize]) -> Result<Candidate, SimError> {
        let task = self.space.task(self.template, genome)?;
        let (objectives, result) = self.evaluate(&task)?;
        Ok(Candidate {
            genome: genome.to_vec(),
            task,
            objectives,
            result,
        })
    }

    /// Evaluates `genomes` in parallel.
    ///
    /// Infeasible candidates are counted and dropped. Output order follows
    /// input order regardless of scheduling.
    ///
    /// # Errors
    ///
    /// Propagates faults that are not attributable to the candidate.
    pub fn evaluate_batch(&self, genomes: &[Genome]) -> Result<Batch, SimError> {
        let outcomes: Vec<Result<Candidate, SimError>> = genomes
            .par_iter()
            .map(|g| self.evaluate_genome(g))
            .collect();

        let mut batch = Batch::default();
        for outcome in outcomes {
            match outcome {
                Ok(candidate) => {
                    batch.evaluations += 1;
                    batch.candidates.push(candidate);
                }
                Err(SimError::Cancelled) => batch.cancelled = true,
                Err(e) if e.is_candidate_fault() => {
                    debug!("Candidate rejected: {}", e);
                    batch.evaluations += 1;
                    batch.failures += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(batch)
    }
}

/// Running totals across the batches of one search.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tally {
    pub evaluations: usize,
    pub failures: usize,
    pub cancelled: bool,
}

impl Tally {
    pub fn record(&mut self, batch: &Batch) {
        self.evaluations += batch.evaluations;
        self.failures += batch.failures;
        self.cancelled |= batch.cancelled;
    }
}
