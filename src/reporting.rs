//! Human-readable optimisation report.

use std::io::{self, Write};

use crate::optimiser::{OptimisationResult, Outcome, ParameterSpace};
use crate::sim::SimulationMetrics;

/// Prints the report to stdout.
pub fn print_report(
    strategy: &str,
    baseline: &SimulationMetrics,
    result: &OptimisationResult,
    space: &ParameterSpace,
) {
    let stdout = io::stdout();
    // A closed stdout is not worth failing the run over.
    let _ = write_report(&mut stdout.lock(), strategy, baseline, result, space);
}

/// Writes the baseline summary followed by every returned candidate.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_report(
    w: &mut impl Write,
    strategy: &str,
    baseline: &SimulationMetrics,
    result: &OptimisationResult,
    space: &ParameterSpace,
) -> io::Result<()> {
    writeln!(w, "--- Optimisation Report ({strategy}) ---")?;
    writeln!(
        w,
        "Evaluations: {} ({} infeasible), generations: {}{}",
        result.evaluations,
        result.failures,
        result.generations,
        if result.cancelled { ", cancelled" } else { "" }
    )?;
    writeln!(w, "\nBaseline:\n{baseline}")?;

    match &result.outcome {
        Outcome::NoFeasibleCandidate => {
            writeln!(w, "\nNo feasible candidate found.")?;
            return Ok(());
        }
        Outcome::Best(_) => writeln!(w, "\nBest candidate:")?,
        Outcome::ParetoFront(front) => {
            writeln!(w, "\nPareto front ({} candidates):", front.len())?;
        }
    }

    for (i, c) in result.candidates().iter().enumerate() {
        writeln!(w, "\n[{i}]")?;
        for (name, value) in space.names().zip(space.values(&c.genome)) {
            writeln!(w, "  {name} = {value}")?;
        }
        for (objective, v) in result.objectives.iter().zip(&c.objectives) {
            writeln!(w, "  {objective}: {:.3}", objective.reported(*v))?;
        }
        match c.result.comparison.payback_horizon_years {
            Some(years) => writeln!(w, "  payback: {years:.1} years")?,
            None => writeln!(w, "  payback: never")?,
        }
    }
    Ok(())
}
