//! CSV export for optimisation candidates.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::optimiser::{Candidate, OptimisationResult, ParameterSpace};

/// Fixed result columns written after the parameter and objective columns.
const RESULT_COLUMNS: [&str; 8] = [
    "total_capex",
    "annual_operating_cost",
    "total_annualised_cost",
    "cost_balance",
    "combined_carbon_balance",
    "payback_horizon_years",
    "total_electrical_shortfall",
    "environmental_grade",
];

/// Exports the final candidates of an optimisation to a CSV file.
///
/// One row per candidate (the best, or every member of the front), with
/// one column per parameter, per objective and per key result figure.
///
/// # Arguments
///
/// * `result` - Outcome of the search
/// * `space` - Parameter space the search ran over
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(
    result: &OptimisationResult,
    space: &ParameterSpace,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, space, buf)
}

/// Writes the final candidates as CSV to any writer.
///
/// Undefined ratios (no payback, no rating) are written as empty fields.
/// Output is deterministic for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(
    result: &OptimisationResult,
    space: &ParameterSpace,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let header: Vec<String> = std::iter::once("candidate".to_string())
        .chain(space.names().map(str::to_string))
        .chain(result.objectives.iter().map(|o| format!("objective_{o}")))
        .chain(RESULT_COLUMNS.iter().map(|c| (*c).to_string()))
        .collect();
    wtr.write_record(&header)?;

    for (i, candidate) in result.candidates().iter().enumerate() {
        wtr.write_record(row(i, candidate, result, space))?;
    }

    wtr.flush()?;
    Ok(())
}

fn row(
    i: usize,
    c: &Candidate,
    result: &OptimisationResult,
    space: &ParameterSpace,
) -> Vec<String> {
    let m = &c.result.metrics;
    let cmp = &c.result.comparison;
    let optional = |v: Option<f64>| v.map(|x| format!("{x:.4}")).unwrap_or_default();

    let mut fields = vec![i.to_string()];
    fields.extend(space.values(&c.genome).iter().map(|v| format!("{v}")));
    fields.extend(
        result
            .objectives
            .iter()
            .zip(&c.objectives)
            .map(|(o, v)| format!("{:.4}", o.reported(*v))),
    );
    fields.extend([
        format!("{:.2}", m.total_capex),
        format!("{:.2}", m.annual_operating_cost),
        format!("{:.2}", m.total_annualised_cost),
        format!("{:.2}", cmp.cost_balance),
        format!("{:.2}", cmp.combined_carbon_balance),
        optional(cmp.payback_horizon_years),
        format!("{:.4}", m.total_electrical_shortfall),
        m.environmental_grade.map(|g| g.to_string()).unwrap_or_default(),
    ]);
    fields
}
