//! Error taxonomy shared by the simulator, the aggregator and the optimiser.

use thiserror::Error;

/// Faults raised while validating inputs, evaluating a configuration or
/// running an optimisation.
///
/// Physical shortfalls (unmet load, exhausted grid headroom) are never
/// reported through this type; they are recorded as metrics.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimError {
    /// The site description violates a structural invariant.
    #[error("invalid site data: {0}")]
    InvalidSite(String),

    /// A configuration index does not address an entry of the site arrays.
    #[error("{field} index {index} is out of range (site defines {len})")]
    IndexOutOfRange {
        /// Dotted field path of the offending index.
        field: &'static str,
        /// Index requested by the configuration.
        index: usize,
        /// Number of entries available on the site.
        len: usize,
    },

    /// A parameter name does not map onto any configuration field.
    #[error("unknown parameter \"{0}\"")]
    UnknownParameter(String),

    /// The search space is empty or one of its ranges is malformed.
    #[error("invalid parameter space: {0}")]
    InvalidParameterSpace(String),

    /// The candidate's capital cost is above the configured limit.
    #[error("capex {capex:.2} exceeds limit {limit:.2}")]
    CapexLimitExceeded {
        /// Capital cost of the candidate.
        capex: f64,
        /// Limit carried by the candidate's configuration.
        limit: f64,
    },

    /// Per-site results cannot be combined into a portfolio.
    #[error("portfolio aggregation failed: {0}")]
    Portfolio(String),

    /// The run was stopped through its cancellation token.
    #[error("evaluation cancelled")]
    Cancelled,

    /// Scenario configuration failed to load or validate.
    #[error("{0}")]
    Config(String),
}

impl SimError {
    /// Returns `true` for faults that make a single candidate infeasible
    /// without invalidating the rest of an optimisation run.
    pub fn is_candidate_fault(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. }
                | Self::UnknownParameter(_)
                | Self::CapexLimitExceeded { .. }
        )
    }
}
