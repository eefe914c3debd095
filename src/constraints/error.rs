use thiserror::Error;

/// Errors produced by constraint construction, combination, and solving.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// Malformed input to a constructor or setter.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The request was well-formed but no region satisfies it.
    #[error("No region satisfies the constraint: {0}")]
    Unsatisfiable(String),

    /// Alignment arithmetic left the representable sector range.
    #[error("Sector arithmetic overflow: {0}")]
    Overflow(String),

    /// A solver visited its configured number of candidates without an answer.
    #[error("Search stopped after {limit} candidates without a solution")]
    SearchLimit { limit: usize },
}

impl ConstraintError {
    /// Returns true for the expected "no solution" outcome.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, ConstraintError::Unsatisfiable(_))
    }
}
