//! Constraint solvers.
//!
//! Turns a [`Constraint`] into concrete regions:
//!
//! 1. **Largest solution** ([`Solver::solve_max`]): finds the longest length
//!    any solution can have, then the earliest start of a solution with that
//!    length. Ties on length therefore go to the smaller start.
//!
//! 2. **Nearest solution** ([`Solver::solve_nearest`]): first proves the
//!    constraint is satisfiable, then searches outward from the reference
//!    along whichever is cheaper: aligned starts, aligned ends, or the
//!    admissible lengths. Keeps the candidate with the smallest distance
//!    `|Δstart| + |Δend|`. Ties go to the smaller start, then the smaller end.
//!
//! Both searches are exact within their budgets (see [`SolverConfig`]).
//!
//! # Module Structure
//!
//! - [`candidate`] - Scored candidate and its ordering
//! - [`config`] - Search budgets
//! - [`longest`] - Longest-length scan and earliest start for a length
//! - [`nearest`] - Outward search around a reference region

pub mod candidate;
pub mod config;
pub mod longest;
pub mod nearest;


use tracing::trace;

use crate::constraints::{Constraint, ConstraintError};
use crate::geometry::Geometry;

pub use candidate::{manhattan_distance, Candidate};
pub use config::{ConfigError, SolverConfig};

/// Solves constraints within the budgets of its [`SolverConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Creates a solver with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Search budgets; see [`SolverConfig::validate`]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Returns true if `geom` satisfies `constraint`.
    pub fn is_solution(&self, constraint: &Constraint, geom: &Geometry) -> bool {
        constraint.is_solution(geom)
    }

    /// Longest solution of `constraint`; the smallest start among equals.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::Unsatisfiable`] if the constraint has no solution.
    /// - [`ConstraintError::SearchLimit`] if the scan exceeds `search_limit`.
    pub fn solve_max(&self, constraint: &Constraint) -> crate::Result<Geometry> {
        let length = longest::longest_length(constraint, self.config.search_limit)?;
        let start = longest::earliest_start(constraint, length).ok_or_else(|| {
            ConstraintError::Unsatisfiable(format!(
                "no aligned start admits a region of {length} sectors"
            ))
        })?;
        trace!(start, length, "largest solution");
        let found = Geometry::new(start, length)?;
        debug_assert!(constraint.is_solution(&found));
        Ok(found)
    }

    /// Solution of `constraint` nearest to `reference`.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::Unsatisfiable`] if the constraint has no solution.
    /// - [`ConstraintError::SearchLimit`] if a budget runs out before any
    ///   solution is found.
    pub fn solve_nearest(
        &self,
        constraint: &Constraint,
        reference: &Geometry,
    ) -> crate::Result<Geometry> {
        let found = nearest::nearest(constraint, reference, &self.config)?;
        debug_assert!(constraint.is_solution(&found));
        Ok(found)
    }
}
