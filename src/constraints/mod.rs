//! Constraints on where a region may start and end and how long it may be.

pub mod constraint;
pub mod error;
pub mod operations;

pub use constraint::Constraint;
pub use error::ConstraintError;
