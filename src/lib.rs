//! partalign - sector constraint algebra for partition placement
//!
//! Describes where a contiguous region of a block device may start, end, and
//! how long it may be, combines such descriptions, and solves them into
//! concrete regions.
//!
//! ```
//! use partalign::constraints::Constraint;
//! use partalign::geometry::{Alignment, Geometry};
//!
//! let device = Constraint::any(1_000).unwrap();
//! let mut aligned = device.duplicate();
//! aligned.set_start_align(Alignment::new(0, 8).unwrap()).unwrap();
//!
//! let region = aligned.solve_max().unwrap();
//! assert_eq!(region, Geometry::new(0, 1_000).unwrap());
//! assert!(aligned.is_solution(&region));
//! ```

pub mod arith;
pub mod constraints;
pub mod geometry;
pub mod solver;

pub use constraints::{Constraint, ConstraintError};
pub use geometry::{Alignment, Geometry, Range};
pub use solver::{Solver, SolverConfig};

/// Sector position or sector count on a device.
pub type Sector = i64;

/// Last addressable sector. One below `i64::MAX` so that the length of any
/// region, `end - start + 1`, is itself representable.
pub const MAX_SECTOR: Sector = Sector::MAX - 1;

/// Longest representable region: sectors `0..=MAX_SECTOR`.
pub const MAX_LENGTH: Sector = MAX_SECTOR + 1;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConstraintError>;
