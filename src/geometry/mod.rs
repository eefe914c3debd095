//! Sector-space value types: alignments, ranges, and concrete regions.
//!
//! All three are immutable `Copy` values validated on construction, so a live
//! instance always satisfies its invariant.

mod alignment;
#[allow(clippy::module_inception)]
mod geometry;
mod range;

pub use alignment::Alignment;
pub use geometry::Geometry;
pub use range::Range;
