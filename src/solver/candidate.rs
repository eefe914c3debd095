//! Scored solution candidate and its ordering.

use std::cmp::Ordering;

use crate::geometry::Geometry;

/// A solution together with its distance to the reference region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub(crate) geometry: Geometry,
    pub(crate) distance: u64,
}

impl Candidate {
    pub fn new(geometry: Geometry, reference: &Geometry) -> Self {
        Self {
            geometry,
            distance: manhattan_distance(&geometry, reference),
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn distance(&self) -> u64 {
        self.distance
    }

    /// Returns true if this candidate should replace `other` as the best one.
    pub fn is_better_than(&self, other: &Candidate) -> bool {
        compare_candidates(self, other) == Ordering::Less
    }
}

/// `|a.start - b.start| + |a.end - b.end|`.
///
/// Sectors lie in `[0, MAX_SECTOR]`, so the sum always fits in a `u64`.
pub fn manhattan_distance(a: &Geometry, b: &Geometry) -> u64 {
    a.start().abs_diff(b.start()) + a.end().abs_diff(b.end())
}

/// Orders by distance, then smaller start, then smaller end.
pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    a.distance
        .cmp(&b.distance)
        .then_with(|| a.geometry.start().cmp(&b.geometry.start()))
        .then_with(|| a.geometry.end().cmp(&b.geometry.end()))
}
