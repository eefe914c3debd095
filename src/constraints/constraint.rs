//! The constraint value type and its canonical constructors.

use std::fmt::Display;

use super::error::ConstraintError;
use crate::geometry::{Alignment, Geometry, Range};
use crate::solver::Solver;
use crate::Sector;

/// Restrictions describing a family of acceptable regions.
///
/// A [`Geometry`] `g` is a solution when:
/// 1. `g.start()` lies in `start_range` and satisfies `start_align`,
/// 2. `g.end()` lies in `end_range` and satisfies `end_align`,
/// 3. `min_size <= g.length() <= max_size`.
///
/// # Invariants
///
/// `1 <= min_size <= max_size`, and both ranges are non-empty (guaranteed by
/// [`Range`]). Every constructor and setter checks this before a value
/// becomes observable; a constraint may still have no solution at all.
///
/// Constraints are plain values. [`Constraint::duplicate`] (or `clone`) yields
/// an independent copy; there is no shared state between instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawConstraint"))]
pub struct Constraint {
    start_align: Alignment,
    end_align: Alignment,
    start_range: Range,
    end_range: Range,
    min_size: Sector,
    max_size: Sector,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawConstraint {
    start_align: Alignment,
    end_align: Alignment,
    start_range: Range,
    end_range: Range,
    min_size: Sector,
    max_size: Sector,
}

#[cfg(feature = "serde")]
impl TryFrom<RawConstraint> for Constraint {
    type Error = ConstraintError;

    fn try_from(raw: RawConstraint) -> Result<Self, Self::Error> {
        Constraint::new(
            raw.start_align,
            raw.end_align,
            raw.start_range,
            raw.end_range,
            raw.min_size,
            raw.max_size,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────
// Constructors
// ─────────────────────────────────────────────────────────────────────

impl Constraint {
    /// Creates a constraint from all six parts.
    ///
    /// # Errors
    ///
    /// [`ConstraintError::InvalidArgument`] if `min_size < 1` or
    /// `min_size > max_size`.
    pub fn new(
        start_align: Alignment,
        end_align: Alignment,
        start_range: Range,
        end_range: Range,
        min_size: Sector,
        max_size: Sector,
    ) -> crate::Result<Self> {
        let constraint = Self {
            start_align,
            end_align,
            start_range,
            end_range,
            min_size,
            max_size,
        };
        constraint.validate()?;
        Ok(constraint)
    }

    /// Regions that contain `min` and lie within `max`.
    ///
    /// # Errors
    ///
    /// [`ConstraintError::InvalidArgument`] if `min` is not inside `max`.
    pub fn from_min_max(min: &Geometry, max: &Geometry) -> crate::Result<Self> {
        if !max.contains(min) {
            return Err(ConstraintError::InvalidArgument(format!(
                "minimum region {min} is not inside maximum region {max}"
            )));
        }
        Self::new(
            Alignment::any(),
            Alignment::any(),
            Range::new(max.start(), min.start())?,
            Range::new(min.end(), max.end())?,
            min.length(),
            max.length(),
        )
    }

    /// Regions that contain `min`, anywhere in the addressable sector space.
    pub fn from_min(min: &Geometry) -> crate::Result<Self> {
        Self::from_min_max(min, &Geometry::from_range(&Range::full()))
    }

    /// Regions that lie within `max`.
    pub fn from_max(max: &Geometry) -> Self {
        let range = max.to_range();
        Self {
            start_align: Alignment::any(),
            end_align: Alignment::any(),
            start_range: range,
            end_range: range,
            min_size: 1,
            max_size: max.length(),
        }
    }

    /// Every region on a device of `sector_count` sectors.
    ///
    /// # Errors
    ///
    /// [`ConstraintError::InvalidArgument`] if `sector_count < 1`.
    pub fn any(sector_count: Sector) -> crate::Result<Self> {
        if sector_count < 1 {
            return Err(ConstraintError::InvalidArgument(format!(
                "sector count must be >= 1, got {sector_count}"
            )));
        }
        let whole = Geometry::new(0, sector_count)?;
        Ok(Self::from_max(&whole))
    }

    /// The constraint whose only solution is `geom`.
    pub fn exact(geom: &Geometry) -> Self {
        Self {
            start_align: Alignment::pinned(geom.start()),
            end_align: Alignment::pinned(geom.end()),
            start_range: Range::point(geom.start()),
            end_range: Range::point(geom.end()),
            min_size: geom.length(),
            max_size: geom.length(),
        }
    }

    /// Returns an independent copy of this constraint.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Accessors and validated mutation
// ─────────────────────────────────────────────────────────────────────

impl Constraint {
    pub fn start_align(&self) -> Alignment {
        self.start_align
    }

    pub fn end_align(&self) -> Alignment {
        self.end_align
    }

    pub fn start_range(&self) -> Range {
        self.start_range
    }

    pub fn end_range(&self) -> Range {
        self.end_range
    }

    pub fn min_size(&self) -> Sector {
        self.min_size
    }

    pub fn max_size(&self) -> Sector {
        self.max_size
    }

    pub fn set_start_align(&mut self, align: Alignment) -> crate::Result<()> {
        self.update(|c| c.start_align = align)
    }

    pub fn set_end_align(&mut self, align: Alignment) -> crate::Result<()> {
        self.update(|c| c.end_align = align)
    }

    pub fn set_start_range(&mut self, range: Range) -> crate::Result<()> {
        self.update(|c| c.start_range = range)
    }

    pub fn set_end_range(&mut self, range: Range) -> crate::Result<()> {
        self.update(|c| c.end_range = range)
    }

    /// Replaces the minimum size; rejected if it breaks `1 <= min <= max`.
    pub fn set_min_size(&mut self, min_size: Sector) -> crate::Result<()> {
        self.update(|c| c.min_size = min_size)
    }

    /// Replaces the maximum size; rejected if it breaks `1 <= min <= max`.
    pub fn set_max_size(&mut self, max_size: Sector) -> crate::Result<()> {
        self.update(|c| c.max_size = max_size)
    }

    /// Applies `change` to a copy and commits it only if the copy is valid.
    fn update<F: FnOnce(&mut Constraint)>(&mut self, change: F) -> crate::Result<()> {
        let mut candidate = self.clone();
        change(&mut candidate);
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    fn validate(&self) -> crate::Result<()> {
        if self.min_size < 1 {
            return Err(ConstraintError::InvalidArgument(format!(
                "minimum size must be >= 1, got {}",
                self.min_size
            )));
        }
        if self.min_size > self.max_size {
            return Err(ConstraintError::InvalidArgument(format!(
                "minimum size {} exceeds maximum size {}",
                self.min_size, self.max_size
            )));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Queries and combinators
// ─────────────────────────────────────────────────────────────────────

impl Constraint {
    /// Returns true if `geom` satisfies every part of this constraint.
    pub fn is_solution(&self, geom: &Geometry) -> bool {
        self.start_range.contains(geom.start())
            && self.start_align.is_aligned(geom.start())
            && self.end_range.contains(geom.end())
            && self.end_align.is_aligned(geom.end())
            && self.min_size <= geom.length()
            && geom.length() <= self.max_size
    }

    /// Constraint satisfied exactly by regions satisfying both `self` and `other`.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::Unsatisfiable`] if the two share no region by
    ///   ranges, sizes, or alignment residues.
    /// - [`ConstraintError::Overflow`] if merging the alignments overflows.
    pub fn intersect(&self, other: &Constraint) -> crate::Result<Constraint> {
        super::operations::compute_intersection(self, other)
    }

    /// Intersects every constraint yielded by `constraints`.
    ///
    /// # Errors
    ///
    /// [`ConstraintError::InvalidArgument`] for an empty input, otherwise as
    /// [`Constraint::intersect`].
    pub fn intersect_all<'a, I>(constraints: I) -> crate::Result<Constraint>
    where
        I: IntoIterator<Item = &'a Constraint>,
    {
        let mut iter = constraints.into_iter();
        let first = iter.next().ok_or_else(|| {
            ConstraintError::InvalidArgument("no constraints to intersect".to_string())
        })?;
        iter.try_fold(first.duplicate(), |acc, next| acc.intersect(next))
    }

    /// Largest solution, using the default solver configuration.
    pub fn solve_max(&self) -> crate::Result<Geometry> {
        Solver::default().solve_max(self)
    }

    /// Solution nearest to `reference`, using the default solver configuration.
    pub fn solve_nearest(&self, reference: &Geometry) -> crate::Result<Geometry> {
        Solver::default().solve_nearest(self, reference)
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "start {} align {}, end {} align {}, size [{}, {}]",
            self.start_range,
            self.start_align,
            self.end_range,
            self.end_align,
            self.min_size,
            self.max_size
        )
    }
}
