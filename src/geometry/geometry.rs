//! Concrete regions of consecutive sectors.

use std::fmt::Display;

use super::range::Range;
use crate::constraints::ConstraintError;
use crate::{Sector, MAX_SECTOR};

/// Concrete contiguous region: `length` sectors starting at `start`.
///
/// # Invariants
///
/// - `start >= 0`
/// - `length >= 1`
/// - `end() = start + length - 1 <= MAX_SECTOR`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGeometry"))]
pub struct Geometry {
    start: Sector,
    length: Sector,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGeometry {
    start: Sector,
    length: Sector,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGeometry> for Geometry {
    type Error = ConstraintError;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        Geometry::new(raw.start, raw.length)
    }
}

impl Geometry {
    /// Creates the region `[start, start + length - 1]`.
    ///
    /// # Errors
    ///
    /// [`ConstraintError::InvalidArgument`] if `start` is negative, `length`
    /// is not positive, or the region runs past `MAX_SECTOR`.
    pub fn new(start: Sector, length: Sector) -> crate::Result<Self> {
        if start < 0 {
            return Err(ConstraintError::InvalidArgument(format!(
                "geometry start must be >= 0, got {start}"
            )));
        }
        if length < 1 {
            return Err(ConstraintError::InvalidArgument(format!(
                "geometry length must be >= 1, got {length}"
            )));
        }
        match start.checked_add(length - 1) {
            Some(end) if end <= MAX_SECTOR => Ok(Self { start, length }),
            _ => Err(ConstraintError::InvalidArgument(format!(
                "geometry of {length} sectors at {start} runs past sector {MAX_SECTOR}"
            ))),
        }
    }

    /// Creates the region `[start, end]` from inclusive bounds.
    pub fn from_bounds(start: Sector, end: Sector) -> crate::Result<Self> {
        let range = Range::new(start, end)?;
        Ok(Self::from_range(&range))
    }

    pub(crate) const fn from_range(range: &Range) -> Self {
        Self {
            start: range.min(),
            length: range.len(),
        }
    }

    pub const fn start(&self) -> Sector {
        self.start
    }

    pub const fn length(&self) -> Sector {
        self.length
    }

    /// Last sector of the region (inclusive).
    pub const fn end(&self) -> Sector {
        self.start + self.length - 1
    }

    pub const fn to_range(&self) -> Range {
        Range::spanning(self.start, self.end())
    }

    pub const fn contains_sector(&self, sector: Sector) -> bool {
        self.start <= sector && sector <= self.end()
    }

    /// Returns true if `other` lies entirely within this region.
    pub const fn contains(&self, other: &Geometry) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }

    pub const fn overlaps(&self, other: &Geometry) -> bool {
        self.start <= other.end() && other.start <= self.end()
    }

    /// Sectors common to both regions, or `None` if they are disjoint.
    pub fn intersection(&self, other: &Geometry) -> Option<Geometry> {
        self.to_range()
            .intersection(&other.to_range())
            .map(|range| Geometry::from_range(&range))
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={} ({} sectors)", self.start, self.end(), self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(start: Sector, length: Sector) -> Geometry {
        Geometry::new(start, length).unwrap()
    }

    #[test]
    fn end_is_inclusive() {
        let g = geom(10, 5);
        assert_eq!(g.end(), 14);
        assert_eq!(geom(7, 1).end(), 7);
    }

    #[test]
    fn rejects_invalid_geometry() {
        assert!(Geometry::new(-1, 5).is_err());
        assert!(Geometry::new(0, 0).is_err());
        assert!(Geometry::new(MAX_SECTOR, 2).is_err());
        assert!(Geometry::new(Sector::MAX, 1).is_err());
        assert!(Geometry::new(MAX_SECTOR, 1).is_ok());
        assert!(Geometry::new(0, crate::MAX_LENGTH).is_ok());
    }

    #[test]
    fn from_bounds_matches_new() {
        assert_eq!(Geometry::from_bounds(10, 14).unwrap(), geom(10, 5));
        assert!(Geometry::from_bounds(14, 10).is_err());
    }

    #[test]
    fn containment_and_overlap() {
        let outer = geom(0, 100);
        let inner = geom(10, 5);
        let straddling = geom(95, 10);
        let apart = geom(200, 3);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&straddling));
        assert!(outer.overlaps(&straddling));
        assert!(!outer.overlaps(&apart));
        assert!(outer.contains_sector(99));
        assert!(!outer.contains_sector(100));
    }

    #[test]
    fn intersection_of_regions() {
        let a = geom(0, 100);
        let b = geom(95, 10);
        assert_eq!(a.intersection(&b), Some(geom(95, 5)));
        assert_eq!(a.intersection(&geom(200, 3)), None);
    }

    #[test]
    fn display_format() {
        assert_eq!(geom(10, 5).to_string(), "10..=14 (5 sectors)");
    }
}
