//! Closed sector interval.

use std::fmt::Display;

use crate::constraints::ConstraintError;
use crate::{Sector, MAX_SECTOR};

/// Closed range `[min, max]` of sector positions.
///
/// A live `Range` is never empty: `0 <= min <= max <= MAX_SECTOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    min: Sector,
    max: Sector,
}

// Ranges are non-empty by construction, so there is no `is_empty`.
#[allow(clippy::len_without_is_empty)]
impl Range {
    /// Creates range `[min, max]`.
    ///
    /// # Errors
    ///
    /// [`ConstraintError::InvalidArgument`] if `min > max` or either bound lies
    /// outside the addressable sector space.
    pub fn new(min: Sector, max: Sector) -> crate::Result<Self> {
        if min < 0 || max > MAX_SECTOR {
            return Err(ConstraintError::InvalidArgument(format!(
                "range [{min}, {max}] lies outside sectors [0, {MAX_SECTOR}]"
            )));
        }
        if min > max {
            return Err(ConstraintError::InvalidArgument(format!(
                "range [{min}, {max}] is inverted"
            )));
        }
        Ok(Self { min, max })
    }

    /// The single-sector range `[sector, sector]`.
    ///
    /// Callers guarantee `sector` is addressable.
    pub(crate) const fn point(sector: Sector) -> Self {
        Self {
            min: sector,
            max: sector,
        }
    }

    /// Range `[min, max]` from bounds already known to be valid.
    pub(crate) const fn spanning(min: Sector, max: Sector) -> Self {
        debug_assert!(0 <= min && min <= max && max <= MAX_SECTOR);
        Self { min, max }
    }

    /// Range covering the whole addressable sector space.
    pub const fn full() -> Self {
        Self {
            min: 0,
            max: MAX_SECTOR,
        }
    }

    pub const fn min(&self) -> Sector {
        self.min
    }

    pub const fn max(&self) -> Sector {
        self.max
    }

    /// Number of sectors in the range.
    pub const fn len(&self) -> Sector {
        self.max - self.min + 1
    }

    /// Returns true if `sector` ∈ `[min, max]`.
    pub const fn contains(&self, sector: Sector) -> bool {
        self.min <= sector && sector <= self.max
    }

    /// Checks if this range shares at least one sector with another range.
    pub const fn overlaps(&self, other: &Range) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Returns the common part of both ranges, or `None` if they are disjoint.
    pub fn intersection(&self, other: &Range) -> Option<Range> {
        if self.overlaps(other) {
            Some(Range {
                min: self.min.max(other.min),
                max: self.max.min(other.max),
            })
        } else {
            None
        }
    }

    /// Nearest sector of the range to `sector`.
    pub fn clamp(&self, sector: Sector) -> Sector {
        sector.clamp(self.min, self.max)
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

// =============================================================================
// Range Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Range {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Range", 2)?;
        s.serialize_field("min", &self.min)?;
        s.serialize_field("max", &self.max)?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Range {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            min: Sector,
            max: Sector,
        }

        let raw = Raw::deserialize(deserializer)?;
        Range::new(raw.min, raw.max).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(min: Sector, max: Sector) -> Range {
        Range::new(min, max).unwrap()
    }

    #[test]
    fn test_range_creation() {
        let range = r(10, 19);
        assert_eq!(range.min(), 10);
        assert_eq!(range.max(), 19);
        assert_eq!(range.len(), 10);
    }

    #[test]
    fn test_range_rejects_inverted() {
        let err = Range::new(20, 10).unwrap_err();
        assert!(matches!(err, ConstraintError::InvalidArgument(_)));
    }

    #[test]
    fn test_range_rejects_out_of_space() {
        assert!(Range::new(-1, 10).is_err());
        assert!(Range::new(0, Sector::MAX).is_err());
        assert_eq!(Range::new(0, MAX_SECTOR).unwrap(), Range::full());
    }

    #[test]
    fn test_full_range_length_is_representable() {
        assert_eq!(Range::full().len(), crate::MAX_LENGTH);
    }

    #[test]
    fn test_range_contains() {
        let range = r(0, 100);
        assert!(range.contains(50));
        assert!(range.contains(0));
        assert!(range.contains(100));
        assert!(!range.contains(101));
        assert!(!range.contains(-1));
    }

    #[test]
    fn test_range_overlaps_and_intersection() {
        let a = r(0, 100);
        let b = r(50, 150);
        let c = r(200, 300);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert_eq!(a.intersection(&b), Some(r(50, 100)));
        assert_eq!(a.intersection(&c), None);
    }

    #[test]
    fn test_touching_ranges_share_one_sector() {
        let a = r(0, 50);
        let b = r(50, 100);
        assert_eq!(a.intersection(&b), Some(Range::point(50)));
    }

    #[test]
    fn test_clamp() {
        let range = r(10, 20);
        assert_eq!(range.clamp(5), 10);
        assert_eq!(range.clamp(15), 15);
        assert_eq!(range.clamp(25), 20);
    }

    #[test]
    fn test_display() {
        assert_eq!(r(3, 7).to_string(), "[3, 7]");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_validates() {
        let range: Range = serde_json::from_str(r#"{"min":1,"max":4}"#).unwrap();
        assert_eq!(range, r(1, 4));
        assert!(serde_json::from_str::<Range>(r#"{"min":4,"max":1}"#).is_err());
    }
}
