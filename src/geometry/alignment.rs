//! Residue-class restriction on sector positions.

use std::fmt::Display;
use std::hash::{Hash, Hasher};

use super::range::Range;
use crate::arith::{merge_congruences, CongruenceFailure};
use crate::constraints::ConstraintError;
use crate::{Sector, MAX_SECTOR};

/// Sectors `s` with `(s - offset) mod grain == 0`.
///
/// `grain == 1` admits every sector. The offset is kept as given, but two
/// alignments are equal when they admit the same sectors, i.e. when grains
/// match and offsets agree modulo the grain.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawAlignment"))]
pub struct Alignment {
    offset: Sector,
    grain: Sector,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawAlignment {
    offset: Sector,
    grain: Sector,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAlignment> for Alignment {
    type Error = ConstraintError;

    fn try_from(raw: RawAlignment) -> Result<Self, Self::Error> {
        Alignment::new(raw.offset, raw.grain)
    }
}

impl Alignment {
    /// Creates an alignment admitting `offset + k * grain`.
    ///
    /// # Errors
    ///
    /// [`ConstraintError::InvalidArgument`] if `grain < 1`.
    pub fn new(offset: Sector, grain: Sector) -> crate::Result<Self> {
        if grain < 1 {
            return Err(ConstraintError::InvalidArgument(format!(
                "alignment grain must be >= 1, got {grain}"
            )));
        }
        Ok(Self { offset, grain })
    }

    /// The unconstrained alignment.
    pub const fn any() -> Self {
        Self {
            offset: 0,
            grain: 1,
        }
    }

    /// Unit-grain alignment that records `sector` as its offset.
    pub(crate) const fn pinned(sector: Sector) -> Self {
        Self {
            offset: sector,
            grain: 1,
        }
    }

    pub const fn offset(&self) -> Sector {
        self.offset
    }

    pub const fn grain(&self) -> Sector {
        self.grain
    }

    /// Offset normalised into `[0, grain)`.
    pub const fn residue(&self) -> Sector {
        self.offset.rem_euclid(self.grain)
    }

    /// Returns true if every sector satisfies this alignment.
    pub const fn is_any(&self) -> bool {
        self.grain == 1
    }

    pub const fn is_aligned(&self, sector: Sector) -> bool {
        sector.rem_euclid(self.grain) == self.residue()
    }

    /// Smallest aligned sector `>= sector`, if it is addressable.
    pub fn align_up(&self, sector: Sector) -> Option<Sector> {
        let gap = (self.residue() - sector.rem_euclid(self.grain)).rem_euclid(self.grain);
        sector
            .checked_add(gap)
            .filter(|&aligned| (0..=MAX_SECTOR).contains(&aligned))
    }

    /// Largest aligned sector `<= sector`, if it is addressable.
    pub fn align_down(&self, sector: Sector) -> Option<Sector> {
        let gap = (sector.rem_euclid(self.grain) - self.residue()).rem_euclid(self.grain);
        sector
            .checked_sub(gap)
            .filter(|&aligned| (0..=MAX_SECTOR).contains(&aligned))
    }

    /// Smallest aligned sector in `range` that is `>= sector`.
    pub fn align_up_in(&self, range: &Range, sector: Sector) -> Option<Sector> {
        self.align_up(sector.max(range.min()))
            .filter(|&aligned| aligned <= range.max())
    }

    /// Largest aligned sector in `range` that is `<= sector`.
    pub fn align_down_in(&self, range: &Range, sector: Sector) -> Option<Sector> {
        self.align_down(sector.min(range.max()))
            .filter(|&aligned| aligned >= range.min())
    }

    /// Aligned sector in `range` closest to `sector`; ties go to the lower one.
    pub fn align_nearest_in(&self, range: &Range, sector: Sector) -> Option<Sector> {
        match (
            self.align_down_in(range, sector),
            self.align_up_in(range, sector),
        ) {
            (Some(down), Some(up)) => {
                if sector.abs_diff(down) <= up.abs_diff(sector) {
                    Some(down)
                } else {
                    Some(up)
                }
            }
            (down, up) => down.or(up),
        }
    }

    /// Alignment admitting exactly the sectors admitted by both.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::Unsatisfiable`] if no sector satisfies both, i.e.
    ///   the residues disagree modulo `gcd(grain_a, grain_b)`.
    /// - [`ConstraintError::Overflow`] if the merged grain (the least common
    ///   multiple) exceeds the sector range.
    pub fn intersect(&self, other: &Alignment) -> crate::Result<Alignment> {
        match merge_congruences(self.offset, self.grain, other.offset, other.grain) {
            Ok((offset, grain)) => Ok(Alignment { offset, grain }),
            Err(CongruenceFailure::Inconsistent) => Err(ConstraintError::Unsatisfiable(format!(
                "alignments {self} and {other} share no sector"
            ))),
            Err(CongruenceFailure::Overflow) => Err(ConstraintError::Overflow(format!(
                "merging alignments {self} and {other} exceeds the sector range"
            ))),
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::any()
    }
}

impl PartialEq for Alignment {
    fn eq(&self, other: &Self) -> bool {
        self.grain == other.grain && self.residue() == other.residue()
    }
}

impl Eq for Alignment {}

impl Hash for Alignment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.grain.hash(state);
        self.residue().hash(state);
    }
}

impl Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (mod {})", self.offset, self.grain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn al(offset: Sector, grain: Sector) -> Alignment {
        Alignment::new(offset, grain).unwrap()
    }

    #[test]
    fn rejects_non_positive_grain() {
        assert!(matches!(
            Alignment::new(0, 0),
            Err(ConstraintError::InvalidArgument(_))
        ));
        assert!(Alignment::new(3, -8).is_err());
    }

    #[test]
    fn equality_uses_residue() {
        assert_eq!(al(2048, 2048), al(0, 2048));
        assert_eq!(al(-1, 8), al(7, 8));
        assert_ne!(al(1, 8), al(1, 16));
        assert_eq!(Alignment::pinned(50), Alignment::any());
        assert_eq!(Alignment::pinned(50).offset(), 50);
    }

    #[test]
    fn is_aligned_checks_residue() {
        let a = al(3, 8);
        assert!(a.is_aligned(3));
        assert!(a.is_aligned(11));
        assert!(!a.is_aligned(4));
        assert!(Alignment::any().is_aligned(12345));
    }

    #[test]
    fn align_up_and_down() {
        let a = al(3, 8);
        assert_eq!(a.align_up(4), Some(11));
        assert_eq!(a.align_up(11), Some(11));
        assert_eq!(a.align_down(10), Some(3));
        assert_eq!(a.align_down(2), None);
        assert_eq!(al(0, 8).align_up(MAX_SECTOR), None);
    }

    #[test]
    fn align_within_range() {
        let a = al(0, 10);
        let range = Range::new(15, 42).unwrap();
        assert_eq!(a.align_up_in(&range, 0), Some(20));
        assert_eq!(a.align_down_in(&range, 100), Some(40));
        assert_eq!(a.align_up_in(&range, 41), None);
        assert_eq!(a.align_down_in(&range, 19), None);
    }

    #[test]
    fn align_nearest_prefers_lower_on_tie() {
        let a = al(0, 10);
        let range = Range::new(0, 100).unwrap();
        assert_eq!(a.align_nearest_in(&range, 14), Some(10));
        assert_eq!(a.align_nearest_in(&range, 16), Some(20));
        assert_eq!(a.align_nearest_in(&range, 15), Some(10));
        // Outside the range: snaps to the nearest aligned sector inside it.
        let narrow = Range::new(25, 100).unwrap();
        assert_eq!(a.align_nearest_in(&narrow, 0), Some(30));
    }

    #[test]
    fn intersect_compatible() {
        let merged = al(1, 4).intersect(&al(3, 6)).unwrap();
        assert_eq!(merged, al(9, 12));
        assert!(merged.is_aligned(21));
    }

    #[test]
    fn intersect_with_any_is_identity() {
        let a = al(5, 2048);
        assert_eq!(a.intersect(&Alignment::any()).unwrap(), a);
        assert_eq!(Alignment::any().intersect(&a).unwrap(), a);
    }

    #[test]
    fn intersect_incompatible() {
        let err = al(0, 2).intersect(&al(1, 4)).unwrap_err();
        assert!(err.is_unsatisfiable());
    }

    #[test]
    fn intersect_overflow() {
        let big = Sector::MAX / 2;
        let err = al(0, big).intersect(&al(0, big - 1)).unwrap_err();
        assert!(matches!(err, ConstraintError::Overflow(_)));
    }
}
