//! Checked integer helpers for residue-class arithmetic on sector values.
//!
//! Grains and offsets are 64-bit sector quantities, so every product that can
//! leave the sector range is either checked or carried out in `i128` and
//! narrowed back with a checked conversion.

use crate::Sector;

/// Why two congruences could not be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CongruenceFailure {
    /// No integer satisfies both congruences.
    Inconsistent,
    /// The combined modulus does not fit in a [`Sector`].
    Overflow,
}

/// Greatest common divisor of two positive values.
pub fn gcd(mut a: Sector, mut b: Sector) -> Sector {
    debug_assert!(a > 0 && b > 0, "gcd expects positive operands");
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple of two positive values, `None` on overflow.
pub fn checked_lcm(a: Sector, b: Sector) -> Option<Sector> {
    (a / gcd(a, b)).checked_mul(b)
}

/// Extended Euclid: returns `(g, x, y)` with `a*x + b*y == g == gcd(a, b)`.
pub fn extended_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    let (mut old_r, mut r) = (a, b);
    let (mut old_x, mut x) = (1i128, 0i128);
    let (mut old_y, mut y) = (0i128, 1i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_x, x) = (x, old_x - q * x);
        (old_y, y) = (y, old_y - q * y);
    }
    (old_r, old_x, old_y)
}

/// Residue class `residue (mod modulus)` whose modulus may exceed the sector range.
///
/// Merging two sector alignments can produce an lcm past `i64::MAX`; such a
/// class still has at most one member in any sector window, so searches keep
/// it in `i128` and only narrow the members they find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WideClass {
    residue: i128,
    modulus: i128,
}

impl WideClass {
    /// Merges `x ≡ ra (mod ma)` and `x ≡ rb (mod mb)`; `None` if no integer
    /// satisfies both. Both moduli must be positive.
    pub fn merge(ra: Sector, ma: Sector, rb: Sector, mb: Sector) -> Option<Self> {
        debug_assert!(ma > 0 && mb > 0, "moduli must be positive");
        let ra = ra.rem_euclid(ma);
        let rb = rb.rem_euclid(mb);
        let g = gcd(ma, mb);

        // ra, rb are both in [0, max(ma, mb)), so the difference cannot overflow.
        let diff = rb - ra;
        if diff % g != 0 {
            return None;
        }

        // x = ra + ma * k with (ma/g) * k ≡ diff/g (mod mb/g).
        let step = i128::from(mb / g);
        let (_, inverse, _) = extended_gcd(i128::from(ma / g), step);
        let k = (i128::from(diff / g) * inverse).rem_euclid(step);
        let modulus = i128::from(ma) * step;
        let residue = (i128::from(ra) + i128::from(ma) * k).rem_euclid(modulus);
        Some(Self { residue, modulus })
    }

    pub fn residue(&self) -> i128 {
        self.residue
    }

    pub fn modulus(&self) -> i128 {
        self.modulus
    }

    /// Smallest member in `[low, high]`.
    pub fn first_in(&self, low: Sector, high: Sector) -> Option<Sector> {
        let low_wide = i128::from(low);
        let member = low_wide + (self.residue - low_wide).rem_euclid(self.modulus);
        Sector::try_from(member).ok().filter(|&m| m <= high)
    }

    /// Largest member in `[low, high]`.
    pub fn last_in(&self, low: Sector, high: Sector) -> Option<Sector> {
        let high_wide = i128::from(high);
        let member = high_wide - (high_wide - self.residue).rem_euclid(self.modulus);
        Sector::try_from(member).ok().filter(|&m| m >= low)
    }
}

/// Merges `x ≡ ra (mod ma)` and `x ≡ rb (mod mb)` into a single congruence.
///
/// Both moduli must be positive. The returned residue lies in `[0, lcm)`.
pub fn merge_congruences(
    ra: Sector,
    ma: Sector,
    rb: Sector,
    mb: Sector,
) -> Result<(Sector, Sector), CongruenceFailure> {
    let class = WideClass::merge(ra, ma, rb, mb).ok_or(CongruenceFailure::Inconsistent)?;
    let lcm = Sector::try_from(class.modulus).map_err(|_| CongruenceFailure::Overflow)?;
    // residue < lcm, so it fits whenever the lcm does.
    let residue = Sector::try_from(class.residue).map_err(|_| CongruenceFailure::Overflow)?;
    Ok((residue, lcm))
}

/// Number of multiples of `step` that fit in `[from, to]` when starting at `from`.
///
/// Returns 0 for an empty span.
pub fn progression_len(from: Sector, to: Sector, step: Sector) -> u64 {
    debug_assert!(step > 0);
    if from > to {
        return 0;
    }
    (to.abs_diff(from) / step.unsigned_abs()).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_basic() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 13), 1);
        assert_eq!(gcd(2048, 63), 1);
        assert_eq!(gcd(5, 5), 5);
    }

    #[test]
    fn lcm_detects_overflow() {
        assert_eq!(checked_lcm(4, 6), Some(12));
        assert_eq!(checked_lcm(1, Sector::MAX), Some(Sector::MAX));
        assert_eq!(checked_lcm(Sector::MAX, Sector::MAX - 1), None);
    }

    #[test]
    fn extended_gcd_bezout_identity() {
        let (g, x, y) = extended_gcd(240, 46);
        assert_eq!(g, 2);
        assert_eq!(240 * x + 46 * y, 2);
    }

    #[test]
    fn merge_coprime_moduli() {
        // x ≡ 2 (mod 3), x ≡ 3 (mod 5) → x ≡ 8 (mod 15)
        assert_eq!(merge_congruences(2, 3, 3, 5), Ok((8, 15)));
    }

    #[test]
    fn merge_shared_factor() {
        // x ≡ 1 (mod 4), x ≡ 3 (mod 6) → x ≡ 9 (mod 12)
        assert_eq!(merge_congruences(1, 4, 3, 6), Ok((9, 12)));
    }

    #[test]
    fn merge_inconsistent() {
        // x even and x odd
        assert_eq!(
            merge_congruences(0, 2, 1, 4),
            Err(CongruenceFailure::Inconsistent)
        );
    }

    #[test]
    fn merge_normalises_negative_residues() {
        assert_eq!(merge_congruences(-1, 4, 0, 1), Ok((3, 4)));
    }

    #[test]
    fn merge_overflowing_modulus() {
        let big = Sector::MAX / 2;
        assert_eq!(
            merge_congruences(0, big, 0, big - 1),
            Err(CongruenceFailure::Overflow)
        );
    }

    #[test]
    fn wide_class_past_sector_range() {
        // lcm of two primes near 2^32 exceeds i64::MAX.
        let (p, q) = (4_294_967_311, 4_294_967_291);
        assert_eq!(merge_congruences(0, p, 0, q), Err(CongruenceFailure::Overflow));

        let class = WideClass::merge(0, p, 0, q).unwrap();
        assert_eq!(class.modulus(), i128::from(p) * i128::from(q));
        assert_eq!(class.first_in(0, 30_000_000_000), Some(0));
        assert_eq!(class.first_in(1, Sector::MAX), None);
        assert_eq!(class.last_in(0, Sector::MAX), Some(0));
    }

    #[test]
    fn wide_class_members_in_window() {
        // x ≡ 2 (mod 3), x ≡ 3 (mod 5) → 8, 23, 38, ...
        let class = WideClass::merge(2, 3, 3, 5).unwrap();
        assert_eq!((class.residue(), class.modulus()), (8, 15));
        assert_eq!(class.first_in(9, 40), Some(23));
        assert_eq!(class.last_in(9, 37), Some(23));
        assert_eq!(class.first_in(24, 37), None);
        assert_eq!(class.last_in(0, 7), None);
        assert!(WideClass::merge(0, 2, 1, 4).is_none());
    }

    #[test]
    fn progression_len_counts_inclusive() {
        assert_eq!(progression_len(0, 10, 5), 3);
        assert_eq!(progression_len(3, 3, 7), 1);
        assert_eq!(progression_len(4, 3, 1), 0);
        assert_eq!(progression_len(0, Sector::MAX, 1), Sector::MAX as u64 + 1);
    }
}
