//! Longest-solution search.
//!
//! For a fixed start `s`, the best end is the largest aligned sector not past
//! `min(end_range.max, s + max_size - 1)`. Shifting `s` by a multiple of
//! `lcm(start_grain, end_grain)` shifts that end by the same amount, so within
//! one residue class modulo the lcm the first feasible start is never beaten
//! by a later one. Scanning the first `end_grain / gcd` aligned starts
//! therefore covers every class. The mirrored scan over ends from the top
//! needs `start_grain / gcd` steps; the cheaper of the two is used.

use tracing::{trace, warn};

use crate::arith::{gcd, progression_len, WideClass};
use crate::constraints::{Constraint, ConstraintError};
use crate::Sector;

/// Which side of the region the scan walks over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    /// Aligned starts, ascending from `first`.
    Starts { first: Sector, steps: u64 },
    /// Aligned ends, descending from `first`.
    Ends { first: Sector, steps: u64 },
}

impl Scan {
    fn steps(&self) -> u64 {
        match self {
            Scan::Starts { steps, .. } | Scan::Ends { steps, .. } => *steps,
        }
    }
}

fn unsatisfiable(reason: &str) -> ConstraintError {
    ConstraintError::Unsatisfiable(reason.to_string())
}

/// Plans both scans and picks the one with fewer steps.
fn plan(constraint: &Constraint) -> crate::Result<Scan> {
    let start_align = constraint.start_align();
    let end_align = constraint.end_align();
    let start_range = constraint.start_range();
    let end_range = constraint.end_range();
    let reach = constraint.max_size() - 1;
    let g = gcd(start_align.grain(), end_align.grain());

    // Starts below `first_end - reach` cannot reach any aligned end.
    let first_end = end_align
        .align_up_in(&end_range, end_range.min())
        .ok_or_else(|| unsatisfiable("no aligned sector in the end range"))?;
    let first_start = start_align
        .align_up_in(&start_range, first_end - reach)
        .ok_or_else(|| unsatisfiable("no aligned start can reach an aligned end"))?;
    let forward = Scan::Starts {
        first: first_start,
        steps: progression_len(first_start, start_range.max(), start_align.grain())
            .min((end_align.grain() / g) as u64),
    };

    // Ends above `last_start + reach` cannot be reached from any aligned start.
    let last_start = start_align
        .align_down_in(&start_range, start_range.max())
        .ok_or_else(|| unsatisfiable("no aligned sector in the start range"))?;
    let last_end = end_align
        .align_down_in(&end_range, last_start.saturating_add(reach))
        .ok_or_else(|| unsatisfiable("no aligned end can be reached from an aligned start"))?;
    let backward = Scan::Ends {
        first: last_end,
        steps: progression_len(end_range.min(), last_end, end_align.grain())
            .min((start_align.grain() / g) as u64),
    };

    Ok(if backward.steps() < forward.steps() {
        backward
    } else {
        forward
    })
}

/// Length of the longest solution of `constraint`.
///
/// # Errors
///
/// - [`ConstraintError::Unsatisfiable`] if the constraint has no solution.
/// - [`ConstraintError::SearchLimit`] if the scan would need more than `limit` steps.
pub fn longest_length(constraint: &Constraint, limit: usize) -> crate::Result<Sector> {
    let scan = plan(constraint)?;
    if scan.steps() > limit as u64 {
        warn!(steps = scan.steps(), limit, "longest-length scan exceeds its budget");
        return Err(ConstraintError::SearchLimit { limit });
    }
    trace!(?scan, "longest-length scan");

    let best = match scan {
        Scan::Starts { first, steps } => scan_starts(constraint, first, steps),
        Scan::Ends { first, steps } => scan_ends(constraint, first, steps),
    };
    best.ok_or_else(|| unsatisfiable("no aligned pair has a length within the size bounds"))
}

fn scan_starts(constraint: &Constraint, first: Sector, steps: u64) -> Option<Sector> {
    let start_align = constraint.start_align();
    let end_align = constraint.end_align();
    let end_max = constraint.end_range().max();
    let (min_size, max_size) = (constraint.min_size(), constraint.max_size());
    let ceiling = max_size.min(end_max - first + 1);

    let mut best: Option<Sector> = None;
    let mut start = first;
    for _ in 0..steps {
        let reach = start.saturating_add(max_size - 1).min(end_max);
        if let Some(end) = end_align.align_down(reach) {
            let length = end - start + 1;
            if length >= min_size && best.map_or(true, |b| length > b) {
                best = Some(length);
                if length == ceiling {
                    break;
                }
            }
        }
        match start.checked_add(start_align.grain()) {
            Some(next) => start = next,
            None => break,
        }
    }
    best
}

fn scan_ends(constraint: &Constraint, first: Sector, steps: u64) -> Option<Sector> {
    let start_align = constraint.start_align();
    let end_align = constraint.end_align();
    let start_min = constraint.start_range().min();
    let (min_size, max_size) = (constraint.min_size(), constraint.max_size());
    let ceiling = max_size.min(first - start_min + 1);

    let mut best: Option<Sector> = None;
    let mut end = first;
    for _ in 0..steps {
        let floor = (end - (max_size - 1)).max(start_min);
        if let Some(start) = start_align.align_up(floor) {
            let length = end - start + 1;
            if length >= min_size && best.map_or(true, |b| length > b) {
                best = Some(length);
                if length == ceiling {
                    break;
                }
            }
        }
        match end.checked_sub(end_align.grain()) {
            Some(next) => end = next,
            None => break,
        }
    }
    best
}

/// Smallest start of a solution with exactly `length` sectors, if any.
///
/// The start must satisfy both the start alignment and the end alignment
/// shifted back by `length - 1`. The combined modulus can exceed the sector
/// range, in which case at most one start in the window qualifies.
pub fn earliest_start(constraint: &Constraint, length: Sector) -> Option<Sector> {
    let (low, high) = start_window(constraint, length)?;
    length_class(constraint, length)?.first_in(low, high)
}

/// Starts from which a region of exactly `length` sectors fits both ranges.
pub(crate) fn start_window(constraint: &Constraint, length: Sector) -> Option<(Sector, Sector)> {
    let span = length - 1;
    let low = constraint
        .start_range()
        .min()
        .max(constraint.end_range().min() - span);
    let high = constraint
        .start_range()
        .max()
        .min(constraint.end_range().max() - span);
    (low <= high).then_some((low, high))
}

/// Starts whose end, `length - 1` sectors later, is also aligned.
pub(crate) fn length_class(constraint: &Constraint, length: Sector) -> Option<WideClass> {
    let start_align = constraint.start_align();
    let end_align = constraint.end_align();
    WideClass::merge(
        start_align.residue(),
        start_align.grain(),
        end_align.residue() - (length - 1),
        end_align.grain(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Alignment, Geometry, Range};

    fn geom(start: Sector, length: Sector) -> Geometry {
        Geometry::new(start, length).unwrap()
    }

    fn aligned_device(
        sectors: Sector,
        start: (Sector, Sector),
        end: (Sector, Sector),
    ) -> Constraint {
        let mut c = Constraint::any(sectors).unwrap();
        c.set_start_align(Alignment::new(start.0, start.1).unwrap())
            .unwrap();
        c.set_end_align(Alignment::new(end.0, end.1).unwrap()).unwrap();
        c
    }

    #[test]
    fn whole_device_is_longest() {
        let c = Constraint::any(1000).unwrap();
        assert_eq!(longest_length(&c, 16), Ok(1000));
        assert_eq!(earliest_start(&c, 1000), Some(0));
    }

    #[test]
    fn mib_alignment_trims_both_ends() {
        // Starts on 2048-sector boundaries, ends just before one.
        let c = aligned_device(10_000, (0, 2048), (2047, 2048));
        assert_eq!(longest_length(&c, 1 << 12), Ok(8192));
        assert_eq!(earliest_start(&c, 8192), Some(0));
        assert_eq!(earliest_start(&c, 8191), None);
    }

    #[test]
    fn coprime_grains_need_class_scan() {
        // Starts ≡ 0 (mod 7), ends ≡ 0 (mod 5) on 0..=99.
        let c = aligned_device(100, (0, 7), (0, 5));
        // Best: start 0, end 95 → 96 sectors.
        assert_eq!(longest_length(&c, 64), Ok(96));
        assert_eq!(earliest_start(&c, 96), Some(0));
    }

    #[test]
    fn max_size_caps_length() {
        let mut c = aligned_device(1000, (0, 8), (7, 8));
        c.set_max_size(100).unwrap();
        assert_eq!(longest_length(&c, 64), Ok(96));
        assert_eq!(earliest_start(&c, 96), Some(0));
    }

    #[test]
    fn unreachable_end_is_unsatisfiable() {
        let mut c = Constraint::from_max(&geom(0, 100));
        c.set_start_range(Range::new(0, 10).unwrap()).unwrap();
        c.set_end_range(Range::new(80, 99).unwrap()).unwrap();
        c.set_max_size(20).unwrap();
        assert!(longest_length(&c, 64).unwrap_err().is_unsatisfiable());
    }

    #[test]
    fn size_bounds_can_exclude_every_pair() {
        // Only lengths that are multiples of 4 are reachable, but size is pinned to 6.
        let mut c = aligned_device(100, (0, 4), (3, 4));
        c.set_min_size(6).unwrap();
        c.set_max_size(6).unwrap();
        assert!(longest_length(&c, 64).unwrap_err().is_unsatisfiable());
    }

    #[test]
    fn budget_is_enforced() {
        let c = aligned_device(1_000_000, (0, 1009), (0, 1013));
        assert_eq!(
            longest_length(&c, 10),
            Err(ConstraintError::SearchLimit { limit: 10 })
        );
        assert!(longest_length(&c, 2048).is_ok());
    }

    #[test]
    fn from_min_spans_address_space() {
        let c = Constraint::from_min(&geom(20, 3)).unwrap();
        assert_eq!(longest_length(&c, 1), Ok(crate::MAX_LENGTH));
        assert_eq!(earliest_start(&c, crate::MAX_LENGTH), Some(0));
    }

    #[test]
    fn alignments_with_lcm_past_sector_range() {
        // Two primes near 2^32: starts ≡ 0 (mod p), ends ≡ -1 (mod q).
        let (p, q) = (4_294_967_311, 4_294_967_291);
        let c = aligned_device(30_000_000_000, (0, p), (q - 1, q));
        // Ends q-1, 2q-1, ..., 6q-1 fit; 0..=6q-1 is the longest region.
        assert_eq!(longest_length(&c, 64), Ok(6 * q));
        assert_eq!(earliest_start(&c, 6 * q), Some(0));
        assert_eq!(earliest_start(&c, 6 * q - 1), None);
    }
}
