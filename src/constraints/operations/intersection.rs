use tracing::debug;

use crate::constraints::{Constraint, ConstraintError};
use crate::geometry::Range;

/// Computes the constraint satisfied exactly by regions satisfying both inputs.
///
/// # Arguments
///
/// * `a` - First constraint
/// * `b` - Second constraint
///
/// # Returns
///
/// The merged constraint: ranges intersected, sizes tightened, alignments
/// merged into a single residue class modulo the lcm of both grains.
/// [`ConstraintError::Unsatisfiable`] is an ordinary outcome here.
pub fn compute_intersection(a: &Constraint, b: &Constraint) -> crate::Result<Constraint> {
    // assert a and b are well formed (debug-only)
    debug_assert!(super::assertions::is_well_formed(a));
    debug_assert!(super::assertions::is_well_formed(b));

    let start_range = intersect_ranges("start", &a.start_range(), &b.start_range())?;
    let end_range = intersect_ranges("end", &a.end_range(), &b.end_range())?;

    let min_size = a.min_size().max(b.min_size());
    let max_size = a.max_size().min(b.max_size());
    if min_size > max_size {
        debug!(min_size, max_size, "intersection has conflicting sizes");
        return Err(ConstraintError::Unsatisfiable(format!(
            "minimum size {min_size} exceeds maximum size {max_size}"
        )));
    }

    let start_align = a
        .start_align()
        .intersect(&b.start_align())
        .inspect_err(|e| debug!(error = %e, "start alignments do not merge"))?;
    let end_align = a
        .end_align()
        .intersect(&b.end_align())
        .inspect_err(|e| debug!(error = %e, "end alignments do not merge"))?;

    let merged = Constraint::new(
        start_align,
        end_align,
        start_range,
        end_range,
        min_size,
        max_size,
    )?;
    debug_assert!(super::assertions::is_well_formed(&merged));
    Ok(merged)
}

fn intersect_ranges(side: &str, a: &Range, b: &Range) -> crate::Result<Range> {
    a.intersection(b).ok_or_else(|| {
        debug!(side, a = %a, b = %b, "intersection has disjoint ranges");
        ConstraintError::Unsatisfiable(format!("{side} ranges {a} and {b} are disjoint"))
    })
}
