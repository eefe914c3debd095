//! Debug-only invariant checks for constraint combinators.

use crate::constraints::Constraint;

/// Returns true if `constraint` satisfies the structural invariant:
/// `1 <= min_size <= max_size` and both ranges ordered.
pub fn is_well_formed(constraint: &Constraint) -> bool {
    let start = constraint.start_range();
    let end = constraint.end_range();
    1 <= constraint.min_size()
        && constraint.min_size() <= constraint.max_size()
        && start.min() <= start.max()
        && end.min() <= end.max()
        && constraint.start_align().grain() >= 1
        && constraint.end_align().grain() >= 1
}
