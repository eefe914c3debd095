mod intersection;

pub use intersection::compute_intersection;

#[cfg(debug_assertions)]
pub mod assertions;

#[cfg(not(debug_assertions))]
pub mod assertions {
    use crate::constraints::Constraint;

    pub fn is_well_formed(_constraint: &Constraint) -> bool {
        true
    }
}
