//! Nearest-solution search.
//!
//! Three exact strategies, picked by estimated cost:
//!
//! - **Start walk.** Ignoring alignment, the distance from the best region
//!   starting at `s` to the reference is a convex piecewise-linear function of
//!   `s` that bounds the true distance from below. The walk starts at its
//!   minimiser and steps over aligned starts outward in both directions,
//!   dropping a direction once the bound can no longer beat the best candidate.
//! - **End walk.** The same over aligned ends, for end grains much coarser
//!   than start grains.
//! - **Length sweep.** When the size bounds are narrow, each length fixes one
//!   residue class of starts (the start alignment merged with the end
//!   alignment shifted back by the length), and its best member is found
//!   directly.

use tracing::{debug, trace, warn};

use super::candidate::Candidate;
use super::config::SolverConfig;
use super::longest::{length_class, longest_length, start_window};
use crate::constraints::{Constraint, ConstraintError};
use crate::geometry::{Alignment, Geometry, Range};
use crate::Sector;

/// Side of the region a walk steps over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Walk(Side),
    /// Every length from `min_size` up to `longest`.
    Lengths { longest: Sector },
}

/// Rough visit count of a walk: steps until the partner alignment lines up,
/// plus the partner grain crossed while the bound closes in.
fn walk_cost(walked: u128, partner: u128, lengths: u128) -> u128 {
    partner.div_ceil(lengths.min(partner)) + partner / walked
}

fn plan(constraint: &Constraint) -> Strategy {
    let longest = constraint
        .max_size()
        .min(constraint.end_range().max() - constraint.start_range().min() + 1);
    let lengths = longest.saturating_sub(constraint.min_size()).max(0) as u128 + 1;
    let start_grain = constraint.start_align().grain() as u128;
    let end_grain = constraint.end_align().grain() as u128;

    let by_start = walk_cost(start_grain, end_grain, lengths);
    let by_end = walk_cost(end_grain, start_grain, lengths);
    if lengths <= by_start.min(by_end) {
        Strategy::Lengths { longest }
    } else if by_end < by_start {
        Strategy::Walk(Side::End)
    } else {
        Strategy::Walk(Side::Start)
    }
}

/// Best candidate seen so far and whether the budget ran out.
#[derive(Default)]
struct Search {
    best: Option<Candidate>,
    exhausted: bool,
}

impl Search {
    fn offer(&mut self, candidate: Candidate) {
        if self.best.map_or(true, |b| candidate.is_better_than(&b)) {
            self.best = Some(candidate);
        }
    }
}

/// Bounds of the region family seen from one side, borrowed from a
/// constraint and a reference.
struct Neighbourhood<'a> {
    constraint: &'a Constraint,
    reference: &'a Geometry,
    side: Side,
    /// Positions of the walked side that admit a partner within the size bounds.
    positions: Range,
}

impl<'a> Neighbourhood<'a> {
    fn new(constraint: &'a Constraint, reference: &'a Geometry, side: Side) -> Option<Self> {
        let start_range = constraint.start_range();
        let end_range = constraint.end_range();
        let reach_min = constraint.min_size() - 1;
        let reach_max = constraint.max_size() - 1;
        let (low, high) = match side {
            Side::Start => (
                start_range
                    .min()
                    .max(end_range.min().saturating_sub(reach_max)),
                start_range.max().min(end_range.max() - reach_min),
            ),
            Side::End => (
                end_range.min().max(start_range.min().saturating_add(reach_min)),
                end_range
                    .max()
                    .min(start_range.max().saturating_add(reach_max)),
            ),
        };
        let positions = Range::new(low, high).ok()?;
        Some(Self {
            constraint,
            reference,
            side,
            positions,
        })
    }

    fn walked_align(&self) -> Alignment {
        match self.side {
            Side::Start => self.constraint.start_align(),
            Side::End => self.constraint.end_align(),
        }
    }

    fn partner_align(&self) -> Alignment {
        match self.side {
            Side::Start => self.constraint.end_align(),
            Side::End => self.constraint.start_align(),
        }
    }

    fn walked_target(&self) -> Sector {
        match self.side {
            Side::Start => self.reference.start(),
            Side::End => self.reference.end(),
        }
    }

    fn partner_target(&self) -> Sector {
        match self.side {
            Side::Start => self.reference.end(),
            Side::End => self.reference.start(),
        }
    }

    /// Partner positions compatible with `position` by range and size;
    /// non-empty within `positions`.
    fn partner_window(&self, position: Sector) -> Option<Range> {
        let c = self.constraint;
        let reach_min = c.min_size() - 1;
        let reach_max = c.max_size() - 1;
        let (low, high) = match self.side {
            Side::Start => (
                c.end_range()
                    .min()
                    .max(position.saturating_add(reach_min)),
                c.end_range()
                    .max()
                    .min(position.saturating_add(reach_max)),
            ),
            Side::End => (
                c.start_range()
                    .min()
                    .max(position.saturating_sub(reach_max)),
                c.start_range()
                    .max()
                    .min(position.saturating_sub(reach_min)),
            ),
        };
        Range::new(low, high).ok()
    }

    /// Alignment-free distance for `position`; never exceeds the true distance.
    fn lower_bound(&self, position: Sector) -> u64 {
        let to_walked = position.abs_diff(self.walked_target());
        let to_partner = self
            .partner_window(position)
            .map(|window| {
                let target = self.partner_target();
                target.abs_diff(window.clamp(target))
            })
            .unwrap_or(u64::MAX);
        to_walked.saturating_add(to_partner)
    }

    /// Best solution with the walked side exactly at `position`, if any.
    fn candidate_at(&self, position: Sector) -> Option<Candidate> {
        let window = self.partner_window(position)?;
        let partner = self
            .partner_align()
            .align_nearest_in(&window, self.partner_target())?;
        let geometry = match self.side {
            Side::Start => Geometry::from_bounds(position, partner),
            Side::End => Geometry::from_bounds(partner, position),
        }
        .ok()?;
        Some(Candidate::new(geometry, self.reference))
    }

    /// Minimiser of [`Self::lower_bound`]: smallest position with the least bound.
    fn origin(&self) -> Sector {
        let c = self.constraint;
        let reach_min = c.min_size() - 1;
        let reach_max = c.max_size() - 1;
        let target = self.partner_target();
        let breakpoints = match self.side {
            Side::Start => [
                c.end_range().min().saturating_sub(reach_min),
                c.end_range().max().saturating_sub(reach_max),
                target.saturating_sub(reach_min),
                target.saturating_sub(reach_max),
            ],
            Side::End => [
                c.start_range().min().saturating_add(reach_max),
                c.start_range().max().saturating_add(reach_min),
                target.saturating_add(reach_min),
                target.saturating_add(reach_max),
            ],
        };
        [
            self.walked_target(),
            self.positions.min(),
            self.positions.max(),
        ]
        .into_iter()
        .chain(breakpoints)
        .map(|point| self.positions.clamp(point))
        .min_by_key(|&point| (self.lower_bound(point), point))
        .unwrap_or(self.positions.min())
    }

    /// True if a walk in this direction stops as soon as its bound ties the best.
    fn stops_on_tie(&self, descending: bool) -> bool {
        // Higher starts lose every tie; lower starts, or any end, can still
        // meet a smaller start at the same distance.
        self.side == Side::Start && !descending
    }
}

/// One direction of the outward walk.
struct Walk {
    next: Option<Sector>,
    step: Sector,
    descending: bool,
}

impl Walk {
    fn advance(&mut self, positions: &Range) {
        self.next = self.next.and_then(|current| {
            if self.descending {
                current
                    .checked_sub(self.step)
                    .filter(|&p| p >= positions.min())
            } else {
                current
                    .checked_add(self.step)
                    .filter(|&p| p <= positions.max())
            }
        });
    }
}

fn walk(hood: &Neighbourhood<'_>, limit: usize) -> Search {
    let origin = hood.origin();
    let align = hood.walked_align();
    trace!(side = ?hood.side, origin, positions = %hood.positions, "nearest-solution walk");

    let mut walks = [
        Walk {
            next: align.align_down_in(&hood.positions, origin),
            step: align.grain(),
            descending: true,
        },
        Walk {
            next: align.align_up_in(&hood.positions, origin.saturating_add(1)),
            step: align.grain(),
            descending: false,
        },
    ];

    let mut search = Search::default();
    let mut visited = 0usize;
    'walk: while walks.iter().any(|w| w.next.is_some()) {
        for walk in walks.iter_mut() {
            let Some(position) = walk.next else { continue };
            if let Some(current) = search.best {
                let bound = hood.lower_bound(position);
                let beaten = if hood.stops_on_tie(walk.descending) {
                    bound >= current.distance()
                } else {
                    bound > current.distance()
                };
                if beaten {
                    walk.next = None;
                    continue;
                }
            }
            if visited == limit {
                search.exhausted = true;
                break 'walk;
            }
            visited += 1;
            if let Some(candidate) = hood.candidate_at(position) {
                search.offer(candidate);
            }
            walk.advance(&hood.positions);
        }
    }
    search
}

fn sweep_lengths(
    constraint: &Constraint,
    reference: &Geometry,
    longest: Sector,
    limit: usize,
) -> Search {
    trace!(
        min_size = constraint.min_size(),
        longest,
        "nearest-solution length sweep"
    );
    let mut search = Search::default();
    for (visited, length) in (constraint.min_size()..=longest).enumerate() {
        if visited == limit {
            search.exhausted = true;
            break;
        }
        let Some((low, high)) = start_window(constraint, length) else {
            continue;
        };
        let Some(class) = length_class(constraint, length) else {
            continue;
        };
        // |s - ref.start| + |s + length - 1 - ref.end| falls until the lower of
        // its two kinks and never falls again after it.
        let kink = reference.start().min(reference.end() - (length - 1));
        let below = class.last_in(low, kink.min(high));
        let above = class.first_in(kink.max(low), high);
        for start in below.into_iter().chain(above) {
            if let Ok(geometry) = Geometry::new(start, length) {
                search.offer(Candidate::new(geometry, reference));
            }
        }
    }
    search
}

/// Solution of `constraint` nearest to `reference`.
///
/// # Errors
///
/// - [`ConstraintError::Unsatisfiable`] if the constraint has no solution.
/// - [`ConstraintError::SearchLimit`] if the budget runs out before any
///   solution is found.
pub fn nearest(
    constraint: &Constraint,
    reference: &Geometry,
    config: &SolverConfig,
) -> crate::Result<Geometry> {
    // Proves a solution exists, independently of the reference.
    longest_length(constraint, config.search_limit)?;

    let search = match plan(constraint) {
        Strategy::Lengths { longest } => {
            sweep_lengths(constraint, reference, longest, config.nearest_limit)
        }
        Strategy::Walk(side) => {
            let hood = Neighbourhood::new(constraint, reference, side).ok_or_else(|| {
                ConstraintError::Unsatisfiable(
                    "no position admits a partner within the size bounds".into(),
                )
            })?;
            walk(&hood, config.nearest_limit)
        }
    };

    match search.best {
        Some(found) => {
            if search.exhausted {
                warn!(
                    limit = config.nearest_limit,
                    "nearest-solution search stopped early, returning the best solution found"
                );
            }
            Ok(found.geometry())
        }
        None if search.exhausted => Err(ConstraintError::SearchLimit {
            limit: config.nearest_limit,
        }),
        None => {
            debug!("nearest-solution search found no aligned pair");
            Err(ConstraintError::Unsatisfiable(
                "no aligned pair lies within the size bounds".to_string(),
            ))
        }
    }
}
