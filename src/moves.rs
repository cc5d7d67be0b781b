//! Move validation and commitment.
//!
//! Changing the owner of one field can only merge or split areas that touch
//! that field's neighborhood. The area delta of each affected owner is
//! therefore the difference between its adjacent-area count around the field
//! after and before the change. `simulate` computes that delta against a
//! hypothetical view of the board without mutating it; `commit` applies a
//! simulated change.

use tracing::trace;

use crate::board::{count_adjacent_regions, Grid, Hypothetical, Position, UNOWNED};
use crate::error::MoveError;

/// A single-field ownership change together with its effect on area counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reassignment {
    pub position: Position,
    index: usize,
    pub old_owner: u32,
    pub new_owner: u32,
    /// Change in the number of areas of `new_owner`.
    pub new_owner_delta: i64,
    /// Change in the number of areas of `old_owner`.
    pub old_owner_delta: i64,
}

impl Reassignment {
    /// Area count `owner` would have after this change, given its current count.
    fn projected(current: u32, delta: i64) -> i64 {
        i64::from(current) + delta
    }

    /// Returns true if neither affected real owner would exceed `max_areas`.
    ///
    /// The pseudo-owner's areas are never counted, so it always passes.
    pub fn within_limits(&self, grid: &Grid, max_areas: u32) -> bool {
        self.violating_owner(grid, max_areas).is_none()
    }

    /// Returns the first affected owner that would exceed `max_areas`, if any.
    pub fn violating_owner(&self, grid: &Grid, max_areas: u32) -> Option<u32> {
        [
            (self.new_owner, self.new_owner_delta),
            (self.old_owner, self.old_owner_delta),
        ]
        .into_iter()
        .filter(|&(owner, _)| owner != UNOWNED)
        .find(|&(owner, delta)| {
            let current = grid.owner(owner).map_or(0, |r| r.busy_areas);
            Self::projected(current, delta) > i64::from(max_areas)
        })
        .map(|(owner, _)| owner)
    }
}

/// Computes the effect of handing the field at `position` to `new_owner`.
///
/// Returns `None` if `position` is off the board or `new_owner` has no
/// record. The grid is only read.
pub fn simulate(grid: &Grid, position: Position, new_owner: u32) -> Option<Reassignment> {
    let index = grid.index_of(position)?;
    grid.owner(new_owner)?;
    let old_owner = grid.fields()[index].owner;

    let new_before = count_adjacent_regions(grid, new_owner, position, true);
    let old_before = count_adjacent_regions(grid, old_owner, position, true);

    let after = Hypothetical::new(grid, index, new_owner);
    let new_after = count_adjacent_regions(&after, new_owner, position, true);
    let old_after = count_adjacent_regions(&after, old_owner, position, true);

    Some(Reassignment {
        position,
        index,
        old_owner,
        new_owner,
        new_owner_delta: i64::from(new_after) - i64::from(new_before),
        old_owner_delta: i64::from(old_after) - i64::from(old_before),
    })
}

/// Simulates the change and returns it only if both owners stay within
/// `max_areas`.
pub fn validate(
    grid: &Grid,
    position: Position,
    new_owner: u32,
    max_areas: u32,
) -> Result<Reassignment, MoveError> {
    if !grid.contains(position) {
        return Err(MoveError::OutOfBoard {
            x: position.x,
            y: position.y,
        });
    }
    let change = simulate(grid, position, new_owner).ok_or(MoveError::InvalidPlayer(new_owner))?;
    match change.violating_owner(grid, max_areas) {
        Some(owner) => Err(MoveError::AreaLimitExceeded { owner }),
        None => Ok(change),
    }
}

/// Returns true if handing `position` to `new_owner` keeps both affected
/// owners within `max_areas`. Off-board positions are never legal.
pub fn would_stay_within_limits(
    grid: &Grid,
    position: Position,
    new_owner: u32,
    max_areas: u32,
) -> bool {
    simulate(grid, position, new_owner).is_some_and(|c| c.within_limits(grid, max_areas))
}

/// Applies a simulated change: moves the field and adjusts both owners'
/// field and area counts.
///
/// `change` must have been simulated against the current state of `grid`.
pub fn commit(grid: &mut Grid, change: &Reassignment) {
    debug_assert_eq!(grid.fields()[change.index].owner, change.old_owner);
    grid.set_owner(change.index, change.new_owner);

    if let Some(record) = grid.owner_mut(change.new_owner) {
        record.busy_fields += 1;
        record.busy_areas = apply_delta(record.busy_areas, change.new_owner_delta);
    }
    if let Some(record) = grid.owner_mut(change.old_owner) {
        record.busy_fields -= 1;
        record.busy_areas = apply_delta(record.busy_areas, change.old_owner_delta);
    }

    trace!(
        x = change.position.x,
        y = change.position.y,
        from = change.old_owner,
        to = change.new_owner,
        "field reassigned"
    );
}

fn apply_delta(areas: u32, delta: i64) -> u32 {
    let updated = i64::from(areas) + delta;
    u32::try_from(updated.max(0)).unwrap_or(u32::MAX)
}
