//! Connectivity oracle.
//!
//! Breadth-first searches restricted to the fields of a single owner. Every
//! query keeps its own visited set, so no search state outlives a call and
//! concurrent read-only queries against the same grid are safe.

use std::collections::{HashSet, VecDeque};

use super::grid::{OwnerLookup, UNOWNED};
use super::position::Position;

/// Returns true if `a` and `b` lie in the same area.
///
/// Both fields must have the same owner and be joined by a four-directional
/// path of that owner's fields. Two unowned fields are in the same area iff
/// they are connected through unowned fields. Off-board positions are never
/// in any area.
pub fn same_region<L: OwnerLookup + ?Sized>(board: &L, a: Position, b: Position) -> bool {
    let (owner_a, owner_b) = match (board.owner_at(a), board.owner_at(b)) {
        (Some(oa), Some(ob)) => (oa, ob),
        _ => return false,
    };
    if owner_a != owner_b {
        return false;
    }
    bfs(board, a, b, owner_a)
}

/// Searches for `goal` starting from `source`, visiting only fields of `owner`.
fn bfs<L: OwnerLookup + ?Sized>(board: &L, source: Position, goal: Position, owner: u32) -> bool {
    let mut visited: HashSet<Position> = HashSet::new();
    let mut queue: VecDeque<Position> = VecDeque::new();
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        if board.owner_at(current) != Some(owner) || !visited.insert(current) {
            continue;
        }
        if current == goal {
            return true;
        }
        queue.extend(current.neighbors());
    }

    false
}

/// Counts the distinct areas of `owner` touching the neighborhood of `position`.
///
/// The neighborhood is the four proper neighbors, plus `position` itself when
/// `include_center` is set. A neighbor owned by `owner` opens a new area
/// unless it shares one with an earlier neighbor in the enumeration. The
/// pseudo-owner's areas are never counted, so `UNOWNED` always yields 0.
pub fn count_adjacent_regions<L: OwnerLookup + ?Sized>(
    board: &L,
    owner: u32,
    position: Position,
    include_center: bool,
) -> u32 {
    if owner == UNOWNED {
        return 0;
    }

    let mut seen: Vec<Position> = Vec::with_capacity(5);
    let mut regions = 0;

    for neighbor in position.neighborhood(include_center) {
        if board.owner_at(neighbor) != Some(owner) {
            continue;
        }
        let is_new = !seen.iter().any(|&earlier| same_region(board, neighbor, earlier));
        if is_new {
            regions += 1;
        }
        seen.push(neighbor);
    }

    regions
}

/// Counts every area of `owner` on a board of `width` x `height` from scratch.
///
/// Linear in the board size. Used to cross-check the incremental accounting,
/// never on the move path.
pub fn count_regions<L: OwnerLookup + ?Sized>(board: &L, owner: u32, width: u32, height: u32) -> u32 {
    let mut visited: HashSet<Position> = HashSet::new();
    let mut regions = 0;

    for y in 0..i64::from(height) {
        for x in 0..i64::from(width) {
            let start = Position::new(x, y);
            if board.owner_at(start) != Some(owner) || visited.contains(&start) {
                continue;
            }
            regions += 1;
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                if board.owner_at(current) != Some(owner) || !visited.insert(current) {
                    continue;
                }
                queue.extend(current.neighbors());
            }
        }
    }

    regions
}
