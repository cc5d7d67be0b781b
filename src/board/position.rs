//! Board coordinates and neighborhood enumeration.
//!
//! Positions are signed so that the neighbors of an edge field can be
//! computed first and bounds-checked afterwards.

use serde::{Deserialize, Serialize};

/// A 2D coordinate on the board. `(0, 0)` is the bottom-left field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

/// Neighbor directions in the fixed enumeration order used by area counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    North,
    West,
    South,
    /// The position itself, used when the center field counts as a neighbor.
    Center,
}

/// The four proper neighbor directions followed by the center.
pub const NEIGHBORHOOD: [Direction; 5] = [
    Direction::East,
    Direction::North,
    Direction::West,
    Direction::South,
    Direction::Center,
];

impl Direction {
    /// Returns the `(dx, dy)` offset of this direction.
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Direction::East => (1, 0),
            Direction::North => (0, 1),
            Direction::West => (-1, 0),
            Direction::South => (0, -1),
            Direction::Center => (0, 0),
        }
    }
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Self {
        Position { x, y }
    }

    /// Returns the position one step away in `direction`.
    pub const fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the four proper neighbors: east, north, west, south.
    pub fn neighbors(self) -> [Position; 4] {
        [
            self.step(Direction::East),
            self.step(Direction::North),
            self.step(Direction::West),
            self.step(Direction::South),
        ]
    }

    /// Returns the neighborhood scanned by area counting: the four proper
    /// neighbors, followed by the position itself when `include_center` is set.
    pub fn neighborhood(self, include_center: bool) -> impl Iterator<Item = Position> {
        let count = if include_center { 5 } else { 4 };
        NEIGHBORHOOD
            .into_iter()
            .take(count)
            .map(move |d| self.step(d))
    }
}

impl From<(u32, u32)> for Position {
    fn from((x, y): (u32, u32)) -> Self {
        Position::new(i64::from(x), i64::from(y))
    }
}
