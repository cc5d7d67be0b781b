//! Error types for session construction and move validation.

use thiserror::Error;

/// Errors that can occur while creating a game session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("board width must be positive")]
    ZeroWidth,

    #[error("board height must be positive")]
    ZeroHeight,

    #[error("number of players must be positive")]
    ZeroPlayers,

    #[error("maximum number of areas must be positive")]
    ZeroAreas,

    #[error("board of {width}x{height} fields does not fit in memory")]
    BoardTooLarge { width: u32, height: u32 },

    #[error("failed to allocate {0} records")]
    Allocation(usize),
}

/// Reasons a move, golden move, or per-player query is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("player {0} is not in the game")]
    InvalidPlayer(u32),

    #[error("field ({x}, {y}) is outside the board")]
    OutOfBoard { x: i64, y: i64 },

    #[error("field is already taken by player {0}")]
    FieldTaken(u32),

    #[error("field is not owned by an opponent")]
    NotCapturable,

    #[error("player {0} has already used the golden move")]
    GoldenMoveUsed(u32),

    #[error("player {owner} would exceed the area limit")]
    AreaLimitExceeded { owner: u32 },
}
