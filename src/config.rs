//! Game configuration.
//!
//! The four parameters fixed for the lifetime of a session. Validation
//! happens here so every front end reports the same errors.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Immutable parameters of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    /// Number of real players; players are numbered `1..=players`.
    pub players: u32,
    /// Maximum number of disjoint areas a single player may own.
    pub max_areas: u32,
}

impl GameConfig {
    pub const fn new(width: u32, height: u32, players: u32, max_areas: u32) -> Self {
        GameConfig {
            width,
            height,
            players,
            max_areas,
        }
    }

    /// Checks that every parameter is positive and that the board is addressable.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.width == 0 {
            return Err(GameError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(GameError::ZeroHeight);
        }
        if self.players == 0 {
            return Err(GameError::ZeroPlayers);
        }
        if self.max_areas == 0 {
            return Err(GameError::ZeroAreas);
        }
        self.field_count().map(|_| ())
    }

    /// Returns `width * height`, or an error if it overflows `usize`.
    pub fn field_count(&self) -> Result<usize, GameError> {
        let too_large = GameError::BoardTooLarge {
            width: self.width,
            height: self.height,
        };
        let width = usize::try_from(self.width).map_err(|_| too_large.clone())?;
        let height = usize::try_from(self.height).map_err(|_| too_large.clone())?;
        width.checked_mul(height).ok_or(too_large)
    }
}
