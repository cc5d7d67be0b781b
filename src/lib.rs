//! Gamma game engine library.
//!
//! Exposes the board representation, move validation, the game session and
//! the batch/interactive front ends for use by the binaries and tests.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod interactive;
pub mod logging;
pub mod moves;
pub mod playout;
pub mod protocol;

pub use config::GameConfig;
pub use error::{GameError, MoveError};
pub use game::{Game, GameSummary, PlayerSummary};
