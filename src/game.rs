//! Game session.
//!
//! Owns the board and per-player accounting for the lifetime of one game and
//! exposes the operations used by the batch and interactive front ends. Every
//! rejected operation leaves the session untouched.

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::board::{Grid, OwnerRecord, Position, UNOWNED};
use crate::config::GameConfig;
use crate::error::{GameError, MoveError};
use crate::moves::{commit, validate, would_stay_within_limits, Reassignment};
use crate::protocol::render::render;

/// Boards with at least this many fields scan free fields in parallel.
const PARALLEL_SCAN_THRESHOLD: usize = 4096;

/// Per-player statistics in a [`GameSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub player: u32,
    pub busy_fields: u64,
    pub busy_areas: u32,
    pub golden_move_used: bool,
}

/// A serializable snapshot of the session's accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub config: GameConfig,
    pub unowned_fields: u64,
    pub standings: Vec<PlayerSummary>,
}

/// A single game of gamma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    config: GameConfig,
    grid: Grid,
}

impl Game {
    /// Creates a session with an empty board.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let grid = Grid::new(&config)?;
        info!(
            width = config.width,
            height = config.height,
            players = config.players,
            max_areas = config.max_areas,
            "new game"
        );
        Ok(Game { config, grid })
    }

    pub fn with_dimensions(
        width: u32,
        height: u32,
        players: u32,
        max_areas: u32,
    ) -> Result<Self, GameError> {
        Game::new(GameConfig::new(width, height, players, max_areas))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn players(&self) -> u32 {
        self.config.players
    }

    pub fn max_areas(&self) -> u32 {
        self.config.max_areas
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the owner of field `(x, y)`, `UNOWNED` for a free field, or
    /// `None` if it is off the board.
    pub fn owner_at(&self, x: u32, y: u32) -> Option<u32> {
        self.grid.cell_at(Position::from((x, y))).map(|f| f.owner)
    }

    fn player_record(&self, player: u32) -> Result<&OwnerRecord, MoveError> {
        if player == UNOWNED || player > self.config.players {
            return Err(MoveError::InvalidPlayer(player));
        }
        self.grid.owner(player).ok_or(MoveError::InvalidPlayer(player))
    }

    fn field_owner(&self, position: Position) -> Result<u32, MoveError> {
        self.grid
            .cell_at(position)
            .map(|f| f.owner)
            .ok_or(MoveError::OutOfBoard {
                x: position.x,
                y: position.y,
            })
    }

    /// Checks an ordinary move and returns the change it would make.
    pub fn check_move(&self, player: u32, x: u32, y: u32) -> Result<Reassignment, MoveError> {
        self.player_record(player)?;
        let position = Position::from((x, y));
        match self.field_owner(position)? {
            UNOWNED => validate(&self.grid, position, player, self.config.max_areas),
            owner => Err(MoveError::FieldTaken(owner)),
        }
    }

    /// Checks a golden move and returns the change it would make.
    pub fn check_golden_move(
        &self,
        player: u32,
        x: u32,
        y: u32,
    ) -> Result<Reassignment, MoveError> {
        if self.player_record(player)?.golden_move_used {
            return Err(MoveError::GoldenMoveUsed(player));
        }
        let position = Position::from((x, y));
        let owner = self.field_owner(position)?;
        if owner == UNOWNED || owner == player {
            return Err(MoveError::NotCapturable);
        }
        validate(&self.grid, position, player, self.config.max_areas)
    }

    /// Places a pawn of `player` on the free field `(x, y)`.
    pub fn try_move(&mut self, player: u32, x: u32, y: u32) -> Result<(), MoveError> {
        let change = self.check_move(player, x, y)?;
        commit(&mut self.grid, &change);
        Ok(())
    }

    /// Takes the field `(x, y)` from another player, once per game.
    pub fn try_golden_move(&mut self, player: u32, x: u32, y: u32) -> Result<(), MoveError> {
        let change = self.check_golden_move(player, x, y)?;
        commit(&mut self.grid, &change);
        if let Some(record) = self.grid.owner_mut(player) {
            record.golden_move_used = true;
        }
        Ok(())
    }

    /// Makes an ordinary move. Returns false, leaving the game unchanged, if
    /// the move is illegal or a parameter is invalid.
    pub fn play_move(&mut self, player: u32, x: u32, y: u32) -> bool {
        match self.try_move(player, x, y) {
            Ok(()) => true,
            Err(e) => {
                debug!(player, x, y, "move rejected: {e}");
                false
            }
        }
    }

    /// Makes a golden move. Returns false, leaving the game unchanged, if the
    /// move is illegal or a parameter is invalid.
    pub fn golden_move(&mut self, player: u32, x: u32, y: u32) -> bool {
        match self.try_golden_move(player, x, y) {
            Ok(()) => true,
            Err(e) => {
                debug!(player, x, y, "golden move rejected: {e}");
                false
            }
        }
    }

    /// Number of fields owned by `player`, or 0 for an invalid player.
    pub fn busy_fields(&self, player: u32) -> u64 {
        self.player_record(player).map_or(0, |r| r.busy_fields)
    }

    /// Number of areas formed by `player`'s fields, or 0 for an invalid player.
    pub fn busy_areas(&self, player: u32) -> u32 {
        self.player_record(player).map_or(0, |r| r.busy_areas)
    }

    fn is_free_for(&self, player: u32, index: usize) -> bool {
        if self.grid.fields()[index].owner != UNOWNED {
            return false;
        }
        // Claiming a free field adds at most one area.
        if self.busy_areas(player) < self.config.max_areas {
            return true;
        }
        would_stay_within_limits(
            &self.grid,
            self.grid.position_of(index),
            player,
            self.config.max_areas,
        )
    }

    /// Number of fields where `player` could make an ordinary move right now.
    ///
    /// Every field is checked against the current board. An invalid player
    /// yields an error rather than a count.
    pub fn try_free_fields(&self, player: u32) -> Result<u64, MoveError> {
        self.player_record(player)?;
        let fields = self.grid.field_count();
        let count = if fields >= PARALLEL_SCAN_THRESHOLD {
            (0..fields)
                .into_par_iter()
                .filter(|&i| self.is_free_for(player, i))
                .count()
        } else {
            (0..fields).filter(|&i| self.is_free_for(player, i)).count()
        };
        Ok(count as u64)
    }

    /// Number of fields where `player` could make an ordinary move right now,
    /// or 0 for an invalid player.
    pub fn free_fields(&self, player: u32) -> u64 {
        self.try_free_fields(player).unwrap_or(0)
    }

    /// Positions counted by [`Game::free_fields`], in buffer order.
    pub fn legal_moves(&self, player: u32) -> Vec<Position> {
        if self.player_record(player).is_err() {
            return Vec::new();
        }
        (0..self.grid.field_count())
            .filter(|&i| self.is_free_for(player, i))
            .map(|i| self.grid.position_of(i))
            .collect()
    }

    /// Returns true if `player` has not used the golden move yet and some
    /// other player owns at least one field.
    pub fn golden_move_possible(&self, player: u32) -> bool {
        match self.player_record(player) {
            Ok(record) if !record.golden_move_used => (1..=self.config.players)
                .filter(|&p| p != player)
                .any(|p| self.busy_fields(p) > 0),
            _ => false,
        }
    }

    /// Renders the board as text, top row first.
    pub fn render(&self) -> String {
        render(self)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            config: self.config,
            unowned_fields: self.grid.owner(UNOWNED).map_or(0, |r| r.busy_fields),
            standings: (1..=self.config.players)
                .filter_map(|p| {
                    self.grid.owner(p).map(|r| PlayerSummary {
                        player: p,
                        busy_fields: r.busy_fields,
                        busy_areas: r.busy_areas,
                        golden_move_used: r.golden_move_used,
                    })
                })
                .collect(),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(width: u32, height: u32, players: u32, areas: u32) -> Game {
        Game::with_dimensions(width, height, players, areas).unwrap()
    }

    #[test]
    fn new_game_rejects_zero_parameters() {
        assert_eq!(Game::with_dimensions(0, 1, 1, 1), Err(GameError::ZeroWidth));
        assert_eq!(Game::with_dimensions(1, 0, 1, 1), Err(GameError::ZeroHeight));
        assert_eq!(Game::with_dimensions(1, 1, 0, 1), Err(GameError::ZeroPlayers));
        assert_eq!(Game::with_dimensions(1, 1, 1, 0), Err(GameError::ZeroAreas));
    }

    #[test]
    fn new_game_is_empty() {
        let g = game(3, 2, 2, 1);
        assert_eq!(g.busy_fields(1), 0);
        assert_eq!(g.busy_fields(2), 0);
        assert_eq!(g.free_fields(1), 6);
        assert!(!g.golden_move_possible(1));
        assert_eq!(g.owner_at(2, 1), Some(UNOWNED));
        assert_eq!(g.owner_at(3, 1), None);
    }

    #[test]
    fn move_rejects_invalid_parameters() {
        let mut g = game(3, 3, 2, 1);
        assert_eq!(g.try_move(0, 0, 0), Err(MoveError::InvalidPlayer(0)));
        assert_eq!(g.try_move(3, 0, 0), Err(MoveError::InvalidPlayer(3)));
        assert_eq!(g.try_move(1, 3, 0), Err(MoveError::OutOfBoard { x: 3, y: 0 }));
        assert_eq!(g.try_move(1, 0, 3), Err(MoveError::OutOfBoard { x: 0, y: 3 }));
        assert!(!g.play_move(1, u32::MAX, u32::MAX));
        assert_eq!(g, game(3, 3, 2, 1));
    }

    #[test]
    fn move_rejects_taken_field() {
        let mut g = game(3, 3, 2, 2);
        assert!(g.play_move(1, 1, 1));
        assert_eq!(g.try_move(2, 1, 1), Err(MoveError::FieldTaken(1)));
        assert_eq!(g.try_move(1, 1, 1), Err(MoveError::FieldTaken(1)));
    }

    #[test]
    fn area_limit_applies_per_player() {
        let mut g = game(5, 5, 2, 2);
        assert!(g.play_move(1, 0, 0));
        assert!(g.play_move(1, 2, 0));
        assert_eq!(g.busy_areas(1), 2);
        assert_eq!(g.try_move(1, 4, 0), Err(MoveError::AreaLimitExceeded { owner: 1 }));
        assert!(g.play_move(1, 1, 0));
        assert_eq!(g.busy_areas(1), 1);
        assert!(g.play_move(1, 4, 0));
        assert!(g.play_move(2, 4, 4));
        assert!(g.play_move(2, 0, 4));
    }

    #[test]
    fn free_fields_at_limit_counts_only_adjacent() {
        let mut g = game(4, 4, 2, 1);
        assert!(g.play_move(1, 1, 1));
        // Only the four neighbors of (1,1) remain legal for player 1.
        assert_eq!(g.free_fields(1), 4);
        assert_eq!(g.free_fields(2), 15);
        assert_eq!(g.legal_moves(1).len(), 4);
        assert!(g.legal_moves(1).contains(&Position::new(1, 2)));
    }

    #[test]
    fn free_fields_invalid_player() {
        let g = game(2, 2, 1, 1);
        assert_eq!(g.free_fields(0), 0);
        assert_eq!(g.free_fields(2), 0);
        assert_eq!(g.try_free_fields(2), Err(MoveError::InvalidPlayer(2)));
        assert!(g.legal_moves(2).is_empty());
    }

    #[test]
    fn free_fields_parallel_matches_sequential() {
        let mut g = game(80, 80, 3, 2);
        for i in 0..40 {
            assert!(g.play_move(1, i, 10));
            assert!(g.play_move(2, i, 40));
        }
        assert!(g.grid().field_count() >= PARALLEL_SCAN_THRESHOLD);
        for player in 1..=3 {
            assert_eq!(g.free_fields(player), g.legal_moves(player).len() as u64);
        }
    }

    #[test]
    fn golden_move_captures_once() {
        let mut g = game(4, 4, 2, 2);
        assert!(g.play_move(1, 0, 0));
        assert!(g.play_move(1, 3, 3));
        assert!(g.play_move(2, 1, 1));
        assert!(g.golden_move_possible(2));
        assert!(g.golden_move(2, 0, 0));
        assert_eq!(g.owner_at(0, 0), Some(2));
        assert_eq!(g.busy_fields(1), 1);
        assert_eq!(g.busy_fields(2), 2);
        assert!(!g.golden_move_possible(2));
        assert_eq!(g.try_golden_move(2, 3, 3), Err(MoveError::GoldenMoveUsed(2)));
        assert_eq!(g.owner_at(3, 3), Some(1));
    }

    #[test]
    fn golden_move_rejects_free_and_own_fields() {
        let mut g = game(3, 3, 2, 2);
        assert!(g.play_move(1, 0, 0));
        assert!(g.play_move(2, 2, 2));
        assert_eq!(g.try_golden_move(1, 1, 1), Err(MoveError::NotCapturable));
        assert_eq!(g.try_golden_move(1, 0, 0), Err(MoveError::NotCapturable));
        assert_eq!(
            g.try_golden_move(1, 5, 5),
            Err(MoveError::OutOfBoard { x: 5, y: 5 })
        );
        assert_eq!(g.try_golden_move(3, 2, 2), Err(MoveError::InvalidPlayer(3)));
        assert!(g.golden_move_possible(1));
    }

    #[test]
    fn golden_move_respects_attacker_limit() {
        let mut g = game(5, 1, 2, 1);
        assert!(g.play_move(1, 0, 0));
        assert!(g.play_move(2, 4, 0));
        assert!(g.play_move(2, 3, 0));
        // Player 1 would gain a second, detached area.
        assert_eq!(
            g.try_golden_move(1, 4, 0),
            Err(MoveError::AreaLimitExceeded { owner: 1 })
        );
        assert!(g.golden_move_possible(1));
    }

    #[test]
    fn golden_move_possible_requires_opponent_fields() {
        let mut g = game(3, 3, 3, 1);
        assert!(g.play_move(1, 0, 0));
        assert!(!g.golden_move_possible(1));
        assert!(g.golden_move_possible(2));
        assert!(g.golden_move_possible(3));
        assert!(!g.golden_move_possible(0));
        assert!(!g.golden_move_possible(4));
    }

    #[test]
    fn summary_reports_standings() {
        let mut g = game(3, 3, 2, 2);
        assert!(g.play_move(1, 0, 0));
        assert!(g.play_move(2, 2, 2));
        assert!(g.golden_move(2, 0, 0));
        let summary = g.summary();
        assert_eq!(summary.unowned_fields, 7);
        assert_eq!(summary.standings.len(), 2);
        assert_eq!(summary.standings[1].busy_fields, 2);
        assert_eq!(summary.standings[1].busy_areas, 2);
        assert!(summary.standings[1].golden_move_used);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"unowned_fields\":7"));
    }

    #[test]
    fn display_matches_render() {
        let mut g = game(2, 2, 2, 1);
        assert!(g.play_move(2, 1, 1));
        assert_eq!(g.to_string(), g.render());
        assert_eq!(g.to_string(), ".2\n..\n");
    }
}
