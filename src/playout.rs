//! Random playouts for soak-testing the engine.
//!
//! Plays games of uniformly random legal moves, with an occasional golden
//! move, and after every accepted move recomputes the area counts from
//! scratch to check them against the incremental accounting. Results are
//! written as JSONL, one record per game.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::board::{count_regions, Position, UNOWNED};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{Game, GameSummary};

/// Configuration for a batch of playouts.
#[derive(Debug, Clone)]
pub struct PlayoutConfig {
    /// Number of games to play.
    pub num_games: usize,
    pub width: u32,
    pub height: u32,
    pub players: u32,
    pub max_areas: u32,
    /// Chance that a player tries a golden move before an ordinary one.
    pub golden_probability: f64,
    /// Number of parallel threads; 1 plays the games in order.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        PlayoutConfig {
            num_games: 10,
            width: 20,
            height: 20,
            players: 4,
            max_areas: 3,
            golden_probability: 0.05,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

impl PlayoutConfig {
    pub fn game_config(&self) -> GameConfig {
        GameConfig::new(self.width, self.height, self.players, self.max_areas)
    }

    /// Checks the golden move probability and the game parameters.
    pub fn validate(&self) -> Result<(), PlayoutError> {
        if !(0.0..=1.0).contains(&self.golden_probability) {
            return Err(PlayoutError::InvalidProbability(self.golden_probability));
        }
        self.game_config().validate()?;
        Ok(())
    }
}

/// Errors that abort a playout run.
#[derive(Debug, Error)]
pub enum PlayoutError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("golden move probability {0} is not within [0, 1]")]
    InvalidProbability(f64),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("game {game_id}: {detail}")]
    InvariantViolated { game_id: usize, detail: String },
}

/// Outcome of one playout.
#[derive(Debug, Clone, Serialize)]
pub struct PlayoutRecord {
    pub game_id: usize,
    /// Accepted ordinary moves.
    pub moves: u64,
    /// Accepted golden moves.
    pub golden_moves: u64,
    /// Golden moves tried and rejected.
    pub rejected_golden_moves: u64,
    /// Final board accounting.
    pub summary: GameSummary,
}

fn violation(game_id: usize, detail: impl Into<String>) -> PlayoutError {
    PlayoutError::InvariantViolated {
        game_id,
        detail: detail.into(),
    }
}

/// Recomputes every player's areas from scratch and compares them with the
/// session's accounting.
pub fn check_invariants(game: &Game, game_id: usize) -> Result<(), PlayoutError> {
    let grid = game.grid();
    let mut owned = 0u64;
    for player in 1..=game.players() {
        let areas = game.busy_areas(player);
        let actual = count_regions(grid, player, game.width(), game.height());
        if areas != actual {
            return Err(violation(
                game_id,
                format!("player {player} has {actual} areas, accounted {areas}"),
            ));
        }
        if areas > game.max_areas() {
            return Err(violation(
                game_id,
                format!("player {player} has {areas} areas, limit {}", game.max_areas()),
            ));
        }
        owned += game.busy_fields(player);
    }

    let free = grid.owner(UNOWNED).map_or(0, |r| r.busy_fields);
    if owned + free != grid.field_count() as u64 {
        return Err(violation(
            game_id,
            format!("{owned} owned and {free} free fields on a board of {}", grid.field_count()),
        ));
    }
    Ok(())
}

fn coordinates(position: Position, game_id: usize) -> Result<(u32, u32), PlayoutError> {
    match (u32::try_from(position.x), u32::try_from(position.y)) {
        (Ok(x), Ok(y)) => Ok((x, y)),
        _ => Err(violation(game_id, format!("position {position:?} is off the board"))),
    }
}

#[derive(Default)]
struct Counters {
    moves: u64,
    golden_moves: u64,
    rejected_golden_moves: u64,
}

/// Tries a golden move against a random opponent field. A rejected attempt
/// must leave the board as it was.
fn try_golden_move(
    game: &mut Game,
    player: u32,
    game_id: usize,
    rng: &mut SmallRng,
    counters: &mut Counters,
) -> Result<bool, PlayoutError> {
    let grid = game.grid();
    let targets: Vec<Position> = (0..grid.field_count())
        .filter(|&i| {
            let owner = grid.fields()[i].owner;
            owner != UNOWNED && owner != player
        })
        .map(|i| grid.position_of(i))
        .collect();
    if targets.is_empty() {
        return Ok(false);
    }

    let (x, y) = coordinates(targets[rng.gen_range(0..targets.len())], game_id)?;
    let before = game.grid().clone();
    if game.golden_move(player, x, y) {
        counters.golden_moves += 1;
        return Ok(true);
    }
    counters.rejected_golden_moves += 1;
    if *game.grid() != before {
        return Err(violation(game_id, "rejected golden move changed the board"));
    }
    Ok(false)
}

/// Plays one turn of `player`. Returns false if the player could not move.
fn take_turn(
    game: &mut Game,
    player: u32,
    config: &PlayoutConfig,
    game_id: usize,
    rng: &mut SmallRng,
    counters: &mut Counters,
) -> Result<bool, PlayoutError> {
    if game.golden_move_possible(player)
        && rng.gen_bool(config.golden_probability)
        && try_golden_move(game, player, game_id, rng, counters)?
    {
        check_invariants(game, game_id)?;
        return Ok(true);
    }

    let legal = game.legal_moves(player);
    let free = game.free_fields(player);
    if free != legal.len() as u64 {
        return Err(violation(
            game_id,
            format!("player {player} has {free} free fields but {} legal moves", legal.len()),
        ));
    }
    if legal.is_empty() {
        return Ok(false);
    }

    let (x, y) = coordinates(legal[rng.gen_range(0..legal.len())], game_id)?;
    if !game.play_move(player, x, y) {
        return Err(violation(game_id, format!("legal move ({x}, {y}) of player {player} was rejected")));
    }
    counters.moves += 1;
    check_invariants(game, game_id)?;
    Ok(true)
}

/// Plays a single game until a full round passes without any accepted move.
pub fn play_game(
    config: &PlayoutConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<PlayoutRecord, PlayoutError> {
    config.validate()?;
    let mut game = Game::new(config.game_config())?;
    let players = game.players();
    let mut counters = Counters::default();
    let mut player = 1;
    let mut idle = 0;

    while idle < players {
        if take_turn(&mut game, player, config, game_id, rng, &mut counters)? {
            idle = 0;
        } else {
            idle += 1;
        }
        player = player % players + 1;
    }

    debug!(
        game_id,
        moves = counters.moves,
        golden_moves = counters.golden_moves,
        "playout finished"
    );

    Ok(PlayoutRecord {
        game_id,
        moves: counters.moves,
        golden_moves: counters.golden_moves,
        rejected_golden_moves: counters.rejected_golden_moves,
        summary: game.summary(),
    })
}

fn game_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn report_progress(config: &PlayoutConfig, done: usize, record: &PlayoutRecord, start: Instant) {
    if config.quiet {
        return;
    }
    eprintln!(
        "Game {}/{}: {} moves, {} golden ({:.1}s)",
        done,
        config.num_games,
        record.moves,
        record.golden_moves,
        start.elapsed().as_secs_f64(),
    );
}

/// Runs `config.num_games` playouts and returns their records in game order.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
/// Each game gets its own generator seeded with `seed + game_id`, so the
/// records do not depend on the thread count.
pub fn run_playouts(config: &PlayoutConfig) -> Result<Vec<PlayoutRecord>, PlayoutError> {
    config.validate()?;

    let completed = AtomicUsize::new(0);
    let play = |game_id: usize| -> Result<PlayoutRecord, PlayoutError> {
        let start = Instant::now();
        let record = play_game(config, game_id, &mut game_rng(config.seed, game_id))?;
        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        report_progress(config, done, &record, start);
        Ok(record)
    };

    if config.threads > 1 {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| (0..config.num_games).into_par_iter().map(play).collect())
    } else {
        (0..config.num_games).map(play).collect()
    }
}

/// Writes playout records as JSONL (one JSON object per line).
pub fn write_jsonl<W: Write>(records: &[PlayoutRecord], out: &mut W) -> std::io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Prints a summary of playout results to stderr.
pub fn print_summary(records: &[PlayoutRecord]) {
    let total = records.len();
    let moves: u64 = records.iter().map(|r| r.moves).sum();
    let golden: u64 = records.iter().map(|r| r.golden_moves).sum();
    let rejected: u64 = records.iter().map(|r| r.rejected_golden_moves).sum();
    let unowned: u64 = records.iter().map(|r| r.summary.unowned_fields).sum();

    eprintln!("=== Playout Summary ===");
    eprintln!("Games: {}", total);
    eprintln!("Avg moves/game: {:.1}", moves as f64 / total.max(1) as f64);
    eprintln!("Golden moves: {} accepted, {} rejected", golden, rejected);
    eprintln!(
        "Avg unowned fields at end: {:.1}",
        unowned as f64 / total.max(1) as f64
    );
}
