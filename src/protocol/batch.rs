//! Batch mode.
//!
//! Reads commands line by line, answers each on the output stream and reports
//! invalid lines as `ERROR <line>` on the error stream. The first valid line
//! must create the game; `I` hands the game over to the interactive mode.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::Game;

use super::parser::{parse_line, Command, ParseError};

/// Why a single input line was rejected.
#[derive(Debug, Error)]
pub enum LineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot create game: {0}")]
    Game(#[from] GameError),

    #[error("no game has been started")]
    NoGame,

    #[error("a game is already in progress")]
    GameInProgress,

    #[error("output failed: {0}")]
    Io(#[from] io::Error),
}

/// What the caller should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// The game was created with `I`; switch to the interactive mode.
    Interactive,
}

/// State of a batch-mode session between lines.
#[derive(Debug, Default)]
pub struct BatchSession {
    game: Option<Game>,
}

impl BatchSession {
    pub fn new() -> Self {
        BatchSession { game: None }
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn into_game(self) -> Option<Game> {
        self.game
    }

    /// Handles one raw input line, numbered from 1.
    pub fn handle_line<W: Write>(
        &mut self,
        line: &str,
        line_number: u64,
        out: &mut W,
    ) -> Result<Step, LineError> {
        match parse_line(line)? {
            Some(command) => self.execute(command, line_number, out),
            None => Ok(Step::Continue),
        }
    }

    fn start<W: Write>(
        &mut self,
        config: GameConfig,
        line_number: u64,
        out: &mut W,
    ) -> Result<(), LineError> {
        if self.game.is_some() {
            return Err(LineError::GameInProgress);
        }
        self.game = Some(Game::new(config)?);
        writeln!(out, "OK {line_number}")?;
        Ok(())
    }

    fn game_mut(&mut self) -> Result<&mut Game, LineError> {
        self.game.as_mut().ok_or(LineError::NoGame)
    }

    /// Executes a parsed command and writes its answer.
    pub fn execute<W: Write>(
        &mut self,
        command: Command,
        line_number: u64,
        out: &mut W,
    ) -> Result<Step, LineError> {
        match command {
            Command::Batch(config) => {
                self.start(config, line_number, out)?;
                return Ok(Step::Continue);
            }
            Command::Interactive(config) => {
                self.start(config, line_number, out)?;
                return Ok(Step::Interactive);
            }
            Command::Move { player, x, y } => {
                let accepted = self.game_mut()?.play_move(player, x, y);
                writeln!(out, "{}", u8::from(accepted))?;
            }
            Command::GoldenMove { player, x, y } => {
                let accepted = self.game_mut()?.golden_move(player, x, y);
                writeln!(out, "{}", u8::from(accepted))?;
            }
            Command::BusyFields { player } => {
                writeln!(out, "{}", self.game_mut()?.busy_fields(player))?;
            }
            Command::FreeFields { player } => {
                writeln!(out, "{}", self.game_mut()?.free_fields(player))?;
            }
            Command::GoldenPossible { player } => {
                let possible = self.game_mut()?.golden_move_possible(player);
                writeln!(out, "{}", u8::from(possible))?;
            }
            Command::Print => write!(out, "{}", self.game_mut()?.render())?,
        }

        Ok(Step::Continue)
    }
}

/// Reads one line into `buf` without its trailing `\n`. Returns false at EOF.
fn read_line<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    if input.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    Ok(true)
}

/// Runs batch mode over `input` until EOF or until an `I` command.
///
/// Answers go to `out`, `ERROR <line>` reports go to `err`. Returns the
/// game when the interactive mode was requested, `None` otherwise.
pub fn run<R: BufRead, W: Write, E: Write>(
    mut input: R,
    out: &mut W,
    err: &mut E,
) -> io::Result<Option<Game>> {
    let mut session = BatchSession::new();
    let mut buf = Vec::new();
    let mut line_number: u64 = 0;

    while read_line(&mut input, &mut buf)? {
        line_number += 1;
        let line = String::from_utf8_lossy(&buf);

        match session.handle_line(&line, line_number, out) {
            Ok(Step::Continue) => {}
            Ok(Step::Interactive) => {
                out.flush()?;
                return Ok(session.into_game());
            }
            Err(LineError::Io(e)) => return Err(e),
            Err(e) => {
                debug!(line = line_number, "rejected: {e}");
                writeln!(err, "ERROR {line_number}")?;
            }
        }
        out.flush()?;
    }

    Ok(None)
}
