//! Interactive mode.
//!
//! Draws the board in the terminal and lets players take turns moving a
//! cursor over it. The turn logic (`InteractiveState`) is independent of the
//! terminal so it can be driven by tests; `run` wires it to crossterm.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use tracing::{debug, warn};

use crate::game::Game;
use crate::protocol::render::{column_separator, column_width};

/// A player's input, decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    /// Space: ordinary move at the cursor.
    Move,
    /// `g`: golden move at the cursor.
    GoldenMove,
    /// `c`: give up the turn.
    Skip,
    /// Ctrl-D: end the game.
    Quit,
}

impl Input {
    /// Decodes a key press. Returns `None` for keys without a meaning.
    pub fn from_key(key: KeyEvent) -> Option<Input> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
            KeyCode::Up => Some(Input::Up),
            KeyCode::Down => Some(Input::Down),
            KeyCode::Left => Some(Input::Left),
            KeyCode::Right => Some(Input::Right),
            KeyCode::Char(' ') => Some(Input::Move),
            KeyCode::Char('g' | 'G') => Some(Input::GoldenMove),
            KeyCode::Char('c' | 'C') => Some(Input::Skip),
            _ => None,
        }
    }
}

/// Result of feeding one input to the turn logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The current player keeps the turn.
    Pending,
    /// The current player's turn is over.
    TurnOver,
    /// The game has been ended by a player.
    Quit,
}

/// Cursor position and turn order of an interactive game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractiveState {
    pub x: u32,
    pub y: u32,
    pub player: u32,
    pub over: bool,
}

impl InteractiveState {
    /// Starts with player 1 and the cursor on the top-left field.
    pub fn new(game: &Game) -> Self {
        InteractiveState {
            x: 0,
            y: game.height() - 1,
            player: 1,
            over: false,
        }
    }

    /// Applies one input of the current player.
    pub fn apply(&mut self, game: &mut Game, input: Input) -> Outcome {
        match input {
            Input::Up if self.y + 1 < game.height() => self.y += 1,
            Input::Down if self.y > 0 => self.y -= 1,
            Input::Right if self.x + 1 < game.width() => self.x += 1,
            Input::Left if self.x > 0 => self.x -= 1,
            Input::Move if game.play_move(self.player, self.x, self.y) => return Outcome::TurnOver,
            Input::GoldenMove if game.golden_move(self.player, self.x, self.y) => {
                return Outcome::TurnOver
            }
            Input::Skip => return Outcome::TurnOver,
            Input::Quit => {
                self.over = true;
                return Outcome::Quit;
            }
            _ => {}
        }
        Outcome::Pending
    }

    /// Passes the turn to the next player that still has a free field.
    ///
    /// The game is over once every player has been skipped.
    pub fn advance(&mut self, game: &Game) {
        let players = game.players();
        for _ in 0..players {
            self.player = self.player % players + 1;
            if game.free_fields(self.player) > 0 {
                return;
            }
        }
        self.over = true;
    }

    /// Screen cell `(column, row)` of the cursor, with `(0, 0)` at the top left
    /// of the drawn board. Points at the last character of the field's column.
    pub fn screen_position(&self, game: &Game) -> (u16, u16) {
        let width = column_width(game.players()) as u64;
        let stride = width + column_separator(game.players()) as u64;
        let column = u64::from(self.x) * stride + width - 1;
        let row = u64::from(game.height() - 1 - self.y);
        (
            u16::try_from(column).unwrap_or(u16::MAX),
            u16::try_from(row).unwrap_or(u16::MAX),
        )
    }

    /// The line shown under the board: player, busy and free fields, and `G`
    /// when the golden move is available.
    pub fn status_line(&self, game: &Game) -> String {
        let mut line = format!(
            "PLAYER {} {} {}",
            self.player,
            game.busy_fields(self.player),
            game.free_fields(self.player)
        );
        if game.golden_move_possible(self.player) {
            line.push_str(" G");
        }
        line
    }
}

/// Final board followed by every player's number of fields.
pub fn final_report(game: &Game) -> String {
    let mut report = game.render();
    for player in 1..=game.players() {
        report.push_str(&format!("PLAYER {} {}\n", player, game.busy_fields(player)));
    }
    report
}

/// Restores the terminal when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("failed to restore terminal: {e}");
        }
    }
}

fn draw<W: Write>(out: &mut W, game: &Game, state: &InteractiveState) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    let board = game.render();
    let mut row: u16 = 0;
    for line in board.lines() {
        queue!(out, MoveTo(0, row), Print(line))?;
        row = row.saturating_add(1);
    }
    queue!(out, MoveTo(0, row), Print(state.status_line(game)))?;
    let (column, cursor_row) = state.screen_position(game);
    queue!(out, MoveTo(column, cursor_row))?;
    out.flush()
}

/// Returns true if a terminal of `columns` x `rows` cells can show the board.
pub fn fits(columns: u16, rows: u16, game: &Game) -> bool {
    let width = column_width(game.players()) as u64;
    let separator = column_separator(game.players()) as u64;
    let board_columns = u64::from(game.width()) * (width + separator) - separator;
    u64::from(columns) >= board_columns && u64::from(rows) >= u64::from(game.height())
}

/// Like [`fits`], for a size query that may have failed. A terminal whose
/// size cannot be read, e.g. when there is no controlling terminal, does not
/// fit.
pub fn size_fits(size: io::Result<(u16, u16)>, game: &Game) -> bool {
    match size {
        Ok((columns, rows)) => fits(columns, rows, game),
        Err(e) => {
            debug!("cannot read terminal size: {e}");
            false
        }
    }
}

fn board_fits(game: &Game) -> bool {
    size_fits(terminal::size(), game)
}

fn report_too_small<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "The terminal is too small!")?;
    out.flush()
}

/// Plays `game` interactively on the terminal until it is over.
pub fn run(game: &mut Game) -> io::Result<()> {
    let mut stdout = io::stdout();

    if !board_fits(game) {
        return report_too_small(&mut stdout);
    }

    let mut state = InteractiveState::new(game);
    let mut too_small = false;
    {
        let _guard = RawModeGuard::enable()?;
        while !state.over {
            if !board_fits(game) {
                too_small = true;
                break;
            }
            draw(&mut stdout, game, &state)?;
            let input = match event::read()? {
                Event::Key(key) => Input::from_key(key),
                _ => None,
            };
            let Some(input) = input else { continue };
            match state.apply(game, input) {
                Outcome::Pending => {}
                Outcome::TurnOver => state.advance(game),
                Outcome::Quit => debug!(player = state.player, "game ended by player"),
            }
        }
    }

    if too_small {
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        return report_too_small(&mut stdout);
    }

    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    write!(stdout, "{}", final_report(game))?;
    stdout.flush()
}
