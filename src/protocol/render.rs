//! Text rendering of the board.
//!
//! One line per board row, top row first. Every field is right-aligned to
//! the width of the largest player number; unowned fields are drawn as `.`.
//! When player numbers need more than one digit, columns are separated by a
//! single space.

use crate::board::UNOWNED;
use crate::game::Game;

/// Symbol drawn for an unowned field.
pub const UNOWNED_SYMBOL: char = '.';

/// Number of decimal digits of `n`.
pub fn digits(n: u32) -> u32 {
    n.checked_ilog10().map_or(1, |d| d + 1)
}

/// Width of one rendered column for a game with `players` players.
pub fn column_width(players: u32) -> usize {
    digits(players) as usize
}

/// Number of spaces between rendered columns for a game with `players` players.
pub fn column_separator(players: u32) -> usize {
    usize::from(digits(players) > 1)
}

/// Renders the board of `game` as text.
pub fn render(game: &Game) -> String {
    let width = column_width(game.players());
    let separator = " ".repeat(column_separator(game.players()));
    let row_len = (width + separator.len()) * game.width() as usize + 1;
    let mut out = String::with_capacity(row_len * game.height() as usize);

    for y in (0..game.height()).rev() {
        for x in 0..game.width() {
            if x > 0 {
                out.push_str(&separator);
            }
            let cell = match game.owner_at(x, y) {
                Some(UNOWNED) | None => format!("{:>width$}", UNOWNED_SYMBOL),
                Some(owner) => format!("{:>width$}", owner),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }

    out
}
