//! Batch command parser.
//!
//! Parses one input line into a structured `Command`. A line is a single-byte
//! command letter followed by whitespace-separated decimal arguments, each of
//! which must fit in a `u32`. Empty lines and lines starting with `#` carry no
//! command.

use thiserror::Error;

use crate::config::GameConfig;

/// Errors that make an input line invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line contains only whitespace")]
    Blank,

    #[error("command '{0}' is not a single character")]
    CommandTooLong(String),

    #[error("argument '{0}' is not a 32-bit unsigned number")]
    InvalidNumber(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(char),

    #[error("command '{command}' takes {expected} arguments, got {found}")]
    WrongArgumentCount {
        command: char,
        expected: usize,
        found: usize,
    },
}

/// A parsed input command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `B width height players areas`: start a game in batch mode.
    Batch(GameConfig),

    /// `I width height players areas`: start a game in interactive mode.
    Interactive(GameConfig),

    /// `m player x y`
    Move { player: u32, x: u32, y: u32 },

    /// `g player x y`
    GoldenMove { player: u32, x: u32, y: u32 },

    /// `b player`
    BusyFields { player: u32 },

    /// `f player`
    FreeFields { player: u32 },

    /// `q player`
    GoldenPossible { player: u32 },

    /// `p`
    Print,
}

/// Whitespace as understood by the C locale: space, `\t`, `\n`, `\v`, `\f`, `\r`.
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Parses a decimal argument consisting of digits only.
fn parse_number(token: &str) -> Result<u32, ParseError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidNumber(token.to_string()));
    }
    token
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))
}

fn expect_args(command: char, args: &[u32], expected: usize) -> Result<(), ParseError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ParseError::WrongArgumentCount {
            command,
            expected,
            found: args.len(),
        })
    }
}

/// Parses a single line of input, without its trailing newline.
///
/// Returns `Ok(None)` for lines that carry no command: empty lines and
/// comments starting with `#`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = line.split(is_separator).filter(|t| !t.is_empty());
    let head = tokens.next().ok_or(ParseError::Blank)?;
    let args = tokens.map(parse_number).collect::<Result<Vec<u32>, _>>()?;

    let mut chars = head.chars();
    let command = match (chars.next(), head.len()) {
        (Some(c), 1) => c,
        _ => return Err(ParseError::CommandTooLong(head.to_string())),
    };

    let parsed = match command {
        'B' | 'I' => {
            expect_args(command, &args, 4)?;
            let config = GameConfig::new(args[0], args[1], args[2], args[3]);
            if command == 'B' {
                Command::Batch(config)
            } else {
                Command::Interactive(config)
            }
        }
        'm' | 'g' => {
            expect_args(command, &args, 3)?;
            let (player, x, y) = (args[0], args[1], args[2]);
            if command == 'm' {
                Command::Move { player, x, y }
            } else {
                Command::GoldenMove { player, x, y }
            }
        }
        'b' | 'f' | 'q' => {
            expect_args(command, &args, 1)?;
            let player = args[0];
            match command {
                'b' => Command::BusyFields { player },
                'f' => Command::FreeFields { player },
                _ => Command::GoldenPossible { player },
            }
        }
        'p' => {
            expect_args(command, &args, 0)?;
            Command::Print
        }
        other => return Err(ParseError::UnknownCommand(other)),
    };

    Ok(Some(parsed))
}
