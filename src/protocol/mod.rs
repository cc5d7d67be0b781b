//! Text protocol handling.
//!
//! Board rendering, the line-command parser, and the batch-mode driver that
//! answers commands read from an input stream.

pub mod batch;
pub mod parser;
pub mod render;

pub use batch::{run as run_batch, BatchSession, LineError, Step};
pub use parser::{parse_line, Command, ParseError};
pub use render::{column_separator, column_width, digits, render, UNOWNED_SYMBOL};
