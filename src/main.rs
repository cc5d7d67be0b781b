//! Gamma -- a territory-claiming board game.
//!
//! Reads batch commands from a file or stdin, answers on stdout and reports
//! invalid lines on stderr. An `I` command switches to the interactive mode
//! on the terminal.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use gamma::{interactive, logging, protocol};

#[derive(Parser, Debug)]
#[command(name = "gamma")]
#[command(version, about = "Plays gamma in batch or interactive mode", long_about = None)]
struct Cli {
    /// Read commands from this file instead of stdin.
    input: Option<PathBuf>,
}

fn open_input(path: Option<&PathBuf>) -> io::Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    })
}

fn run(cli: &Cli) -> io::Result<()> {
    let input = open_input(cli.input.as_ref())?;
    let game = {
        let mut out = BufWriter::new(io::stdout().lock());
        let mut err = io::stderr().lock();
        let game = protocol::run_batch(input, &mut out, &mut err)?;
        out.flush()?;
        game
    };

    if let Some(mut game) = game {
        info!("entering interactive mode");
        interactive::run(&mut game)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("gamma: {e}");
            ExitCode::FAILURE
        }
    }
}
