//! Random playout CLI.
//!
//! Plays random gamma games, checks the engine's area accounting after every
//! move and outputs one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin playout -- [OPTIONS]

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use gamma::logging;
use gamma::playout::{self, PlayoutConfig};

#[derive(Parser, Debug)]
#[command(name = "playout", about = "Plays random gamma games and checks engine invariants")]
struct Args {
    /// Number of games to play [default: 10]
    #[arg(short, long)]
    games: Option<usize>,

    /// Board width [default: 20]
    #[arg(long)]
    width: Option<u32>,

    /// Board height [default: 20]
    #[arg(long)]
    height: Option<u32>,

    /// Number of players [default: 4]
    #[arg(short, long)]
    players: Option<u32>,

    /// Maximum number of areas per player [default: 3]
    #[arg(short, long)]
    areas: Option<u32>,

    /// Chance of trying a golden move on a turn [default: 0.05]
    #[arg(long)]
    golden: Option<f64>,

    /// Number of parallel threads [default: 4]
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Random seed, 0 for entropy [default: 0]
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suppress progress and summary output
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn config(&self) -> PlayoutConfig {
        let defaults = PlayoutConfig::default();
        PlayoutConfig {
            num_games: self.games.unwrap_or(defaults.num_games),
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            players: self.players.unwrap_or(defaults.players),
            max_areas: self.areas.unwrap_or(defaults.max_areas),
            golden_probability: self.golden.unwrap_or(defaults.golden_probability),
            threads: self.threads.unwrap_or(defaults.threads),
            seed: self.seed.unwrap_or(defaults.seed),
            quiet: self.quiet,
        }
    }
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();
    let config = args.config();

    if !config.quiet {
        eprintln!(
            "Playout: {} games on {}x{}, {} players, {} areas, golden {:.2}, {} threads",
            config.num_games,
            config.width,
            config.height,
            config.players,
            config.max_areas,
            config.golden_probability,
            config.threads
        );
    }

    let start = Instant::now();
    let records = match playout::run_playouts(&config) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("playout: {e}");
            return ExitCode::FAILURE;
        }
    };
    let elapsed = start.elapsed();

    if !config.quiet {
        eprintln!(
            "Completed {} games in {:.1}s",
            records.len(),
            elapsed.as_secs_f64()
        );
        playout::print_summary(&records);
    }

    let written = match &args.output {
        Some(path) => File::create(path)
            .and_then(|file| playout::write_jsonl(&records, &mut BufWriter::new(file))),
        None => playout::write_jsonl(&records, &mut BufWriter::new(io::stdout().lock())),
    };

    match written {
        Ok(()) => {
            if let (Some(path), false) = (&args.output, config.quiet) {
                eprintln!("Wrote {} games to {}", records.len(), path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("playout: failed to write output: {e}");
            ExitCode::FAILURE
        }
    }
}
