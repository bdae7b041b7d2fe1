/*
cli_options.rs

Copyright 2025 Hervé Quatremain

This file is part of Impostori.

Impostori is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Impostori is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Impostori. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Process command-line options.
//!
//! The command generates a batch of puzzles and writes them in JSON format, to the standard
//! output or to a file.
//!
//! # Examples
//!
//! Generate three hard puzzles, reproducibly, and print some statistics:
//!
//! ```
//! $ impostori -c 3 -f hard --seed 42 -o puzzles.json -s
//!
//!         total time = 1.82s
//!       average time = 0.61s
//!           max time = 0.74s
//!    average dropout = 0.69
//!  incomplete prunes = 0
//!         duplicates = 0
//!             errors = 0
//! ```
//!
//! Progress messages are logged at the info level: set `RUST_LOG=info` to display them.

use clap::Parser;
use log::debug;
use std::env;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use impostori::generator::puzzles::{Difficulty, PuzzleBatch, Settings};
use impostori::generator::rules::ImpostoriRule;
use impostori::progress::ProgressReporter;
use impostori::saver::puzzles::{EncodedPuzzle, SaverPuzzles, write_puzzles};

const COPYRIGHT_NOTICE: &str = "Copyright 2025 Hervé Quatremain
License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>.
This is free software: you are free to change and redistribute it.
There is NO WARRANTY, to the extent permitted by law.";

// Failed generations tolerated for each requested puzzle before the batch is abandoned.
const MAX_FAILURES_PER_PUZZLE: usize = 10;

/// Generate Impostori puzzles.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Number of puzzles to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Difficulty level for the puzzles
    #[arg(value_enum, short = 'f', long, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Fraction of the adjacencies to drop, between 0.0 and 1.0 (overrides the difficulty level)
    #[arg(short = 'r', long, value_parser = parse_dropout)]
    dropout: Option<f64>,

    /// Seed of the random number generator, for reproducible batches
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file to write the puzzles to, instead of the standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Accept puzzles whose solution is a symmetric copy of a previous one
    #[arg(long, default_value_t = false)]
    allow_twins: bool,

    /// Prune the adjacencies in order instead of in random order
    #[arg(long, default_value_t = false)]
    scan_order: bool,

    /// Print some statistics after generating the puzzles
    #[arg(short, long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Validate the dropout fraction.
fn parse_dropout(s: &str) -> Result<f64, String> {
    let dropout: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=1.0).contains(&dropout) {
        return Err(format!("{dropout} is not between 0.0 and 1.0"));
    }
    Ok(dropout)
}

/// Build the generation settings from the command-line options.
fn settings(args: &Args) -> Settings {
    Settings {
        dropout: args.dropout.unwrap_or(args.difficulty.dropout()),
        seed: args.seed,
        allow_twins: args.allow_twins,
        scan_order: args.scan_order,
        ..Settings::default()
    }
}

/// Write the puzzles to the output file or to the standard output.
fn save(output: Option<PathBuf>, puzzles: &[EncodedPuzzle]) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => SaverPuzzles::new(path).save_puzzles(puzzles),
        None => write_puzzles(io::stdout().lock(), puzzles),
    }
}

/// Parse and process command-line options. Return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        println!("DEBUG");
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let mut batch: PuzzleBatch<ImpostoriRule> = PuzzleBatch::new(settings(&args), ImpostoriRule);
    let mut progress: ProgressReporter = ProgressReporter::default();
    let max_failures: usize = args.count.max(1).saturating_mul(MAX_FAILURES_PER_PUZZLE);

    let mut encoded: Vec<EncodedPuzzle> = Vec::with_capacity(args.count);
    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    let mut dropout: f64 = 0.0;
    let mut incomplete: usize = 0;
    let mut errors: usize = 0;
    while encoded.len() < args.count {
        debug!("Puzzle {}", encoded.len());
        let start: Instant = Instant::now();
        match batch.generate(&mut progress) {
            Ok(puzzle) => {
                let duration: f32 = start.elapsed().as_secs_f32();
                total += duration;
                if duration > max {
                    max = duration;
                }
                dropout += puzzle.dropout;
                if !puzzle.complete {
                    incomplete += 1;
                }
                encoded.push(EncodedPuzzle::new(&puzzle));
            }
            Err(e) => {
                errors += 1;
                debug!("ERROR generating puzzle: {e}");
                if errors >= max_failures {
                    eprintln!("Giving up after {errors} failed generations");
                    break;
                }
            }
        }
    }

    if let Err(e) = save(args.output, &encoded) {
        eprintln!("Cannot write the puzzles: {e}");
        return 1;
    }

    // Print some stats
    if args.summary {
        let n: usize = encoded.len().max(1);
        println!(
            "
        total time = {}s
      average time = {}s
          max time = {}s
   average dropout = {:.2}
 incomplete prunes = {}
        duplicates = {}
            errors = {}",
            total,
            total / n as f32,
            max,
            dropout / n as f64,
            incomplete,
            batch.duplicates,
            errors
        );
    }

    if encoded.len() < args.count { 1 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropout_must_be_a_fraction() {
        assert_eq!(parse_dropout("0.25"), Ok(0.25));
        assert!(parse_dropout("1.5").is_err());
        assert!(parse_dropout("lots").is_err());
    }

    #[test]
    fn options_become_settings() {
        let args: Args =
            Args::parse_from(["impostori", "-f", "hard", "--seed", "3", "--allow-twins"]);
        let s: Settings = settings(&args);
        assert_eq!(s.dropout, 0.7);
        assert_eq!(s.seed, Some(3));
        assert!(s.allow_twins);
        assert!(!s.scan_order);

        let args: Args = Args::parse_from(["impostori", "-f", "hard", "-r", "0.1"]);
        assert_eq!(settings(&args).dropout, 0.1);
    }
}
