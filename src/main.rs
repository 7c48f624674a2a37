// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Run a command file against a fresh rectangle database.
//!
//! Usage: skipdb <command-file> [--seed <u64>] [--bits <1,0,...>]
//!
//! Reports go to stdout. Logs go to stderr, filtered by `RUST_LOG`.

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::process::ExitCode;

use anyhow::Context;
use log::info;

use skipdb::command::Processor;
use skipdb::config::Config;
use skipdb::db::Database;

fn run(config: &Config) -> anyhow::Result<()> {
    let file = File::open(&config.input)
        .with_context(|| format!("Invalid file: {}", config.input.display()))?;
    info!("running {} with {:?} levels", config.input.display(), config.bits);

    let db = Database::with_bits(config.bit_source());
    let stdout = BufWriter::new(io::stdout().lock());
    let mut processor = Processor::new(db, stdout);
    processor
        .run(BufReader::new(file))
        .with_context(|| format!("failed while running {}", config.input.display()))?;

    info!("done, {} rectangles stored", processor.database().len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            println!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
