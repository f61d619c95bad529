#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Delve session in the terminal.

mod config;
mod game;
mod input;

use std::{
    fs::{self, File},
    io::{self, BufRead, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use delve_catalogue::LevelCatalogue;
use delve_ledger::{JournalSink, LedgerClient};
use delve_rendering::TextBackend;
use delve_world::{query, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    game::{Flow, Game},
};

/// Grid dungeon crawler: collect treasures and reach the final portal.
#[derive(Parser, Debug)]
#[command(name = "delve", version)]
struct Args {
    /// Configuration file (defaults to ./delve.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level document replacing the built-in catalogue
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Seed for chest rewards
    #[arg(long)]
    seed: Option<u64>,

    /// JSON-lines file receiving ledger entries
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Publish the level catalogue to the ledger before playing
    #[arg(long)]
    upload: bool,

    /// Keys to play non-interactively, e.g. "ddss e q"
    #[arg(long)]
    script: Option<String>,

    /// Log filter overriding RUST_LOG, e.g. "debug"
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref());

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.session.seed = seed;
    }
    if args.levels.is_some() {
        config.session.levels = args.levels.clone();
    }
    if args.journal.is_some() {
        config.ledger.journal = args.journal.clone();
    }

    let catalogue = load_catalogue(config.session.levels.as_deref())?;
    info!(
        levels = catalogue.len(),
        seed = config.session.seed,
        "session starting"
    );

    let session = Session::new(catalogue, config.session.seed);
    let ledger = LedgerClient::new(JournalSink::new(open_journal(
        config.ledger.journal.as_deref(),
    )?));
    let backend = TextBackend::new(io::stdout());
    let mut game = Game::new(session, backend, ledger);

    if args.upload {
        let catalogue = query::catalogue(game.session()).clone();
        let plan = game
            .ledger_mut()
            .upload(&catalogue, config.ledger.upload_batch_size)
            .context("failed to upload level catalogue")?;
        info!(batches = plan.batch_count(), "level catalogue uploaded");
    }

    game.present()?;
    match args.script {
        Some(script) => {
            let _ = game.handle_line(&script)?;
        }
        None => {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = line.context("failed to read input")?;
                if game.handle_line(&line)? == Flow::Quit {
                    break;
                }
            }
        }
    }

    let state = query::state(game.session());
    info!(
        level = state.current_level,
        steps = state.steps,
        score = state.score(),
        won = state.game_won,
        "session finished"
    );
    Ok(())
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn load_catalogue(path: Option<&Path>) -> Result<LevelCatalogue> {
    match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read level document {}", path.display()))?;
            LevelCatalogue::from_json(&contents)
                .with_context(|| format!("invalid level document {}", path.display()))
        }
        None => LevelCatalogue::builtin().context("built-in level catalogue is invalid"),
    }
}

fn open_journal(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create ledger journal {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::sink())),
    }
}
