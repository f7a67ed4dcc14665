//! gammon_bridge -- line protocol front end for the position bridge.
//!
//! Reads commands from stdin and writes responses to stdout. Diagnostics go
//! to stderr through `tracing`, filtered by `RUST_LOG`.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use gammon_bridge::config::{load_config, AnalysisConfig};
use gammon_bridge::engine::ExternalEngine;
use gammon_bridge::protocol::parser::{parse_command, Command};
use gammon_bridge::session::{Session, SessionError};

#[derive(Debug, Parser)]
#[command(name = "gammon_bridge", version, about)]
struct Cli {
    /// Command line of the external engine process.
    #[arg(long)]
    engine: Option<String>,

    /// JSON file with analysis settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of candidate plays to report.
    #[arg(long)]
    max_candidates: Option<usize>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => AnalysisConfig::default(),
    };
    if let Some(n) = cli.max_candidates {
        config.max_candidates = n;
    }

    let mut session = Session::new(config);
    if let Some(line) = cli.engine.as_deref() {
        match ExternalEngine::from_command_line(line) {
            Some(engine) => session.set_engine(Box::new(engine)),
            None => warn!("ignoring empty --engine"),
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        let result = match cmd {
            Command::IsReady => session.handle_isready(&mut out),
            Command::SetOption { name, value } => session.set_option(&name, value.as_deref()),
            Command::Position(spec) => session.set_position(&spec),
            Command::Dice(dice) => session.set_dice(dice),
            Command::Turn(color) => session.set_turn(color),
            Command::Board => session.handle_board(&mut out),
            Command::Notation(steps) => session.handle_notation(&steps, &mut out),
            Command::Candidates => session.handle_candidates(&mut out),
            Command::Filter { json } => session.handle_filter(&json, &mut out),
            Command::Quit => break,
        };

        match result {
            Ok(()) => {}
            Err(SessionError::Io(e)) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
            Err(e) => warn!("{}", e),
        }
    }

    ExitCode::SUCCESS
}
