#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that connects the SubSim agent to a game server.

mod pacing;
mod results;

use std::{
    io::{self, BufReader},
    net::{Shutdown, TcpStream},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{builder::FalseyValueParser, Parser};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use subsim_controller::{NoPacing, Session, TurnPacer};
use subsim_protocol::{GameOutcome, LineChannel};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

use crate::{pacing::ConsolePacer, results::ResultsReport};

/// Plays one SubSim game against a remote server.
#[derive(Debug, Parser)]
#[command(name = "subsim-bot", version)]
struct Args {
    /// Name to join the game with.
    #[arg(default_value = "RustySub")]
    username: String,
    /// Host name or address of the game server.
    #[arg(default_value = "localhost")]
    host: String,
    /// TCP port of the game server.
    #[arg(default_value_t = 9555)]
    port: u16,
    /// Seed for the planner's random choices; drawn from entropy when absent.
    #[arg(long)]
    seed: Option<u64>,
    /// Wait for ENTER before every turn.
    #[arg(long, env = "DEBUG", value_parser = FalseyValueParser::new())]
    step: bool,
    /// Write the final standings to this file as JSON.
    #[arg(long, value_name = "PATH")]
    results: Option<PathBuf>,
}

/// Entry point for the SubSim command-line agent.
fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    info!(
        username = %args.username,
        server = %format!("{}:{}", args.host, args.port),
        "connecting"
    );
    let stream = TcpStream::connect((args.host.as_str(), args.port))
        .with_context(|| format!("failed to connect to {}:{}", args.host, args.port))?;

    let outcome = if args.step {
        let stdin = io::stdin();
        let mut pacer = ConsolePacer::new(stdin.lock(), io::stdout());
        play(&args, &stream, &mut pacer)
    } else {
        play(&args, &stream, &mut NoPacing)
    };

    // Best effort: the peer may already have closed its end.
    let _ = stream.shutdown(Shutdown::Both);
    let outcome = outcome?;

    if let Some(path) = &args.results {
        ResultsReport::new(&args.username, outcome)
            .write_to(path)
            .context("failed to export game results")?;
        info!(path = %path.display(), "wrote game results");
    }
    Ok(())
}

fn play<P: TurnPacer>(args: &Args, stream: &TcpStream, pacer: &mut P) -> Result<GameOutcome> {
    let reader = BufReader::new(stream.try_clone().context("failed to clone stream")?);
    let mut channel = LineChannel::new(reader, stream);

    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut session = Session::new(args.username.as_str(), rng);
    session
        .run(&mut channel, pacer)
        .with_context(|| format!("game session as {} ended in turn {}", args.username, session.turn()))
}
