extern crate paperbot;

use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use paperbot::{
    error::ProtocolError,
    protocol::{Command, Message},
    strategy::Strategy,
    world::{GameConfig, World},
};

#[derive(Parser, Debug)]
#[command(name = "paperbot")]
#[command(about = "Territory capture bot speaking the line-delimited JSON protocol")]
struct Cli {
    /// Seed for tie-breaks and random fallback moves
    #[arg(long)]
    seed: Option<u64>,
    /// Log filter, e.g. `debug` or `paperbot=trace` (defaults to RUST_LOG, then `info`)
    #[arg(long)]
    log: Option<String>,
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn emit(out: &mut impl Write, command: &Command) -> Result<()> {
    let line = command.to_line().context("encoding command")?;
    writeln!(out, "{line}").context("writing command")?;
    out.flush().context("flushing stdout")?;
    Ok(())
}

fn blind_command(
    strategy: &mut Strategy,
    last_world: Option<&World>,
    err: &ProtocolError,
) -> Command {
    let decision = strategy.play_blind(last_world);
    Command {
        command: decision.direction,
        debug: format!("{} bad tick: {err}", decision.tier),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    let mut strategy = match cli.seed {
        Some(seed) => Strategy::with_seed(seed),
        None => Strategy::new(),
    };
    let mut config: Option<GameConfig> = None;
    let mut last_world: Option<World> = None;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // game loop
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let message = match Message::parse(&line) {
            Ok(message) => message,
            Err(err) => {
                warn!(%err, "skipping input line");
                if err.message_type() == Some("tick") {
                    let command = blind_command(&mut strategy, last_world.as_ref(), &err);
                    emit(&mut out, &command)?;
                }
                continue;
            }
        };

        match message {
            Message::StartGame(params) => {
                info!(?params, "game started");
                config = Some(params);
                last_world = None;
            }
            Message::Tick(params) => {
                let start = Instant::now();

                let world = config
                    .as_ref()
                    .ok_or(ProtocolError::NotStarted)
                    .and_then(|config| params.to_world(config));

                let command = match world {
                    Ok(world) => {
                        let decision = strategy.play(&world);
                        let elapsed = start.elapsed();
                        info!(
                            tick = world.tick_num,
                            tier = %decision.tier,
                            elapsed_ms = elapsed.as_secs_f64() * 1000.,
                            "tick done"
                        );
                        last_world = Some(world);
                        Command {
                            command: decision.direction,
                            debug: format!("{} {:.2}ms", decision.tier, elapsed.as_secs_f64() * 1000.),
                        }
                    }
                    Err(err) => {
                        warn!(%err, "cannot build snapshot");
                        blind_command(&mut strategy, last_world.as_ref(), &err)
                    }
                };

                emit(&mut out, &command)?;
            }
            Message::EndGame => {
                info!("game over");
                break;
            }
        }
    }

    Ok(())
}
