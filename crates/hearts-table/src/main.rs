use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{Level, event};

use hearts_core::model::player::{Player, Seat};
use hearts_table::config::TableConfig;
use hearts_table::logging::init_logging;
use hearts_table::{Halt, MatchService};

/// Polls without progress before giving up on a failing deck source.
const MAX_STALLED_POLLS: u32 = 5;

/// Runs a four-bot Hearts match to completion.
#[derive(Debug, Parser)]
#[command(
    name = "hearts-table",
    author,
    version,
    about = "Simulates an all-AI Hearts match"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the match seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the score goal.
    #[arg(long, value_name = "POINTS")]
    goal: Option<u32>,

    /// Four comma-separated strategy ids, North first.
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    strategies: Option<Vec<String>>,

    /// Run every AI turn in a single scheduler call.
    #[arg(long)]
    unbounded: bool,

    /// Write one JSON line per finished game here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Exit after validating the configuration.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => TableConfig::from_path(path)?,
        None => TableConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.dealing.seed = Some(seed);
    }
    if config.dealing.seed.is_none() {
        config.dealing.seed = Some(rand::random());
    }
    if let Some(goal) = cli.goal {
        config.match_defaults.goal = goal;
    }
    if let Some(strategies) = cli.strategies {
        config.ai.strategies = strategies;
    }
    if cli.unbounded {
        config.ai.unbounded = true;
    }
    config.validate()?;

    let seed = config.dealing.seed.unwrap_or_default();
    println!(
        "Match seed {seed}, goal {}, strategies {}",
        config.match_defaults.goal,
        config.ai.strategies.join(",")
    );
    if cli.validate_only {
        println!("Validation-only mode: match skipped.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging)?;

    let service = MatchService::new(
        std::sync::Arc::new(hearts_core::game::deal::LocalShuffle),
        config.retry_policy(),
        config.batch_limit(),
    );
    let players: Vec<Player> = Seat::LOOP
        .iter()
        .zip(&config.ai.strategies)
        .map(|(seat, strategy)| Player::ai(format!("bot-{}", seat.number()), strategy.clone()))
        .collect();
    let mut players = players.into_iter();
    let host = players.next().context("no strategies configured")?;
    let id = service.create_match(host, Seat::North, config.match_settings());
    for player in players {
        service.join_match(id, player)?;
    }

    let mut progress = service.start_match(id, Seat::North)?;
    let mut polls = 0u64;
    let mut stalled = 0u32;
    while !progress.halt.is_final() {
        match &progress.halt {
            Halt::AwaitingDeal => {
                stalled += 1;
                if stalled >= MAX_STALLED_POLLS {
                    bail!("deck source kept failing after {stalled} polls");
                }
            }
            Halt::AwaitingHuman { seats } => bail!("no human is seated but {seats:?} must act"),
            Halt::AwaitingStart | Halt::AwaitingReady => {
                bail!("match is stuck waiting on its seats: {:?}", progress.halt)
            }
            _ => stalled = 0,
        }
        progress = service.poll(id)?;
        polls += 1;
    }
    event!(
        target: "hearts_table::cli",
        Level::INFO,
        match_id = %id,
        polls,
        "match complete"
    );

    let records = service.game_records(id)?;
    let mut out: Box<dyn Write> = match cli.output.as_ref() {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    drop(out);

    let table = service.snapshot(id)?;
    let winners = table.winners();
    println!("Final standings after {} games:", records.len());
    for seat in Seat::LOOP {
        let strategy = table
            .player(seat)
            .and_then(Player::strategy)
            .unwrap_or("?");
        let marker = if winners.contains(&seat) { " *" } else { "" };
        println!(
            "  seat {} {strategy:<16} {:>4}{marker}",
            seat.number(),
            table.scores().score(seat)
        );
    }
    if let Some(path) = cli.output.as_ref() {
        println!("Game records: {}", path.display());
    }

    Ok(())
}
