//! Headless player: runs seeded games with the hint engine as its policy and
//! prints a JSON summary.

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use serde::Serialize;
use std::path::PathBuf;
use sumfun_core::{GameConfig, GameSession};
use sumfun_driver::{GameReport, HighScores, autoplay, record_finished};

#[derive(Debug, Parser)]
#[command(about = "Play Sum Fun games headlessly using hints as the policy")]
struct Args {
    /// TOML file holding a game configuration; the standard preset otherwise.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of games to play.
    #[arg(long, default_value_t = 10)]
    games: u32,

    /// Seed of the first game, later games use consecutive seeds.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Force the countdown on.
    #[arg(long)]
    timed: bool,

    /// Clock ticks delivered before every move, to model thinking time.
    #[arg(long, default_value_t = 0)]
    ticks_per_move: u32,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

#[derive(Debug, Serialize)]
struct Summary {
    config: GameConfig,
    games: Vec<GameReport>,
    mean_score: f64,
    high_scores: HighScores,
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => GameConfig::standard(),
    };
    if args.timed {
        config.timed_game = true;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    let config = load_config(&args)?;
    let mut high_scores = HighScores::default();
    let mut games = Vec::with_capacity(args.games as usize);

    for offset in 0..u64::from(args.games) {
        let seed = args.seed.wrapping_add(offset);
        let report = autoplay(
            GameSession::with_seed(config, seed)?,
            seed,
            args.ticks_per_move,
        )?;
        record_finished(&mut high_scores, &report);
        games.push(report);
    }

    let mean_score = if games.is_empty() {
        0.0
    } else {
        games.iter().map(|g| f64::from(g.score)).sum::<f64>() / games.len() as f64
    };

    let summary = Summary {
        config,
        games,
        mean_score,
        high_scores,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
