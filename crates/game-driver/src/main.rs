use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use game_driver::config::Config;
use game_driver::policy::PolicyKind;
use game_driver::{interactive, rollout};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Parser)]
#[command(author, version, about = "Play 2048 in the terminal or watch a policy play it")]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// Base RNG seed (overrides game.seed)
    #[arg(long, global = true, value_name = "N")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play with the keyboard: type a key and press enter
    Play,
    /// Let a policy play one watched game or a batch of games
    Auto {
        /// Number of games (more than one runs a parallel batch)
        #[arg(long, value_name = "N")]
        games: Option<u32>,

        #[arg(long, value_enum)]
        policy: Option<PolicyKind>,

        /// Number of worker threads (defaults to Rayon default)
        #[arg(long, value_name = "N")]
        workers: Option<usize>,

        /// Stop each game after this many steps
        #[arg(long, value_name = "N")]
        max_steps: Option<u64>,

        /// Do not print frames for a single game
        #[arg(long)]
        no_render: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref())?;
    let seed = cli.seed.or(cfg.game.seed).unwrap_or_else(rand::random);
    info!("Base seed: {seed}");

    match cli.command {
        Command::Play => {
            let mut rng = StdRng::seed_from_u64(seed);
            let stdin = io::stdin();
            let summary = interactive::run(
                stdin.lock(),
                io::stdout().lock(),
                cfg.game.size,
                cfg.game.win_tile,
                &mut rng,
            )?;
            info!(
                "Session ended after {} moves: score {}, highest tile {}, {}",
                summary.moves, summary.score, summary.highest_tile, summary.status
            );
        }
        Command::Auto { games, policy, workers, max_steps, no_render } => {
            if let Some(n) = games {
                cfg.auto.games = n;
            }
            if let Some(p) = policy {
                cfg.auto.policy = p;
            }
            if workers.is_some() {
                cfg.auto.workers = workers;
            }
            if max_steps.is_some() {
                cfg.auto.max_steps = max_steps;
            }
            if no_render {
                cfg.auto.render = false;
            }
            cfg.validate()?;

            if cfg.auto.games == 1 {
                watch_game(&cfg, seed)?;
            } else {
                let summary = rollout::run_batch(&cfg, seed)?;
                println!(
                    "games: {}  wins: {}  losses: {}  mean score: {:.1}  best score: {}  best tile: {}",
                    summary.games.len(),
                    summary.wins,
                    summary.losses,
                    summary.mean_score,
                    summary.best_score,
                    summary.best_tile
                );
            }
        }
    }
    Ok(())
}

/// Play a single policy game, printing each frame with a delay.
fn watch_game(cfg: &Config, seed: u64) -> Result<()> {
    let mut policy = cfg.auto.policy.build(seed);
    let delay = Duration::from_millis(cfg.auto.frame_delay_ms);
    let render = cfg.auto.render;
    let mut stdout = io::stdout().lock();
    let mut write_err: Option<io::Error> = None;

    let summary = rollout::play_game(
        0,
        seed,
        &cfg.game,
        policy.as_mut(),
        cfg.auto.max_steps,
        |dir, step, grid| {
            if !render || write_err.is_some() {
                return;
            }
            let frame = writeln!(stdout, "Predicted action: {dir}")
                .and_then(|_| write!(stdout, "{grid}"))
                .and_then(|_| writeln!(stdout, "SCORE: {} (+{})", grid.score(), step.reward))
                .and_then(|_| stdout.flush());
            match frame {
                Ok(()) => thread::sleep(delay),
                Err(e) => write_err = Some(e),
            }
        },
    )?;
    if let Some(e) = write_err {
        return Err(e.into());
    }

    println!("Game Over! Final Score: {} ({})", summary.score, summary.status);
    info!(
        "{} steps, highest tile {}",
        summary.steps, summary.highest_tile
    );
    Ok(())
}
