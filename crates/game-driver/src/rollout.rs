use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;
use tile_engine::{Direction, EngineError, GameStatus, Grid, Score, Tile};

use crate::config::{Config, GameSettings};
use crate::env::{GameEnv, Step};
use crate::policy::Policy;

/// Summary for a completed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub game_id: u32,
    pub seed: u64,
    pub steps: u64,
    pub score: Score,
    pub highest_tile: Tile,
    pub status: GameStatus,
}

/// Aggregate over a batch of independent games, ordered by game id.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub games: Vec<GameSummary>,
    pub wins: usize,
    pub losses: usize,
    pub mean_score: f64,
    pub best_score: Score,
    pub best_tile: Tile,
}

impl BatchSummary {
    pub fn from_games(games: Vec<GameSummary>) -> Self {
        let wins = games.iter().filter(|g| g.status == GameStatus::Win).count();
        let losses = games.iter().filter(|g| g.status == GameStatus::Lose).count();
        let total: Score = games.iter().map(|g| g.score).sum();
        let mean_score = if games.is_empty() { 0.0 } else { total as f64 / games.len() as f64 };
        let best_score = games.iter().map(|g| g.score).max().unwrap_or(0);
        let best_tile = games.iter().map(|g| g.highest_tile).max().unwrap_or(0);
        BatchSummary { games, wins, losses, mean_score, best_score, best_tile }
    }
}

/// Play one game to completion (or `max_steps`) with `policy`.
///
/// `observer` sees every applied direction together with the step result and
/// the grid after it, which is how the CLI renders a watched game.
pub fn play_game<F>(
    game_id: u32,
    seed: u64,
    game: &GameSettings,
    policy: &mut dyn Policy,
    max_steps: Option<u64>,
    mut observer: F,
) -> Result<GameSummary, EngineError>
where
    F: FnMut(Direction, &Step, &Grid),
{
    let mut env = GameEnv::seeded(game.size, game.win_tile, seed)?;
    let limit = max_steps.unwrap_or(u64::MAX);
    let mut done = env.status().is_over();
    while !done && env.steps() < limit {
        let Some(dir) = policy.choose(env.grid()) else {
            break;
        };
        let step = env.step_direction(dir);
        observer(dir, &step, env.grid());
        done = step.done;
    }
    Ok(GameSummary {
        game_id,
        seed,
        steps: env.steps(),
        score: env.score(),
        highest_tile: env.grid().highest_tile(),
        status: env.status(),
    })
}

/// Play `cfg.auto.games` independent games in parallel.
///
/// Game `i` uses seed `base_seed + i` for both its grid and its policy, so a
/// batch is reproducible regardless of how rayon schedules it.
pub fn run_batch(cfg: &Config, base_seed: u64) -> Result<BatchSummary> {
    let games = cfg.auto.games;
    info!(
        "Playing {} game(s) with the {:?} policy on a {}x{} grid",
        games, cfg.auto.policy, cfg.game.size, cfg.game.size
    );
    let pb = default_progress_bar(games as u64)?;

    let process = || -> Result<Vec<GameSummary>> {
        (0..games)
            .into_par_iter()
            .map(|game_id| {
                let seed = base_seed.wrapping_add(game_id as u64);
                let mut policy = cfg.auto.policy.build(seed);
                let summary = play_game(
                    game_id,
                    seed,
                    &cfg.game,
                    policy.as_mut(),
                    cfg.auto.max_steps,
                    |_, _, _| {},
                )?;
                debug!(
                    "game {} (seed {}): {} steps, score {}, highest tile {}, {}",
                    summary.game_id,
                    summary.seed,
                    summary.steps,
                    summary.score,
                    summary.highest_tile,
                    summary.status
                );
                pb.inc(1);
                Ok(summary)
            })
            .collect()
    };

    let mut results = if let Some(n) = cfg.auto.workers {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("failed to build rayon thread pool")?
            .install(process)?
    } else {
        process()?
    };

    pb.finish_with_message("games played");
    results.sort_by_key(|g| g.game_id);

    let summary = BatchSummary::from_games(results);
    info!(
        "Completed {} game(s): {} win(s), {} loss(es), mean score {:.1}, best score {}, best tile {}",
        summary.games.len(),
        summary.wins,
        summary.losses,
        summary.mean_score,
        summary.best_score,
        summary.best_tile
    );
    Ok(summary)
}

fn default_progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {wide_bar} {pos}/{len}")
            .context("invalid progress bar template")?
            .progress_chars("=> "),
    );
    Ok(pb)
}
