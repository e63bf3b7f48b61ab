//! Driver shells around `tile-engine`.
//!
//! - `config`: TOML settings for grid size, winning tile, seeds and automated play
//! - `env`: step/reset environment that maps action indices to engine moves
//! - `policy`: move-selection policies used for automated play
//! - `interactive`: line-oriented keyboard loop
//! - `rollout`: single watched games and parallel batches of policy games

pub mod config;
pub mod env;
pub mod interactive;
pub mod policy;
pub mod rollout;
