//! tile-engine: grid transitions for a 2048-style sliding-tile puzzle.
//!
//! This crate provides:
//! - A square `Grid` of tile values with value-semantics transformations
//!   (`shift`, `make_move`, `score`, `status`, ...)
//! - The random tile spawner (`spawn_tile`), driven by a caller-supplied RNG
//! - A small typed error (`EngineError`) for rejecting bad input at the boundary
//!
//! Quick start:
//! ```
//! use tile_engine::{Direction, GameStatus, new_game};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game start with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let g0 = new_game(4, &mut rng).unwrap();
//! assert_eq!(g0.count_empty(), 14);
//!
//! let step = g0.make_move(Direction::Left, &mut rng);
//! assert!(step.grid.score() >= g0.score());
//! assert_eq!(step.grid.status(), GameStatus::NotOver);
//! ```
//!
//! Every transformation returns a new `Grid`; the spawner is the only
//! operation that writes into a grid in place.
pub mod engine;
pub mod error;

pub use engine::{
    Direction, GameStatus, Grid, MoveResult, Score, Spawned, Tile, WIN_TILE, compress,
    legal_moves, make_move, merge, move_left, new_game, reverse, score, shift, spawn_tile, status,
    status_with_target, transpose,
};
pub use error::EngineError;
