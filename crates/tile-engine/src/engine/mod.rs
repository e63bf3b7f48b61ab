//! Engine module: square tile grid, direction-generic moves and the
//! random tile spawner. Public API stays small and value-oriented.
//!
//! - `Grid` is the N×N state with useful methods.
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//! - Every direction reduces to `move_left` via `reverse`/`transpose`.

mod ops;
mod spawn;
pub mod state;

pub use state::{Direction, GameStatus, Grid, MoveResult, Score, Tile};

pub use ops::{
    WIN_TILE, compress, legal_moves, make_move, merge, move_left, new_game, reverse, score, shift,
    status, status_with_target, transpose,
};
pub use spawn::{Spawned, spawn_tile};
