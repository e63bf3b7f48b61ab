use thiserror::Error;

use crate::engine::Tile;

/// Contract violations detected at the engine boundary.
///
/// All of these are raised before any grid is touched, so a caller never
/// observes a partially applied transformation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("grid size must be at least 2, got {size}")]
    InvalidSize { size: usize },
    #[error("grid is not square: row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },
    #[error("invalid tile {value} at ({row}, {col}): must be 0 or a power of two >= 2")]
    InvalidTile { row: usize, col: usize, value: Tile },
    #[error("invalid action index {0}: expected 0..=3")]
    InvalidAction(usize),
    #[error("invalid direction '{0}': expected up, down, left or right")]
    InvalidDirection(String),
}
