use rand::Rng;
use std::fmt;
use std::str::FromStr;

use super::{ops, spawn};
use crate::error::EngineError;

/// A single cell value: 0 for empty, otherwise a power of two >= 2.
pub type Tile = u32;
/// Sum of all tile values on a grid.
pub type Score = u64;

/// A direction to slide/merge tiles.
///
/// The discriminant order matches the action indices used by policy
/// drivers: 0 = up, 1 = down, 2 = left, 3 = right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in action-index order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Map a discrete action index to a direction.
    ///
    /// ```
    /// use tile_engine::Direction;
    /// assert_eq!(Direction::from_action(2).unwrap(), Direction::Left);
    /// assert!(Direction::from_action(4).is_err());
    /// ```
    pub fn from_action(index: usize) -> Result<Self, EngineError> {
        Direction::ALL
            .get(index)
            .copied()
            .ok_or(EngineError::InvalidAction(index))
    }

    /// Inverse of [`Direction::from_action`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl TryFrom<usize> for Direction {
    type Error = EngineError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Direction::from_action(index)
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal classification of a grid, derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    NotOver,
    Win,
    Lose,
}

impl GameStatus {
    /// True for `Win` and `Lose`.
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::NotOver
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameStatus::NotOver => "not over",
            GameStatus::Win => "win",
            GameStatus::Lose => "lose",
        })
    }
}

/// Outcome of sliding a grid in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// The grid after the move.
    pub grid: Grid,
    /// True iff at least one cell differs from the input grid.
    pub moved: bool,
    /// True iff at least one pair of tiles was combined. Implies `moved`.
    pub merged: bool,
}

impl MoveResult {
    /// Score gained relative to `before`.
    ///
    /// Sliding and merging preserve the tile sum, so this is the value of the
    /// spawned tile after `make_move`, and 0 after a plain `shift`.
    pub fn score_delta(&self, before: &Grid) -> Score {
        self.grid.score().saturating_sub(before.score())
    }

    pub(crate) fn map_grid(self, f: impl FnOnce(&Grid) -> Grid) -> Self {
        MoveResult {
            grid: f(&self.grid),
            ..self
        }
    }
}

/// Square N×N grid of tiles stored row-major.
///
/// Dimensions are fixed at construction. Constructors validate that every
/// cell is 0 or a power of two >= 2, so all public operations may assume a
/// well-formed grid.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// An `n×n` grid of empty cells.
    ///
    /// ```
    /// use tile_engine::Grid;
    /// let g = Grid::empty(4).unwrap();
    /// assert_eq!(g.count_empty(), 16);
    /// assert!(Grid::empty(1).is_err());
    /// ```
    pub fn empty(size: usize) -> Result<Self, EngineError> {
        if size < 2 {
            return Err(EngineError::InvalidSize { size });
        }
        Ok(Grid {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Build a grid from explicit rows, validating shape and tile values.
    ///
    /// ```
    /// use tile_engine::Grid;
    /// let g = Grid::from_rows(&[[2, 0], [0, 4]]).unwrap();
    /// assert_eq!(g.get(1, 1), Some(4));
    /// assert!(Grid::from_rows(&[[3, 0], [0, 0]]).is_err());
    /// ```
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self, EngineError> {
        let size = rows.len();
        if size < 2 {
            return Err(EngineError::InvalidSize { size });
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(EngineError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(EngineError::InvalidTile { row, col, value });
                }
                cells.push(value);
            }
        }
        Ok(Grid { size, cells })
    }

    /// Internal constructor for cells produced by engine primitives.
    pub(crate) fn from_parts(size: usize, cells: Vec<Tile>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Grid { size, cells }
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at (`row`, `col`), or `None` when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        if row < self.size && col < self.size {
            Some(self.cells[row * self.size + col])
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: Tile) {
        self.cells[row * self.size + col] = value;
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, Tile> {
        self.cells.chunks_exact(self.size)
    }

    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, Tile> {
        self.cells.chunks_exact_mut(self.size)
    }

    /// Copy the grid out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.rows().map(<[Tile]>::to_vec).collect()
    }

    /// Tile exponents in row-major order: 0 for empty, 1 for 2, 2 for 4, etc.
    pub fn to_exponents(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|&v| if v == 0 { 0 } else { v.trailing_zeros() as u8 })
            .collect()
    }

    /// Count the number of empty cells.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// Coordinates of empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(idx, _)| (idx / self.size, idx % self.size))
            .collect()
    }

    /// Highest tile value on the grid (0 for an empty grid).
    pub fn highest_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Return the grid resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use tile_engine::{Direction, Grid};
    /// let g = Grid::from_rows(&[[2, 2], [0, 0]]).unwrap();
    /// let r = g.shift(Direction::Left);
    /// assert!(r.moved);
    /// assert_eq!(r.grid.to_rows(), vec![vec![4, 0], vec![0, 0]]);
    /// ```
    #[inline]
    pub fn shift(&self, dir: Direction) -> MoveResult {
        ops::shift(self, dir)
    }

    /// Perform a move, then insert a random tile if the move changed the grid.
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(&self, dir: Direction, rng: &mut R) -> MoveResult {
        ops::make_move(self, dir, rng)
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty cell, using the provided RNG.
    ///
    /// A full grid is returned unchanged.
    pub fn with_random_tile<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        spawn::spawn_tile(&mut self, rng);
        self
    }

    /// Sum of all tile values.
    #[inline]
    pub fn score(&self) -> Score {
        ops::score(self)
    }

    /// Game status against the standard 2048 winning tile.
    #[inline]
    pub fn status(&self) -> GameStatus {
        ops::status(self)
    }

    /// Directions that would change this grid, in action-index order.
    #[inline]
    pub fn legal_moves(&self) -> Vec<Direction> {
        ops::legal_moves(self)
    }
}

fn is_valid_tile(value: Tile) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.to_rows())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divider = "-".repeat(self.size * 8);
        writeln!(f)?;
        for (idx, row) in self.rows().enumerate() {
            if idx > 0 {
                writeln!(f, "{divider}")?;
            }
            let line: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: Tile) -> String {
    match val {
        0 => String::from("       "),
        x => {
            let mut x = x.to_string();
            while x.len() < 7 {
                match x.len() {
                    6 => x = format!(" {}", x),
                    _ => x = format!(" {} ", x),
                }
            }
            x
        }
    }
}
