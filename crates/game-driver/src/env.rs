//! Step/reset environment for policy-driven play.
//!
//! Actions are the discrete indices 0 = up, 1 = down, 2 = left, 3 = right.
//! Each step slides the grid, spawns a tile only if something moved, and
//! reports the score gained as the reward. The episode is done as soon as
//! the grid is won or lost.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;
use tile_engine::{
    Direction, EngineError, GameStatus, Grid, Score, Tile, spawn_tile, status_with_target,
};

/// Snapshot of the grid handed to a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub size: usize,
    /// Raw tile values, row-major.
    pub values: Vec<Tile>,
    /// log2 of each tile (0 for empty), row-major.
    pub exponents: Vec<u8>,
}

impl Observation {
    fn of(grid: &Grid) -> Self {
        Observation {
            size: grid.size(),
            values: grid.cells().to_vec(),
            exponents: grid.to_exponents(),
        }
    }
}

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub observation: Observation,
    pub reward: Score,
    pub done: bool,
    pub moved: bool,
    pub status: GameStatus,
}

/// Single-game environment owning its grid and RNG.
pub struct GameEnv<R: Rng = StdRng> {
    blank: Grid,
    grid: Grid,
    win_tile: Tile,
    rng: R,
    steps: u64,
}

impl GameEnv<StdRng> {
    /// Environment with a `StdRng` seeded from `seed`.
    pub fn seeded(size: usize, win_tile: Tile, seed: u64) -> Result<Self, EngineError> {
        Self::new(size, win_tile, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEnv<R> {
    /// Create an environment and start its first game.
    pub fn new(size: usize, win_tile: Tile, rng: R) -> Result<Self, EngineError> {
        let blank = Grid::empty(size)?;
        let mut env = GameEnv { grid: blank.clone(), blank, win_tile, rng, steps: 0 };
        env.reset();
        Ok(env)
    }

    /// Start a fresh game with two random tiles.
    pub fn reset(&mut self) -> Observation {
        let mut grid = self.blank.clone();
        spawn_tile(&mut grid, &mut self.rng);
        spawn_tile(&mut grid, &mut self.rng);
        self.grid = grid;
        self.steps = 0;
        self.observation()
    }

    /// Apply the action with index `action`.
    ///
    /// Indices outside 0..=3 are rejected without touching the game.
    pub fn step(&mut self, action: usize) -> Result<Step, EngineError> {
        let dir = Direction::from_action(action)?;
        Ok(self.step_direction(dir))
    }

    pub fn step_direction(&mut self, dir: Direction) -> Step {
        let result = self.grid.make_move(dir, &mut self.rng);
        let reward = result.score_delta(&self.grid);
        self.grid = result.grid;
        self.steps += 1;
        let status = self.status();
        Step {
            observation: self.observation(),
            reward,
            done: status.is_over(),
            moved: result.moved,
            status,
        }
    }

    /// Which actions would change the grid, indexed like `step`.
    pub fn action_mask(&self) -> [bool; 4] {
        let mut mask = [false; 4];
        for dir in self.grid.legal_moves() {
            mask[dir.index()] = true;
        }
        mask
    }

    pub fn observation(&self) -> Observation {
        Observation::of(&self.grid)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> Score {
        self.grid.score()
    }

    pub fn status(&self) -> GameStatus {
        status_with_target(&self.grid, self.win_tile)
    }

    /// Number of steps taken since the last reset, including non-moving ones.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Console rendering: the grid followed by the score.
    pub fn render(&self) -> String {
        format!("{}SCORE: {}", self.grid, self.score())
    }
}
