use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tile_engine::{Direction, Grid};

/// Chooses the next direction for a grid.
///
/// Returns `None` if no direction changes the grid.
///
/// Object-safe so it can be used as `Box<dyn Policy>`.
pub trait Policy {
    fn choose(&mut self, grid: &Grid) -> Option<Direction>;
}

/// Uniform choice among legal moves.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Policy for RandomPolicy {
    fn choose(&mut self, grid: &Grid) -> Option<Direction> {
        grid.legal_moves().choose(&mut self.rng).copied()
    }
}

/// One-ply lookahead: prefer the move leaving the most empty cells, then the
/// highest tile. Ties go to the earlier direction in action order.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn choose(&mut self, grid: &Grid) -> Option<Direction> {
        let mut best: Option<(Direction, (usize, u32))> = None;
        for dir in grid.legal_moves() {
            let after = grid.shift(dir).grid;
            let key = (after.count_empty(), after.highest_tile());
            if best.is_none_or(|(_, k)| key > k) {
                best = Some((dir, key));
            }
        }
        best.map(|(dir, _)| dir)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Random,
    #[default]
    Greedy,
}

impl PolicyKind {
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Greedy => Box::new(GreedyPolicy),
        }
    }
}
