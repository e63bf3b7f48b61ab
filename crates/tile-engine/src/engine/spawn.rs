use rand::Rng;

use super::state::{Grid, Tile};

/// Where the spawner put a tile, and which value it chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawned {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

/// Insert a random 2 (90%) or 4 (10%) tile into a uniformly chosen empty cell.
///
/// This is the only engine operation that mutates a grid in place. A full
/// grid is left untouched and `None` is returned; callers that need a spawn
/// to happen should check `count_empty` or the game status first.
///
/// ```
/// use tile_engine::{Grid, spawn_tile};
/// use rand::{SeedableRng, rngs::StdRng};
/// let mut rng = StdRng::seed_from_u64(123);
/// let mut g = Grid::empty(4).unwrap();
/// let placed = spawn_tile(&mut g, &mut rng).unwrap();
/// assert_eq!(g.get(placed.row, placed.col), Some(placed.value));
/// assert_eq!(g.count_empty(), 15);
/// ```
pub fn spawn_tile<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<Spawned> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }
    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let value = generate_random_tile(rng);
    grid.set(row, col, value);
    Some(Spawned { row, col, value })
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}
