use rand::Rng;

use super::spawn::spawn_tile;
use super::state::{Direction, GameStatus, Grid, MoveResult, Score, Tile};
use crate::error::EngineError;

/// The standard winning tile.
pub const WIN_TILE: Tile = 2048;

/// Start a new game: an `n×n` empty grid with two random tiles.
pub fn new_game<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Grid, EngineError> {
    let mut grid = Grid::empty(size)?;
    spawn_tile(&mut grid, rng);
    spawn_tile(&mut grid, rng);
    Ok(grid)
}

/// Slide/merge tiles in the given direction. No randomness.
pub fn shift(grid: &Grid, direction: Direction) -> MoveResult {
    match direction {
        Direction::Left => move_left(grid),
        Direction::Right => move_right(grid),
        Direction::Up => move_left(&transpose(grid)).map_grid(transpose),
        Direction::Down => move_right(&transpose(grid)).map_grid(transpose),
    }
}

/// Perform a move then insert a random tile if the move changed the grid.
pub fn make_move<R: Rng + ?Sized>(grid: &Grid, direction: Direction, rng: &mut R) -> MoveResult {
    let mut result = shift(grid, direction);
    if result.moved {
        spawn_tile(&mut result.grid, rng);
    }
    result
}

/// Compress, merge, and compress again if anything merged.
pub fn move_left(grid: &Grid) -> MoveResult {
    let (compressed, shifted) = compress(grid);
    let (mut out, merged) = merge(&compressed);
    if merged {
        out = compress(&out).0;
    }
    MoveResult {
        grid: out,
        moved: shifted || merged,
        merged,
    }
}

fn move_right(grid: &Grid) -> MoveResult {
    move_left(&reverse(grid)).map_grid(reverse)
}

/// Flip every row end-to-end.
pub fn reverse(grid: &Grid) -> Grid {
    let mut out = grid.clone();
    for row in out.rows_mut() {
        row.reverse();
    }
    out
}

/// Swap rows and columns.
pub fn transpose(grid: &Grid) -> Grid {
    let n = grid.size();
    let src = grid.cells();
    let mut cells = vec![0; n * n];
    for r in 0..n {
        for c in 0..n {
            cells[c * n + r] = src[r * n + c];
        }
    }
    Grid::from_parts(n, cells)
}

/// Slide every non-zero tile to the left of its row, keeping order.
///
/// Returns the new grid and whether any tile changed position.
pub fn compress(grid: &Grid) -> (Grid, bool) {
    let mut out = grid.clone();
    let mut changed = false;
    for row in out.rows_mut() {
        changed |= compress_line(row);
    }
    (out, changed)
}

/// Combine equal left/right neighbours once per pair, scanning left to right.
///
/// The right cell of a merged pair becomes 0, so the doubled cell cannot
/// take part in a second merge during the same pass.
pub fn merge(grid: &Grid) -> (Grid, bool) {
    let mut out = grid.clone();
    let mut changed = false;
    for row in out.rows_mut() {
        changed |= merge_line(row);
    }
    (out, changed)
}

fn compress_line(line: &mut [Tile]) -> bool {
    let mut changed = false;
    let mut position = 0;
    for idx in 0..line.len() {
        let val = line[idx];
        if val == 0 {
            continue;
        }
        if idx != position {
            line[position] = val;
            line[idx] = 0;
            changed = true;
        }
        position += 1;
    }
    changed
}

fn merge_line(line: &mut [Tile]) -> bool {
    let mut changed = false;
    for idx in 0..line.len().saturating_sub(1) {
        if let Some(doubled) = merged_value(line[idx], line[idx + 1]) {
            line[idx] = doubled;
            line[idx + 1] = 0;
            changed = true;
        }
    }
    changed
}

/// The tile produced by combining `a` with `b`, if they can merge.
///
/// Two `2^31` tiles have no representable result and stay apart.
fn merged_value(a: Tile, b: Tile) -> Option<Tile> {
    if a != 0 && a == b { a.checked_mul(2) } else { None }
}

/// Compute the total score: the sum of every tile on the grid.
pub fn score(grid: &Grid) -> Score {
    grid.cells().iter().map(|&v| Score::from(v)).sum()
}

/// Game status against [`WIN_TILE`].
pub fn status(grid: &Grid) -> GameStatus {
    status_with_target(grid, WIN_TILE)
}

/// Game status against a configured winning tile.
///
/// A winning tile beats a full, stuck grid; any empty cell keeps the game
/// going even when no merge is available.
pub fn status_with_target(grid: &Grid, win_tile: Tile) -> GameStatus {
    if grid.cells().contains(&win_tile) {
        GameStatus::Win
    } else if grid.count_empty() > 0 || has_equal_neighbours(grid) {
        GameStatus::NotOver
    } else {
        GameStatus::Lose
    }
}

/// Directions for which `shift` reports a change, in action-index order.
pub fn legal_moves(grid: &Grid) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&dir| shift(grid, dir).moved)
        .collect()
}

fn has_equal_neighbours(grid: &Grid) -> bool {
    let n = grid.size();
    let cells = grid.cells();
    for r in 0..n {
        for c in 0..n {
            let val = cells[r * n + c];
            if r + 1 < n && merged_value(val, cells[(r + 1) * n + c]).is_some() {
                return true;
            }
            if c + 1 < n && merged_value(val, cells[r * n + c + 1]).is_some() {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn grid<const N: usize>(rows: [[Tile; N]; N]) -> Grid {
        Grid::from_rows(&rows).unwrap()
    }

    fn left_line(line: &[Tile]) -> (Vec<Tile>, bool) {
        let mut rows = vec![vec![0; line.len()]; line.len()];
        rows[0] = line.to_vec();
        let res = move_left(&Grid::from_rows(&rows).unwrap());
        (res.grid.to_rows().remove(0), res.moved)
    }

    #[test]
    fn it_compress_line() {
        let mut line = [0, 2, 0, 4];
        assert!(compress_line(&mut line));
        assert_eq!(line, [2, 4, 0, 0]);
        let mut line = [2, 4, 0, 0];
        assert!(!compress_line(&mut line));
        assert_eq!(line, [2, 4, 0, 0]);
        let mut line = [0, 0, 0, 0];
        assert!(!compress_line(&mut line));
    }

    #[test]
    fn it_merge_line() {
        let mut line = [2, 2, 2, 2];
        assert!(merge_line(&mut line));
        assert_eq!(line, [4, 0, 4, 0]);
        let mut line = [4, 4, 8, 0];
        assert!(merge_line(&mut line));
        assert_eq!(line, [8, 0, 8, 0]);
        let mut line = [2, 4, 2, 4];
        assert!(!merge_line(&mut line));
    }

    #[test]
    fn largest_tiles_do_not_overflow() {
        let top = 1 << 31;
        let mut line = [top, top, 0, 0];
        assert!(!merge_line(&mut line));
        assert_eq!(line, [top, top, 0, 0]);
        let mut line = [1 << 30, 1 << 30];
        assert!(merge_line(&mut line));
        assert_eq!(line, [top, 0]);

        let g = grid([[top, top], [0, 0]]);
        let res = shift(&g, Direction::Left);
        assert!(!res.moved);
        assert_eq!(score(&res.grid), score(&g));
        assert_eq!(legal_moves(&g), vec![Direction::Down]);

        let stuck = grid([[top, top], [4, 2]]);
        assert_eq!(status(&stuck), GameStatus::Lose);
        assert!(legal_moves(&stuck).is_empty());
    }

    #[test]
    fn it_shift_line_left() {
        assert_eq!(left_line(&[0, 0, 0, 0]), (vec![0, 0, 0, 0], false));
        assert_eq!(left_line(&[2, 4, 2, 4]), (vec![2, 4, 2, 4], false));
        assert_eq!(left_line(&[2, 2, 4, 4]), (vec![4, 8, 0, 0], true));
        assert_eq!(left_line(&[2, 0, 0, 2]), (vec![4, 0, 0, 0], true));
        assert_eq!(left_line(&[2, 2, 0, 0]), (vec![4, 0, 0, 0], true));
        assert_eq!(left_line(&[2, 0, 2, 2]), (vec![4, 2, 0, 0], true));
        assert_eq!(left_line(&[2, 4, 8, 16]), (vec![2, 4, 8, 16], false));
        assert_eq!(left_line(&[4, 4, 8, 0]), (vec![8, 8, 0, 0], true));
    }

    #[test]
    fn test_move_left() {
        let g = grid([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        let res = shift(&g, Direction::Left);
        assert!(res.moved && res.merged);
        assert_eq!(
            res.grid,
            grid([[2, 4, 8, 16], [2, 16, 4, 0], [8, 0, 0, 0], [2, 4, 0, 0]])
        );
    }

    #[test]
    fn test_move_right() {
        let g = grid([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        let res = shift(&g, Direction::Right);
        assert!(res.moved);
        assert_eq!(
            res.grid,
            grid([[2, 4, 8, 16], [0, 2, 16, 4], [0, 0, 0, 8], [0, 0, 2, 4]])
        );
    }

    #[test]
    fn test_move_up() {
        let g = grid([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        let res = shift(&g, Direction::Up);
        assert!(res.moved);
        assert_eq!(
            res.grid,
            grid([[2, 2, 8, 2], [4, 16, 0, 4], [8, 4, 0, 0], [16, 0, 0, 0]])
        );
    }

    #[test]
    fn test_move_down() {
        let g = grid([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        let res = shift(&g, Direction::Down);
        assert!(res.moved);
        assert_eq!(
            res.grid,
            grid([[2, 0, 0, 0], [4, 2, 0, 0], [8, 16, 0, 2], [16, 4, 8, 4]])
        );
    }

    #[test]
    fn shift_does_not_touch_input() {
        let g = grid([[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let before = g.clone();
        let _ = shift(&g, Direction::Left);
        assert_eq!(g, before);
    }

    #[test]
    fn slide_without_merge_is_not_merged() {
        let g = grid([[0, 2], [0, 0]]);
        let res = shift(&g, Direction::Left);
        assert!(res.moved);
        assert!(!res.merged);
    }

    #[test]
    fn it_score() {
        let g = grid([[2, 4, 0, 0], [0, 0, 0, 0], [0, 0, 2048, 0], [0, 0, 0, 2]]);
        assert_eq!(score(&g), 2056);
        assert_eq!(score(&Grid::empty(4).unwrap()), 0);
    }

    #[test]
    fn status_checkerboard_loses() {
        let g = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(status(&g), GameStatus::Lose);
        assert!(legal_moves(&g).is_empty());
    }

    #[test]
    fn status_win_beats_full_grid() {
        let g = grid([[2048, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(status(&g), GameStatus::Win);
    }

    #[test]
    fn status_empty_cell_is_not_over() {
        let g = grid([[0, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(status(&g), GameStatus::NotOver);
    }

    #[test]
    fn status_full_with_pair_is_not_over() {
        let g = grid([[2, 2, 4, 8], [4, 8, 2, 4], [8, 4, 8, 2], [2, 8, 4, 8]]);
        assert_eq!(status(&g), GameStatus::NotOver);
        let g = grid([[2, 4, 4, 8], [4, 8, 2, 4], [8, 4, 8, 2], [2, 8, 4, 8]]);
        assert_eq!(status(&g), GameStatus::NotOver);
        let g = grid([[2, 4, 8, 16], [2, 8, 16, 32], [4, 16, 32, 64], [8, 32, 64, 128]]);
        assert_eq!(status(&g), GameStatus::NotOver);
    }

    #[test]
    fn status_with_custom_target() {
        let g = grid([[64, 0], [0, 0]]);
        assert_eq!(status_with_target(&g, 64), GameStatus::Win);
        assert_eq!(status(&g), GameStatus::NotOver);
    }

    #[test]
    fn it_legal_moves() {
        let g = grid([[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        assert_eq!(legal_moves(&g), vec![Direction::Down, Direction::Right]);
    }

    #[test]
    fn new_game_has_two_tiles() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = new_game(4, &mut rng).unwrap();
        assert_eq!(g.count_empty(), 14);
        assert!(g.cells().iter().all(|&v| v == 0 || v == 2 || v == 4));
        assert_eq!(new_game(1, &mut rng), Err(EngineError::InvalidSize { size: 1 }));
    }

    #[test]
    fn make_move_spawns_only_when_moved() {
        let mut rng = StdRng::seed_from_u64(3);
        let g = grid([[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let stuck = make_move(&g, Direction::Left, &mut rng);
        assert!(!stuck.moved);
        assert_eq!(stuck.grid, g);
        let moved = make_move(&g, Direction::Right, &mut rng);
        assert!(moved.moved);
        assert_eq!(moved.grid.count_empty(), 14);
        assert_eq!(moved.grid.get(0, 3), Some(2));
        let delta = moved.score_delta(&g);
        assert!(delta == 2 || delta == 4);
    }
}
