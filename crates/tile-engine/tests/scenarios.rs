use rand::{SeedableRng, rngs::StdRng};
use tile_engine::{Direction, EngineError, GameStatus, Grid, new_game, spawn_tile, status};

fn single_row(row: [u32; 4]) -> Grid {
    Grid::from_rows(&[row, [0; 4], [0; 4], [0; 4]]).unwrap()
}

#[test]
fn pair_merges_into_leftmost_cell() {
    let res = single_row([2, 2, 0, 0]).shift(Direction::Left);
    assert!(res.moved);
    assert_eq!(res.grid.to_rows()[0], vec![4, 0, 0, 0]);
}

#[test]
fn three_equal_tiles_merge_only_once() {
    let res = single_row([2, 0, 2, 2]).shift(Direction::Left);
    assert!(res.moved);
    assert_eq!(res.grid.to_rows()[0], vec![4, 2, 0, 0]);
}

#[test]
fn packed_distinct_row_does_not_move() {
    let g = single_row([2, 4, 8, 16]);
    let res = g.shift(Direction::Left);
    assert!(!res.moved);
    assert_eq!(res.grid, g);
}

#[test]
fn checkerboard_is_lost() {
    let g = Grid::from_rows(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
    assert_eq!(status(&g), GameStatus::Lose);
    assert!(status(&g).is_over());
}

#[test]
fn every_direction_uses_the_same_merge_rule() {
    let g = Grid::from_rows(&[[2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0]]).unwrap();
    assert_eq!(g.shift(Direction::Up).grid.to_rows(), vec![
        vec![4, 0, 0, 0],
        vec![2, 0, 0, 0],
        vec![0, 0, 0, 0],
        vec![0, 0, 0, 0],
    ]);
    assert_eq!(g.shift(Direction::Down).grid.to_rows(), vec![
        vec![0, 0, 0, 0],
        vec![0, 0, 0, 0],
        vec![2, 0, 0, 0],
        vec![4, 0, 0, 0],
    ]);
    let row = single_row([0, 2, 2, 2]).shift(Direction::Right);
    assert_eq!(row.grid.to_rows()[0], vec![0, 0, 2, 4]);
}

#[test]
fn larger_grids_are_supported() {
    let mut rng = StdRng::seed_from_u64(5);
    let g = new_game(6, &mut rng).unwrap();
    assert_eq!(g.size(), 6);
    assert_eq!(g.count_empty(), 34);
    assert!(matches!(new_game(0, &mut rng), Err(EngineError::InvalidSize { size: 0 })));
}

#[test]
fn sessions_can_move_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Grid>();

    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            std::thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut g = Grid::empty(4).unwrap();
                spawn_tile(&mut g, &mut rng);
                g
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap().count_empty(), 15);
    }
}
