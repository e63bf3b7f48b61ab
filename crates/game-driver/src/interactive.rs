use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, info};
use rand::Rng;
use tile_engine::{Direction, GameStatus, Grid, Score, Tile, new_game, status_with_target};

const HELP: &str = "keys: w/i/up, s/k/down, a/j/left, d/l/right (arrow keys work too); q or ESC quits";

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Quit,
    /// Blank input.
    Ignore,
    Unknown(String),
}

/// Map a line of keyboard input to a command.
pub fn parse_command(line: &str) -> Command {
    let key = line.trim_end_matches(['\r', '\n']);
    match key {
        "\u{1b}[A" | "\u{1b}OA" => return Command::Move(Direction::Up),
        "\u{1b}[B" | "\u{1b}OB" => return Command::Move(Direction::Down),
        "\u{1b}[D" | "\u{1b}OD" => return Command::Move(Direction::Left),
        "\u{1b}[C" | "\u{1b}OC" => return Command::Move(Direction::Right),
        "\u{1b}" => return Command::Quit,
        _ => {}
    }
    let key = key.trim();
    if key.is_empty() {
        return Command::Ignore;
    }
    match key.to_ascii_lowercase().as_str() {
        "w" | "i" | "up" => Command::Move(Direction::Up),
        "s" | "k" | "down" => Command::Move(Direction::Down),
        "a" | "j" | "left" => Command::Move(Direction::Left),
        "d" | "l" | "right" => Command::Move(Direction::Right),
        "q" | "quit" | "exit" | "esc" => Command::Quit,
        _ => Command::Unknown(key.to_string()),
    }
}

/// Final state of an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub moves: u64,
    pub score: Score,
    pub highest_tile: Tile,
    pub status: GameStatus,
}

/// Run the keyboard loop until quit, end of input, or a stuck grid.
///
/// A win is announced once and play continues; the session ends when no
/// direction can change the grid any more.
pub fn run<B, W, R>(
    input: B,
    mut out: W,
    size: usize,
    win_tile: Tile,
    rng: &mut R,
) -> Result<SessionSummary>
where
    B: BufRead,
    W: Write,
    R: Rng + ?Sized,
{
    let mut grid = new_game(size, rng)?;
    let mut moves = 0u64;
    let mut announced_win = false;

    draw(&mut out, &grid)?;
    writeln!(out, "{HELP}")?;

    for line in input.lines() {
        let line = line.context("failed to read keyboard input")?;
        let dir = match parse_command(&line) {
            Command::Move(dir) => dir,
            Command::Quit => break,
            Command::Ignore => continue,
            Command::Unknown(key) => {
                writeln!(out, "unknown key '{key}'; {HELP}")?;
                continue;
            }
        };

        let result = grid.make_move(dir, rng);
        if !result.moved {
            debug!("{dir} does not change the grid");
            continue;
        }
        grid = result.grid;
        moves += 1;
        draw(&mut out, &grid)?;

        if !announced_win && status_with_target(&grid, win_tile) == GameStatus::Win {
            announced_win = true;
            info!("reached {win_tile} after {moves} moves");
            writeln!(out, "You reached {win_tile}! Keep going or press q to quit.")?;
        }
        if grid.legal_moves().is_empty() {
            writeln!(out, "Game over! Final score: {}", grid.score())?;
            break;
        }
    }
    out.flush()?;

    Ok(SessionSummary {
        moves,
        score: grid.score(),
        highest_tile: grid.highest_tile(),
        status: status_with_target(&grid, win_tile),
    })
}

fn draw<W: Write>(out: &mut W, grid: &Grid) -> std::io::Result<()> {
    write!(out, "{grid}")?;
    writeln!(out, "SCORE: {}", grid.score())
}
