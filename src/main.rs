use std::env;
use std::path::Path;
use std::process;

use log::{error, info};

use gomoku_core::{EngineConfig, GameState, MoveSelector, Player, DEFAULT_BOARD_SIZE};

/// Plays one engine-vs-engine game and prints the final board.
///
/// Usage: `selfplay [seed]`. `GOMOKU_CONFIG` may point at a TOML config
/// file; `RUST_LOG` controls verbosity and defaults to `info`.
fn main() {
  if env::var("RUST_LOG").is_err() {
    env::set_var("RUST_LOG", "info");
  }
  env_logger::init();

  let config = match env::var("GOMOKU_CONFIG") {
    Ok(path) => match EngineConfig::load_or_default(Path::new(&path)) {
      Ok(config) => config,
      Err(err) => {
        eprintln!("config error: {err}");
        process::exit(2);
      }
    },
    Err(_) => EngineConfig::default(),
  };

  let seed: u64 = env::args()
    .nth(1)
    .and_then(|arg| arg.parse().ok())
    .unwrap_or(42);

  let mut black = MoveSelector::with_seed(Player::X, config, seed);
  let mut white = MoveSelector::with_seed(Player::O, config, seed.wrapping_add(1));
  let mut state = GameState::new(DEFAULT_BOARD_SIZE);

  info!("self-play with seed {seed}");
  while !state.is_over() {
    let snapshot = state.snapshot();
    let selector = if state.to_move == Player::X {
      &mut black
    } else {
      &mut white
    };
    let coord = match selector.decide(&snapshot) {
      Some(coord) => coord,
      None => break,
    };
    if let Err(err) = state.apply_move(coord.x, coord.y) {
      error!("selector produced an illegal move ({}, {}): {err}", coord.x, coord.y);
      break;
    }
  }

  print_board(&state);
  match state.winner() {
    Some(player) => println!("winner: {player:?} in {} moves", state.move_count()),
    None if state.is_over() => println!("draw after {} moves", state.move_count()),
    None => println!("aborted after {} moves", state.move_count()),
  }

  // Final position as JSON, for feeding other tools.
  if let Ok(path) = env::var("GOMOKU_DUMP") {
    match serde_json::to_string_pretty(&state.snapshot()) {
      Ok(json) => {
        if let Err(err) = std::fs::write(&path, json) {
          error!("failed to write {path}: {err}");
        }
      }
      Err(err) => error!("failed to serialize the final snapshot: {err}"),
    }
  }
}

fn print_board(state: &GameState) {
  let size = state.board.size();
  for y in 0..size {
    let mut row = String::with_capacity(size * 2);
    for x in 0..size {
      row.push(match state.board.get(x, y) {
        Some(Player::X) => 'X',
        Some(Player::O) => 'O',
        None => '.',
      });
      row.push(' ');
    }
    println!("{row}");
  }
}
