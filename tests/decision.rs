use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use gomoku_core::{Coord, EngineConfig, GameSnapshot, GameState, MoveSelector, Player};

fn snapshot_with(size: usize, stones: &[(usize, usize, Player)], to_move: Player) -> GameSnapshot {
  let mut board = vec![None; size * size];
  for &(x, y, player) in stones {
    board[y * size + x] = Some(player);
  }
  GameSnapshot {
    board_size: size,
    board,
    move_count: stones.len(),
    to_move,
    game_over: false,
    winner: None,
  }
}

fn selector(player: Player, seed: u64) -> MoveSelector {
  MoveSelector::with_seed(player, EngineConfig::default(), seed)
}

#[test]
fn first_move_is_the_exact_center() {
  for player in [Player::X, Player::O] {
    let mut engine = selector(player, 9);
    let snapshot = snapshot_with(15, &[], player);
    assert_eq!(engine.decide(&snapshot), Some(Coord { x: 7, y: 7 }));
  }
}

#[test]
fn winning_move_is_never_skipped() {
  // X has an open four on row 5; either end wins on the spot.
  let stones = [
    (5, 5, Player::X),
    (6, 5, Player::X),
    (7, 5, Player::X),
    (8, 5, Player::X),
    (5, 9, Player::O),
    (6, 9, Player::O),
    (7, 9, Player::O),
  ];
  let snapshot = snapshot_with(15, &stones, Player::X);
  let mut engine = selector(Player::X, 17);
  let coord = engine.decide(&snapshot).unwrap();
  assert!(
    coord == Coord { x: 4, y: 5 } || coord == Coord { x: 9, y: 5 },
    "expected the winning completion, got {coord:?}"
  );

  // Applying the chosen move actually ends the game for X.
  let mut state = GameState::from_snapshot(&snapshot);
  state.apply_move(coord.x, coord.y).unwrap();
  assert_eq!(state.winner(), Some(Player::X));
  assert_eq!(state.winner(), state.scan_winner());
}

#[test]
fn open_four_is_blocked_at_either_end() {
  // X holds (6,7)..(9,7) open on both ends; O must answer at (5,7) or (10,7).
  let stones = [
    (6, 7, Player::X),
    (7, 7, Player::X),
    (8, 7, Player::X),
    (9, 7, Player::X),
  ];
  let snapshot = snapshot_with(15, &stones, Player::O);
  for seed in 0..8 {
    let mut engine = selector(Player::O, seed);
    let coord = engine.decide(&snapshot).unwrap();
    assert!(
      coord == Coord { x: 5, y: 7 } || coord == Coord { x: 10, y: 7 },
      "seed {seed}: expected a block at the row ends, got {coord:?}"
    );
  }
}

#[test]
fn own_win_beats_blocking() {
  // Both sides have a completable four; the engine takes its own win.
  let stones = [
    (5, 5, Player::O),
    (6, 5, Player::O),
    (7, 5, Player::O),
    (8, 5, Player::O),
    (5, 9, Player::X),
    (6, 9, Player::X),
    (7, 9, Player::X),
    (8, 9, Player::X),
  ];
  let snapshot = snapshot_with(15, &stones, Player::O);
  let mut engine = selector(Player::O, 23);
  let coord = engine.decide(&snapshot).unwrap();
  assert!(
    coord == Coord { x: 4, y: 5 } || coord == Coord { x: 9, y: 5 },
    "expected the winning move over the block, got {coord:?}"
  );
}

#[test]
fn open_three_gets_extended_to_an_open_four() {
  // No enemy threats anywhere; the engine's open three should grow.
  let stones = [
    (6, 7, Player::X),
    (7, 7, Player::X),
    (8, 7, Player::X),
    (1, 1, Player::O),
    (2, 1, Player::O),
  ];
  let snapshot = snapshot_with(15, &stones, Player::X);
  let mut engine = selector(Player::X, 29);
  let coord = engine.decide(&snapshot).unwrap();
  assert!(
    coord == Coord { x: 5, y: 7 } || coord == Coord { x: 9, y: 7 },
    "expected an open-four extension, got {coord:?}"
  );
}

#[test]
fn double_three_junction_is_blocked() {
  // X's two open twos cross at (7,7); left alone X plays there and owns two
  // open threes at once.
  let stones = [
    (5, 7, Player::X),
    (6, 7, Player::X),
    (7, 5, Player::X),
    (7, 6, Player::X),
    (1, 1, Player::O),
    (2, 2, Player::O),
    (1, 2, Player::O),
  ];
  let snapshot = snapshot_with(15, &stones, Player::O);
  let mut engine = selector(Player::O, 31);
  let coord = engine.decide(&snapshot).unwrap();
  assert_eq!(coord, Coord { x: 7, y: 7 });
}

#[test]
fn finished_or_full_games_yield_no_move() {
  let mut snapshot = snapshot_with(15, &[(7, 7, Player::X)], Player::O);
  snapshot.game_over = true;
  snapshot.winner = Some(Player::X);
  assert_eq!(selector(Player::O, 37).decide(&snapshot), None);
}

#[test]
fn tie_breaks_are_reproducible_for_a_fixed_seed() {
  let stones = [
    (7, 7, Player::X),
    (8, 8, Player::O),
    (6, 6, Player::X),
    (9, 9, Player::O),
  ];
  let snapshot = snapshot_with(15, &stones, Player::X);

  let first = selector(Player::X, 99).decide(&snapshot);
  for _ in 0..5 {
    assert_eq!(selector(Player::X, 99).decide(&snapshot), first);
  }
}

#[test]
fn incremental_win_check_matches_full_rescan_over_a_random_game() {
  let mut rng = StdRng::seed_from_u64(7);
  let mut state = GameState::new(15);

  for _ in 0..200 {
    let legal = state.legal_moves();
    if legal.is_empty() {
      break;
    }
    let &coord = legal.choose(&mut rng).unwrap();
    state.apply_move(coord.x, coord.y).unwrap();
    assert_eq!(state.winner(), state.scan_winner());
  }
}

#[test]
fn legal_moves_always_pass_the_placement_rules() {
  let mut rng = StdRng::seed_from_u64(11);
  let mut state = GameState::new(15);

  for _ in 0..80 {
    let legal = state.legal_moves();
    if legal.is_empty() {
      break;
    }
    for coord in &legal {
      assert!(state.board.get(coord.x, coord.y).is_none());
      if state.move_count() > 0 {
        assert!(state.board.has_adjacent_stone(coord.x, coord.y));
      }
    }
    let &coord = legal.choose(&mut rng).unwrap();
    state.apply_move(coord.x, coord.y).unwrap();
  }
}

#[test]
fn selectors_finish_a_whole_game() {
  let config = EngineConfig::default();
  let mut black = MoveSelector::with_seed(Player::X, config, 3);
  let mut white = MoveSelector::with_seed(Player::O, config, 4);
  let mut state = GameState::new(15);

  while !state.is_over() {
    let snapshot = state.snapshot();
    let engine = if state.to_move == Player::X { &mut black } else { &mut white };
    let coord = match engine.decide(&snapshot) {
      Some(coord) => coord,
      None => break,
    };
    state.apply_move(coord.x, coord.y).unwrap();
    assert_eq!(state.winner(), state.scan_winner());
  }

  // Either somebody won or the board ran out of frontier cells.
  assert!(state.is_over() || state.legal_moves().is_empty());
}
