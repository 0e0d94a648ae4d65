use crate::engine::Board;
use crate::types::Player;

/// The four scan axes. Each line is walked in both directions, so these four
/// cover all eight rays.
pub const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// One cell as seen by the pattern matchers. The board edge gets its own
/// token so it blocks runs exactly like an opposing stone but never matches
/// a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineToken {
  Empty,
  Stone(Player),
  Boundary,
}

impl LineToken {
  pub fn is_empty(self) -> bool {
    self == LineToken::Empty
  }

  pub fn is_own(self, player: Player) -> bool {
    self == LineToken::Stone(player)
  }

  pub fn blocks(self, player: Player) -> bool {
    match self {
      LineToken::Boundary => true,
      LineToken::Stone(p) => p != player,
      LineToken::Empty => false,
    }
  }
}

/// Window of `2 * half_width + 1` tokens centered on `(x, y)` along `dir`.
/// Pure read; off-board positions become `Boundary`.
pub fn scan_line(board: &Board, x: usize, y: usize, dir: (i32, i32), half_width: usize) -> Vec<LineToken> {
  let (dx, dy) = dir;
  let half = half_width as i32;
  let mut window = Vec::with_capacity(2 * half_width + 1);
  for step in -half..=half {
    window.push(token_at(board, x as i32 + dx * step, y as i32 + dy * step));
  }
  window
}

/// Window of `len` tokens starting at `(x, y)` and extending along `dir`.
pub fn forward_window(board: &Board, x: usize, y: usize, dir: (i32, i32), len: usize) -> Vec<LineToken> {
  let (dx, dy) = dir;
  let mut window = Vec::with_capacity(len);
  for step in 0..len as i32 {
    window.push(token_at(board, x as i32 + dx * step, y as i32 + dy * step));
  }
  window
}

fn token_at(board: &Board, x: i32, y: i32) -> LineToken {
  if x < 0 || y < 0 {
    return LineToken::Boundary;
  }
  let (ux, uy) = (x as usize, y as usize);
  if !board.in_bounds(ux, uy) {
    return LineToken::Boundary;
  }
  match board.get(ux, uy) {
    Some(player) => LineToken::Stone(player),
    None => LineToken::Empty,
  }
}
