use crate::engine::Board;
use crate::errors::IllegalMove;
use crate::scan::DIRECTIONS;
use crate::types::{GameResult, Move, Player, RuleSetKind};

pub trait RuleSet {
  fn validate(&self, board: &Board, mv: &Move) -> Result<(), IllegalMove>;
  fn check_win(&self, board: &Board, mv: &Move) -> Option<GameResult>;

  fn is_legal(&self, board: &Board, mv: &Move) -> bool {
    self.validate(board, mv).is_ok()
  }
}

/// Five-in-a-row with the adjacency placement rule: every stone after the
/// first must touch an occupied cell.
pub struct StandardRuleSet;

impl RuleSet for StandardRuleSet {
  fn validate(&self, board: &Board, mv: &Move) -> Result<(), IllegalMove> {
    if !board.in_bounds(mv.x, mv.y) {
      return Err(IllegalMove::OutOfBounds { x: mv.x, y: mv.y });
    }
    if board.get(mv.x, mv.y).is_some() {
      return Err(IllegalMove::Occupied { x: mv.x, y: mv.y });
    }
    if board.stone_count() > 0 && !board.has_adjacent_stone(mv.x, mv.y) {
      return Err(IllegalMove::NotAdjacent { x: mv.x, y: mv.y });
    }
    Ok(())
  }

  fn check_win(&self, board: &Board, mv: &Move) -> Option<GameResult> {
    let player = mv.player;

    for (dx, dy) in DIRECTIONS {
      let mut count = 1;
      count += count_dir(board, mv.x, mv.y, dx, dy, player);
      count += count_dir(board, mv.x, mv.y, -dx, -dy, player);

      if count >= 5 {
        return Some(GameResult::win_for(player));
      }
    }

    None
  }
}

pub fn rules_for(kind: RuleSetKind) -> Box<dyn RuleSet> {
  match kind {
    RuleSetKind::Standard => Box::new(StandardRuleSet),
  }
}

/// Reference winner detection: rescan every occupied cell on every axis.
pub fn scan_winner(board: &Board) -> Option<Player> {
  let size = board.size();
  for y in 0..size {
    for x in 0..size {
      let player = match board.get(x, y) {
        Some(player) => player,
        None => continue,
      };
      for (dx, dy) in DIRECTIONS {
        let mut count = 1;
        count += count_dir(board, x, y, dx, dy, player);
        count += count_dir(board, x, y, -dx, -dy, player);
        if count >= 5 {
          return Some(player);
        }
      }
    }
  }
  None
}

fn count_dir(board: &Board, x: usize, y: usize, dx: i32, dy: i32, player: Player) -> usize {
  let mut count = 0;
  let mut cx = x as i32 + dx;
  let mut cy = y as i32 + dy;

  while cx >= 0 && cy >= 0 {
    let ux = cx as usize;
    let uy = cy as usize;
    if !board.in_bounds(ux, uy) {
      break;
    }
    if board.get(ux, uy) != Some(player) {
      break;
    }
    count += 1;
    cx += dx;
    cy += dy;
  }

  count
}
