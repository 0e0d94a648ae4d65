use log::{debug, info};

use crate::errors::IllegalMove;
use crate::rules::{rules_for, scan_winner};
use crate::types::{Coord, GameResult, GameSnapshot, Move, Player, RuleSetKind};

pub const DEFAULT_BOARD_SIZE: usize = 15;

// 首手只在中心 5x5 范围内选点
const OPENING_BLOCK_RADIUS: usize = 2;

#[derive(Clone, Debug)]
pub struct Board {
  size: usize,
  cells: Vec<Option<Player>>,
  stones: usize,
}

impl Board {
  pub fn new(size: usize) -> Self {
    Self {
      size,
      cells: vec![None; size * size],
      stones: 0,
    }
  }

  pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
    let size = snapshot.board_size;
    let mut board = Board::new(size);
    for (idx, cell) in snapshot.board.iter().enumerate().take(size * size) {
      if let Some(player) = *cell {
        board.cells[idx] = Some(player);
        board.stones += 1;
      }
    }
    board
  }

  pub fn size(&self) -> usize {
    self.size
  }

  pub fn in_bounds(&self, x: usize, y: usize) -> bool {
    x < self.size && y < self.size
  }

  fn index(&self, x: usize, y: usize) -> usize {
    y * self.size + x
  }

  pub fn get(&self, x: usize, y: usize) -> Option<Player> {
    if !self.in_bounds(x, y) {
      return None;
    }
    self.cells[self.index(x, y)]
  }

  pub fn set(&mut self, x: usize, y: usize, player: Player) {
    let idx = self.index(x, y);
    if self.cells[idx].is_none() {
      self.stones += 1;
    }
    self.cells[idx] = Some(player);
  }

  pub fn clear(&mut self, x: usize, y: usize) {
    let idx = self.index(x, y);
    if self.cells[idx].is_some() {
      self.stones -= 1;
    }
    self.cells[idx] = None;
  }

  pub fn is_empty(&self, x: usize, y: usize) -> bool {
    self.in_bounds(x, y) && self.get(x, y).is_none()
  }

  pub fn is_full(&self) -> bool {
    self.stones == self.size * self.size
  }

  pub fn stone_count(&self) -> usize {
    self.stones
  }

  pub fn has_adjacent_stone(&self, x: usize, y: usize) -> bool {
    for dy in -1i32..=1 {
      for dx in -1i32..=1 {
        if dx == 0 && dy == 0 {
          continue;
        }
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if nx < 0 || ny < 0 {
          continue;
        }
        let (ux, uy) = (nx as usize, ny as usize);
        if self.in_bounds(ux, uy) && self.get(ux, uy).is_some() {
          return true;
        }
      }
    }
    false
  }
}

/// Legal cells for the side to move. The first stone is restricted to the
/// central block so the opening stays bounded; afterwards only cells touching
/// an existing stone qualify. Row-major scan keeps the order stable for a
/// given position.
pub fn legal_moves_on(board: &Board, game_over: bool) -> Vec<Coord> {
  if game_over {
    return Vec::new();
  }

  let size = board.size();
  if board.stone_count() == 0 {
    let center = size / 2;
    let lo_x = center.saturating_sub(OPENING_BLOCK_RADIUS);
    let lo_y = center.saturating_sub(OPENING_BLOCK_RADIUS);
    let hi_x = usize::min(center + OPENING_BLOCK_RADIUS, size - 1);
    let hi_y = usize::min(center + OPENING_BLOCK_RADIUS, size - 1);
    let mut moves = Vec::new();
    for y in lo_y..=hi_y {
      for x in lo_x..=hi_x {
        moves.push(Coord { x, y });
      }
    }
    return moves;
  }

  let mut moves = Vec::with_capacity(size * 4);
  for y in 0..size {
    for x in 0..size {
      if board.get(x, y).is_none() && board.has_adjacent_stone(x, y) {
        moves.push(Coord { x, y });
      }
    }
  }
  moves
}

#[derive(Clone, Debug)]
pub struct GameState {
  pub board: Board,
  pub rule_set: RuleSetKind,
  pub to_move: Player,
  pub moves: Vec<Move>,
  pub result: Option<GameResult>,
}

impl GameState {
  pub fn new(board_size: usize) -> Self {
    Self {
      board: Board::new(board_size),
      rule_set: RuleSetKind::Standard,
      to_move: Player::X,
      moves: Vec::new(),
      result: None,
    }
  }

  /// Rebuild a playable state from a snapshot. Move history is not part of
  /// the snapshot, so `moves` starts empty.
  pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
    let result = if snapshot.game_over {
      snapshot
        .winner
        .map(GameResult::win_for)
        .or(Some(GameResult::Draw))
    } else {
      None
    };
    Self {
      board: Board::from_snapshot(snapshot),
      rule_set: RuleSetKind::Standard,
      to_move: snapshot.to_move,
      moves: Vec::new(),
      result,
    }
  }

  pub fn move_count(&self) -> usize {
    self.board.stone_count()
  }

  pub fn is_over(&self) -> bool {
    self.result.is_some()
  }

  pub fn winner(&self) -> Option<Player> {
    self.result.and_then(GameResult::winner)
  }

  pub fn apply_move(&mut self, x: usize, y: usize) -> Result<(), IllegalMove> {
    if self.result.is_some() {
      return Err(IllegalMove::Finished);
    }

    let mv = Move {
      x,
      y,
      player: self.to_move,
    };
    let rules = rules_for(self.rule_set);
    rules.validate(&self.board, &mv)?;

    self.board.set(x, y, mv.player);
    self.moves.push(mv);
    debug!("move {:?} at ({}, {}), stone {}", mv.player, x, y, self.board.stone_count());

    // 只需围绕最新落子判胜
    if let Some(result) = rules.check_win(&self.board, &mv) {
      info!("game over: {:?}", result);
      self.result = Some(result);
      return Ok(());
    }

    if self.board.is_full() {
      info!("board full, draw");
      self.result = Some(GameResult::Draw);
      return Ok(());
    }

    self.to_move = self.to_move.other();
    Ok(())
  }

  pub fn legal_moves(&self) -> Vec<Coord> {
    legal_moves_on(&self.board, self.result.is_some())
  }

  /// Full-board winner rescan. Agrees with the incremental check done in
  /// `apply_move`; kept as the reference the fast path is tested against.
  pub fn scan_winner(&self) -> Option<Player> {
    scan_winner(&self.board)
  }

  pub fn snapshot(&self) -> GameSnapshot {
    GameSnapshot {
      board_size: self.board.size(),
      board: self.board.cells.clone(),
      move_count: self.board.stone_count(),
      to_move: self.to_move,
      game_over: self.result.is_some(),
      winner: self.winner(),
    }
  }

  pub fn reset(&mut self) {
    let size = self.board.size();
    self.board = Board::new(size);
    self.to_move = Player::X;
    self.moves.clear();
    self.result = None;
  }
}
