use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::engine::{legal_moves_on, Board};
use crate::threat::{
  aggression_score, danger_score, development_score, placement_threats, probe_threats,
  space_score, strategic_score, PlacementThreats,
};
use crate::types::{Coord, GameSnapshot, Player};

// 开局阶段贴着对方最近的落子选点，斜向优先
const OPENING_OFFSETS: [(i32, i32); 8] = [
  (1, 1),
  (-1, -1),
  (1, -1),
  (-1, 1),
  (0, 1),
  (1, 0),
  (0, -1),
  (-1, 0),
];

struct Deadline {
  start: Instant,
  budget: Duration,
}

impl Deadline {
  fn new(budget_ms: u64) -> Self {
    Self {
      start: Instant::now(),
      budget: Duration::from_millis(budget_ms),
    }
  }

  fn exceeded(&self) -> bool {
    self.start.elapsed() >= self.budget
  }
}

/// Picks one move per request by walking a fixed chain of tiers, most urgent
/// first. The first tier with candidates decides; ties break uniformly at
/// random with the injected RNG.
pub struct MoveSelector {
  player: Player,
  config: EngineConfig,
  rng: StdRng,
}

impl MoveSelector {
  pub fn new(player: Player, config: EngineConfig) -> Self {
    Self {
      player,
      config,
      rng: StdRng::from_entropy(),
    }
  }

  /// Fixed seed, reproducible tie-breaks.
  pub fn with_seed(player: Player, config: EngineConfig, seed: u64) -> Self {
    Self {
      player,
      config,
      rng: StdRng::seed_from_u64(seed),
    }
  }

  pub fn player(&self) -> Player {
    self.player
  }

  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  /// Returns `None` only when no legal move exists. Internal faults never
  /// escape: the worst case is a logged random legal move.
  pub fn decide(&mut self, snapshot: &GameSnapshot) -> Option<Coord> {
    let deadline = Deadline::new(self.config.time_budget_ms);

    let prepared = catch_unwind(AssertUnwindSafe(|| {
      let board = Board::from_snapshot(snapshot);
      let legal = legal_moves_on(&board, snapshot.game_over);
      (board, legal)
    }));
    let (mut board, legal) = match prepared {
      Ok(prepared) => prepared,
      Err(_) => {
        error!("snapshot could not be read, no move available");
        return None;
      }
    };
    if legal.is_empty() {
      warn!("no legal moves available for {:?}", self.player);
      return None;
    }
    debug!("{:?} choosing among {} legal moves", self.player, legal.len());

    let picked = catch_unwind(AssertUnwindSafe(|| {
      self.run_tiers(&mut board, &legal, &deadline)
    }));

    let coord = match picked {
      Ok(coord) => coord.or_else(|| legal.choose(&mut self.rng).copied()),
      Err(_) => {
        error!("move evaluation failed, falling back to a random legal move");
        legal.choose(&mut self.rng).copied()
      }
    };
    if let Some(coord) = coord {
      info!(
        "{:?} plays ({}, {}) after {} ms",
        self.player,
        coord.x,
        coord.y,
        deadline.start.elapsed().as_millis()
      );
    }
    coord
  }

  fn run_tiers(&mut self, board: &mut Board, legal: &[Coord], deadline: &Deadline) -> Option<Coord> {
    let me = self.player;
    let opp = me.other();

    // 1: opening book while the board is nearly empty.
    if let Some(pool) = self.opening_pool(board, legal) {
      debug!("opening move");
      return self.pick(&pool);
    }

    // 2: finish a five.
    let pool = probe_pool(board, legal, me, |t| t.has_five());
    if !pool.is_empty() {
      debug!("winning move");
      return self.pick(&pool);
    }

    // 3: deny the opponent's five.
    let pool = probe_pool(board, legal, opp, |t| t.has_five());
    if !pool.is_empty() {
      debug!("blocking an immediate loss");
      return self.pick(&pool);
    }

    // 4: an opponent open four is lost unless taken now.
    let pool = probe_pool(board, legal, opp, |t| t.has_open_four());
    if !pool.is_empty() {
      debug!("blocking an open four");
      return self.pick(&pool);
    }

    // 5: our own open four wins next turn.
    let pool = probe_pool(board, legal, me, |t| t.has_open_four());
    if !pool.is_empty() {
      debug!("creating an open four");
      return self.pick(&pool);
    }

    // 6: plain four threats, theirs before ours.
    let pool = probe_pool(board, legal, opp, |t| t.fours() >= 1);
    if !pool.is_empty() {
      debug!("blocking a four threat");
      return self.pick(&pool);
    }
    let pool = probe_pool(board, legal, me, |t| t.fours() >= 1);
    if !pool.is_empty() {
      debug!("creating a four threat");
      return self.pick(&pool);
    }

    // 7: double threes, theirs before ours.
    let pool = probe_pool(board, legal, opp, |t| t.is_double_three());
    if !pool.is_empty() {
      debug!("blocking a double three");
      return self.pick(&pool);
    }
    let pool = probe_pool(board, legal, me, |t| t.is_double_three());
    if !pool.is_empty() {
      debug!("creating a double three");
      return self.pick(&pool);
    }

    // 8: compound danger scan of opponent replies.
    if let Some(pool) = self.compound_defense(board, legal) {
      return self.pick(&pool);
    }

    // 9: leftover open threes, a slower kind of danger.
    if let Some(pool) = self.open_three_block(board, legal) {
      return self.pick(&pool);
    }

    // 10: attack if a placement builds enough pressure.
    if let Some(pool) = self.aggressive_pool(board, legal, deadline) {
      return self.pick(&pool);
    }

    // 11: multiple simultaneous threats force the win.
    let pool = self.forced_win_pool(board, legal, deadline);
    if !pool.is_empty() {
      debug!("forcing sequence found");
      return self.pick(&pool);
    }

    // 12: deny slow development before it turns into threats.
    if let Some(pool) = self.slow_threat_pool(board, legal, deadline) {
      return self.pick(&pool);
    }

    // 13: full positional scoring of whatever is left.
    if let Some(pool) = self.strategic_pool(board, legal, deadline) {
      return self.pick(&pool);
    }

    None
  }

  fn pick(&mut self, pool: &[Coord]) -> Option<Coord> {
    pool.choose(&mut self.rng).copied()
  }

  fn opening_pool(&self, board: &Board, legal: &[Coord]) -> Option<Vec<Coord>> {
    let stones = board.stone_count();
    if stones == 0 {
      let center = board.size() / 2;
      return Some(vec![Coord { x: center, y: center }]);
    }
    if stones >= self.config.opening_limit {
      return None;
    }

    let anchor = nearest_to_center(board, self.player.other())?;
    let mut pool = Vec::new();
    for (dx, dy) in OPENING_OFFSETS {
      let nx = anchor.x as i32 + dx;
      let ny = anchor.y as i32 + dy;
      if nx < 0 || ny < 0 {
        continue;
      }
      let coord = Coord {
        x: nx as usize,
        y: ny as usize,
      };
      if board.in_bounds(coord.x, coord.y) && legal.contains(&coord) {
        pool.push(coord);
      }
    }
    if pool.is_empty() {
      None
    } else {
      Some(pool)
    }
  }

  fn compound_defense(&self, board: &mut Board, legal: &[Coord]) -> Option<Vec<Coord>> {
    let opp = self.player.other();
    let scoring = &self.config.scoring;
    let mut best = i32::MIN;
    let mut pool = Vec::new();

    for &coord in legal {
      let threats = probe_threats(board, coord.x, coord.y, opp);
      let score = danger_score(&threats, scoring);
      if score > best {
        best = score;
        pool.clear();
        pool.push(coord);
      } else if score == best {
        pool.push(coord);
      }
    }

    if best > self.config.thresholds.danger {
      debug!("compound defense at danger {}", best);
      Some(pool)
    } else {
      None
    }
  }

  fn open_three_block(&self, board: &mut Board, legal: &[Coord]) -> Option<Vec<Coord>> {
    let opp = self.player.other();
    let mut best = i32::MIN;
    let mut pool = Vec::new();

    for &coord in legal {
      let threats = probe_threats(board, coord.x, coord.y, opp);
      let score = threats.open_threes() as i32 * self.config.weights.open_three;
      if score > best {
        best = score;
        pool.clear();
        pool.push(coord);
      } else if score == best {
        pool.push(coord);
      }
    }

    if best > self.config.thresholds.open_three_block {
      debug!("blocking an open three, score {}", best);
      Some(pool)
    } else {
      None
    }
  }

  fn aggressive_pool(&self, board: &mut Board, legal: &[Coord], deadline: &Deadline) -> Option<Vec<Coord>> {
    let me = self.player;
    let mut best = i32::MIN;
    let mut pool = Vec::new();

    for &coord in legal {
      if deadline.exceeded() {
        debug!("time budget reached during the aggressive scan");
        break;
      }
      board.set(coord.x, coord.y, me);
      let threats = placement_threats(board, coord.x, coord.y, me);
      let score = aggression_score(board, coord, &threats, me, &self.config);
      board.clear(coord.x, coord.y);

      if score > best {
        best = score;
        pool.clear();
        pool.push(coord);
      } else if score == best {
        pool.push(coord);
      }
    }

    if best > self.config.thresholds.aggression {
      debug!("aggressive move at score {}", best);
      Some(pool)
    } else {
      None
    }
  }

  fn forced_win_pool(&self, board: &mut Board, legal: &[Coord], deadline: &Deadline) -> Vec<Coord> {
    let me = self.player;
    let mut pool = Vec::new();
    for &coord in legal {
      if deadline.exceeded() {
        debug!("time budget reached during the forcing scan");
        break;
      }
      let threats = probe_threats(board, coord.x, coord.y, me);
      if threats.is_forcing() {
        pool.push(coord);
      }
    }
    pool
  }

  fn slow_threat_pool(&self, board: &mut Board, legal: &[Coord], deadline: &Deadline) -> Option<Vec<Coord>> {
    let opp = self.player.other();
    let scoring = &self.config.scoring;
    let mut best = i32::MIN;
    let mut pool = Vec::new();

    for &coord in legal {
      if deadline.exceeded() {
        debug!("time budget reached during the slow-threat scan");
        break;
      }
      board.set(coord.x, coord.y, opp);
      let score = development_score(board, coord.x, coord.y, opp, scoring)
        + space_score(board, coord.x, coord.y, opp, scoring);
      board.clear(coord.x, coord.y);

      if score > best {
        best = score;
        pool.clear();
        pool.push(coord);
      } else if score == best {
        pool.push(coord);
      }
    }

    if best > self.config.thresholds.slow_threat {
      debug!("slow threat blocked at score {}", best);
      Some(pool)
    } else {
      None
    }
  }

  /// Every worker scores its candidate on a private board clone, so probing
  /// never leaks across threads. Candidates skipped by the deadline simply
  /// drop out; ties collapse in board order before the random pick.
  fn strategic_pool(&self, board: &Board, legal: &[Coord], deadline: &Deadline) -> Option<Vec<Coord>> {
    let config = &self.config;
    let player = self.player;

    let scored: Vec<Option<i32>> = legal
      .par_iter()
      .map(|&coord| {
        if deadline.exceeded() {
          return None;
        }
        // 每个线程只动自己的副本
        let mut local = board.clone();
        Some(strategic_score(&mut local, coord, player, config))
      })
      .collect();

    let mut best = i32::MIN;
    let mut pool = Vec::new();
    for (idx, score) in scored.iter().enumerate() {
      let score = match score {
        Some(score) => *score,
        None => continue,
      };
      if score > best {
        best = score;
        pool.clear();
        pool.push(legal[idx]);
      } else if score == best {
        pool.push(legal[idx]);
      }
    }

    if pool.is_empty() {
      debug!("time budget consumed before any strategic score");
      None
    } else {
      Some(pool)
    }
  }
}

fn probe_pool<F>(board: &mut Board, legal: &[Coord], player: Player, keep: F) -> Vec<Coord>
where
  F: Fn(&PlacementThreats) -> bool,
{
  let mut pool = Vec::new();
  for &coord in legal {
    let threats = probe_threats(board, coord.x, coord.y, player);
    if keep(&threats) {
      pool.push(coord);
    }
  }
  pool
}

fn nearest_to_center(board: &Board, player: Player) -> Option<Coord> {
  let size = board.size();
  let center = (size / 2) as i32;
  let mut best: Option<(i32, Coord)> = None;

  for y in 0..size {
    for x in 0..size {
      if board.get(x, y) != Some(player) {
        continue;
      }
      let dist = (x as i32 - center).abs() + (y as i32 - center).abs();
      if best.map_or(true, |(d, _)| dist < d) {
        best = Some((dist, Coord { x, y }));
      }
    }
  }

  best.map(|(_, coord)| coord)
}
