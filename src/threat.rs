use crate::config::{EngineConfig, ScoringWeights};
use crate::engine::Board;
use crate::patterns::{has_broken_three_window, has_four_gap_window, position_score};
use crate::scan::{scan_line, DIRECTIONS};
use crate::types::{Coord, Player};

/// What one axis looks like through a just-placed stone, strongest first
/// when compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ThreatClass {
  None,
  Two,
  Three,
  BrokenThree,
  OpenThree,
  BrokenFour,
  SimpleFour,
  OpenFour,
  Five,
}

impl ThreatClass {
  pub fn is_four(self) -> bool {
    matches!(self, ThreatClass::BrokenFour | ThreatClass::SimpleFour | ThreatClass::OpenFour)
  }

  /// Open and split threes both turn into a four threat unless answered.
  pub fn is_open_three(self) -> bool {
    matches!(self, ThreatClass::OpenThree | ThreatClass::BrokenThree)
  }

  pub fn threatens(self) -> bool {
    self.is_four() || self.is_open_three() || self == ThreatClass::Five
  }
}

/// The four axis classifications of one hypothetical placement.
#[derive(Clone, Copy, Debug)]
pub struct PlacementThreats {
  pub classes: [ThreatClass; 4],
}

impl PlacementThreats {
  pub fn has_five(&self) -> bool {
    self.classes.contains(&ThreatClass::Five)
  }

  pub fn has_open_four(&self) -> bool {
    self.classes.contains(&ThreatClass::OpenFour)
  }

  pub fn fours(&self) -> usize {
    self.classes.iter().filter(|c| c.is_four()).count()
  }

  pub fn open_threes(&self) -> usize {
    self.classes.iter().filter(|c| c.is_open_three()).count()
  }

  pub fn threat_dirs(&self) -> usize {
    self.classes.iter().filter(|c| c.threatens()).count()
  }

  pub fn is_double_three(&self) -> bool {
    self.open_threes() >= 2
  }

  pub fn is_four_three(&self) -> bool {
    self.fours() >= 1 && self.open_threes() >= 1
  }

  /// Two simultaneous threats cannot both be blocked by one reply.
  pub fn is_forcing(&self) -> bool {
    self.fours() + self.open_threes() >= 2
  }
}

/// Classify every axis of a placement, restoring the probed cell before
/// returning.
pub fn probe_threats(board: &mut Board, x: usize, y: usize, player: Player) -> PlacementThreats {
  board.set(x, y, player);
  let threats = placement_threats(board, x, y, player);
  board.clear(x, y);
  threats
}

/// Same as `probe_threats` but the stone at `(x, y)` is already on the board.
pub fn placement_threats(board: &Board, x: usize, y: usize, player: Player) -> PlacementThreats {
  PlacementThreats {
    classes: DIRECTIONS.map(|dir| direction_threat(board, x, y, dir, player)),
  }
}

fn direction_threat(board: &Board, x: usize, y: usize, dir: (i32, i32), player: Player) -> ThreatClass {
  let window = scan_line(board, x, y, dir, 4);
  let center = 4usize;

  // 以中心为起点向两侧数连子
  let mut left = center;
  while left > 0 && window[left - 1].is_own(player) {
    left -= 1;
  }
  let mut right = center;
  while right < window.len() - 1 && window[right + 1].is_own(player) {
    right += 1;
  }
  let run = right - left + 1;

  if run >= 5 {
    return ThreatClass::Five;
  }

  let open_left = left > 0 && window[left - 1].is_empty();
  let open_right = right < window.len() - 1 && window[right + 1].is_empty();
  let open_ends = open_left as usize + open_right as usize;

  if run == 4 && open_ends == 2 {
    return ThreatClass::OpenFour;
  }
  if run == 4 && open_ends == 1 {
    return ThreatClass::SimpleFour;
  }
  if has_four_gap_window(&window, player) {
    return ThreatClass::BrokenFour;
  }
  if run == 3 && open_ends == 2 {
    return ThreatClass::OpenThree;
  }
  if has_broken_three_window(&window, player) {
    return ThreatClass::BrokenThree;
  }
  if run == 3 && open_ends == 1 {
    return ThreatClass::Three;
  }
  if run == 2 && open_ends == 2 {
    return ThreatClass::Two;
  }
  ThreatClass::None
}

/// Tier-8 danger estimate of an opponent placement: simultaneous threat
/// axes plus the compound shapes that cannot be answered one at a time.
pub fn danger_score(threats: &PlacementThreats, weights: &ScoringWeights) -> i32 {
  let mut score = threats.threat_dirs() as i32 * weights.threat_dir;
  if threats.is_double_three() {
    score += weights.double_three_danger;
  }
  if threats.is_four_three() {
    score += weights.four_three_danger;
  }
  score
}

/// Tier-10 attacking value of an own placement already on the board.
pub fn aggression_score(
  board: &Board,
  coord: Coord,
  threats: &PlacementThreats,
  player: Player,
  config: &EngineConfig,
) -> i32 {
  let weights = &config.scoring;
  let mut score = threats.threat_dirs() as i32 * weights.threat_dir
    + threats.open_threes() as i32 * weights.open_three_attack
    + threats.fours() as i32 * weights.four_attack;

  let fork_dirs = fork_directions(board, coord.x, coord.y, player);
  if fork_dirs >= 2 {
    score += fork_dirs as i32 * weights.fork;
  }

  score + central_control(coord, board.size(), weights)
}

/// Directions with partial build-up: at least three own stones reachable in
/// a line through the cell that still has room for five.
fn fork_directions(board: &Board, x: usize, y: usize, player: Player) -> usize {
  DIRECTIONS
    .iter()
    .filter(|&&dir| {
      let (span, own) = direction_potential(board, x, y, dir, player);
      span >= 5 && own >= 3
    })
    .count()
}

/// Walk both ways from `(x, y)` until blocked (up to four steps each way).
/// Returns the reachable span including the center and the own stones inside
/// it, the probed stone included.
fn direction_potential(board: &Board, x: usize, y: usize, dir: (i32, i32), player: Player) -> (usize, usize) {
  let window = scan_line(board, x, y, dir, 4);
  let center = 4usize;
  let mut span = 1;
  let mut own = 1;

  let mut idx = center;
  while idx > 0 && !window[idx - 1].blocks(player) {
    idx -= 1;
    span += 1;
    if window[idx].is_own(player) {
      own += 1;
    }
  }
  idx = center;
  while idx < window.len() - 1 && !window[idx + 1].blocks(player) {
    idx += 1;
    span += 1;
    if window[idx].is_own(player) {
      own += 1;
    }
  }

  (span, own)
}

/// Tier-12/13 growth estimate: friendly stones and open space along each
/// axis, opposing stones end the walk.
pub fn development_score(board: &Board, x: usize, y: usize, player: Player, weights: &ScoringWeights) -> i32 {
  let mut score = 0;
  for dir in DIRECTIONS {
    let window = scan_line(board, x, y, dir, 4);
    let center = 4usize;

    let mut idx = center;
    while idx > 0 && !window[idx - 1].blocks(player) {
      idx -= 1;
      score += if window[idx].is_own(player) { weights.dev_own } else { weights.dev_empty };
    }
    idx = center;
    while idx < window.len() - 1 && !window[idx + 1].blocks(player) {
      idx += 1;
      score += if window[idx].is_own(player) { weights.dev_own } else { weights.dev_empty };
    }
  }
  score
}

/// Weighted room around a placement: empties keep options open, friendly
/// stones anchor the area.
pub fn space_score(board: &Board, x: usize, y: usize, player: Player, weights: &ScoringWeights) -> i32 {
  let radius = weights.space_radius as i32;
  let mut score = 0;
  for dy in -radius..=radius {
    for dx in -radius..=radius {
      if dx == 0 && dy == 0 {
        continue;
      }
      let nx = x as i32 + dx;
      let ny = y as i32 + dy;
      if nx < 0 || ny < 0 {
        continue;
      }
      let (ux, uy) = (nx as usize, ny as usize);
      if !board.in_bounds(ux, uy) {
        continue;
      }
      match board.get(ux, uy) {
        None => score += weights.space_empty,
        Some(p) if p == player => score += weights.space_own,
        Some(_) => {}
      }
    }
  }
  score
}

/// Axes that can no longer reach five through this cell.
pub fn dead_line_penalty(board: &Board, x: usize, y: usize, player: Player, weights: &ScoringWeights) -> i32 {
  let dead = DIRECTIONS
    .iter()
    .filter(|&&dir| direction_potential(board, x, y, dir, player).0 < 5)
    .count();
  dead as i32 * weights.dead_line
}

/// Occupied 8-neighbors; touching the opponent is worth keeping too, it
/// crowds their shapes.
pub fn connectivity_bonus(board: &Board, x: usize, y: usize, player: Player, weights: &ScoringWeights) -> i32 {
  let mut score = 0;
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
      if !board.in_bounds(ux, uy) {
        continue;
      }
      match board.get(ux, uy) {
        Some(p) if p == player => score += weights.conn_own,
        Some(_) => score += weights.conn_opp,
        None => {}
      }
    }
  }
  score
}

fn central_control(coord: Coord, size: usize, weights: &ScoringWeights) -> i32 {
  let center = (size / 2) as i32;
  let dist = (coord.x as i32 - center).abs() + (coord.y as i32 - center).abs();
  i32::max(0, size as i32 - 1 - dist) * weights.center_line
}

fn center_bonus(coord: Coord, size: usize, weights: &ScoringWeights) -> i32 {
  let center = (size / 2) as i32;
  let dist = (coord.x as i32 - center).abs() + (coord.y as i32 - center).abs();
  i32::max(0, size as i32 - 1 - dist) * weights.center_bonus
}

/// Tier-13 composite: attack patterns, denied opponent patterns, room to
/// grow, and board geography. Probes both colors at the candidate and
/// restores the cell each time.
pub fn strategic_score(board: &mut Board, coord: Coord, player: Player, config: &EngineConfig) -> i32 {
  let opponent = player.other();
  let weights = &config.weights;
  let scoring = &config.scoring;

  board.set(coord.x, coord.y, player);
  let attack = position_score(board, player, weights);
  let space = space_score(board, coord.x, coord.y, player, scoring);
  let development = development_score(board, coord.x, coord.y, player, scoring);
  let dead = dead_line_penalty(board, coord.x, coord.y, player, scoring);
  board.clear(coord.x, coord.y);

  board.set(coord.x, coord.y, opponent);
  let defense = position_score(board, opponent, weights);
  board.clear(coord.x, coord.y);

  let connectivity = connectivity_bonus(board, coord.x, coord.y, player, scoring);

  attack + defense * config.defense_weight / 10 + space + development - dead
    + center_bonus(coord, board.size(), scoring)
    + connectivity
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::EngineConfig;

  fn place(board: &mut Board, player: Player, coords: &[(usize, usize)]) {
    for &(x, y) in coords {
      board.set(x, y, player);
    }
  }

  #[test]
  fn classifies_open_and_blocked_fours() {
    let mut board = Board::new(15);
    place(&mut board, Player::X, &[(5, 7), (6, 7), (7, 7), (8, 7)]);
    let t = placement_threats(&board, 8, 7, Player::X);
    assert!(t.has_open_four());

    // Block one end and it degrades to a simple four.
    board.set(4, 7, Player::O);
    let t = placement_threats(&board, 8, 7, Player::X);
    assert!(!t.has_open_four());
    assert_eq!(t.fours(), 1);
  }

  #[test]
  fn classifies_split_fours() {
    let mut board = Board::new(15);
    place(&mut board, Player::X, &[(4, 7), (5, 7), (6, 7), (8, 7)]);
    let t = placement_threats(&board, 8, 7, Player::X);
    assert_eq!(t.fours(), 1);
    assert!(!t.has_open_four());
  }

  #[test]
  fn classifies_threes() {
    let mut board = Board::new(15);
    place(&mut board, Player::X, &[(5, 7), (6, 7), (7, 7)]);
    let t = placement_threats(&board, 7, 7, Player::X);
    assert_eq!(t.open_threes(), 1);

    board.set(4, 7, Player::O);
    let t = placement_threats(&board, 7, 7, Player::X);
    assert_eq!(t.open_threes(), 0);
    assert_eq!(t.classes[0], ThreatClass::Three);
  }

  #[test]
  fn edge_runs_are_blocked_by_the_boundary() {
    let mut board = Board::new(15);
    place(&mut board, Player::X, &[(0, 7), (1, 7), (2, 7)]);
    let t = placement_threats(&board, 0, 7, Player::X);
    // One side is the edge, so this can never be an open three.
    assert_eq!(t.open_threes(), 0);
  }

  #[test]
  fn five_through_the_center_is_detected() {
    let mut board = Board::new(15);
    place(&mut board, Player::O, &[(5, 5), (6, 6), (8, 8), (9, 9)]);
    let t = probe_threats(&mut board, 7, 7, Player::O);
    assert!(t.has_five());
    // The probe restored the cell.
    assert_eq!(board.get(7, 7), None);
    assert_eq!(board.stone_count(), 4);
  }

  #[test]
  fn crossing_open_threes_make_a_double_three() {
    let mut board = Board::new(15);
    place(&mut board, Player::X, &[(5, 7), (6, 7), (7, 5), (7, 6)]);
    let t = probe_threats(&mut board, 7, 7, Player::X);
    assert!(t.is_double_three());
    assert!(t.is_forcing());
    assert!(!t.is_four_three());
  }

  #[test]
  fn four_plus_three_is_detected() {
    let mut board = Board::new(15);
    place(&mut board, Player::X, &[(4, 7), (5, 7), (6, 7), (7, 5), (7, 6)]);
    let t = probe_threats(&mut board, 7, 7, Player::X);
    assert!(t.is_four_three());
    assert!(t.is_forcing());
  }

  #[test]
  fn danger_grows_with_compound_threats() {
    let config = EngineConfig::default();
    let mut board = Board::new(15);
    place(&mut board, Player::X, &[(5, 7), (6, 7)]);
    let single = probe_threats(&mut board, 7, 7, Player::X);

    place(&mut board, Player::X, &[(7, 5), (7, 6)]);
    let double = probe_threats(&mut board, 7, 7, Player::X);

    assert!(danger_score(&double, &config.scoring) > danger_score(&single, &config.scoring));
  }

  #[test]
  fn dead_lines_are_penalized() {
    let config = EngineConfig::default();
    let mut board = Board::new(15);
    // Box the cell in horizontally.
    place(&mut board, Player::O, &[(5, 7), (9, 7)]);
    board.set(7, 7, Player::X);
    let boxed = dead_line_penalty(&board, 7, 7, Player::X, &config.scoring);
    assert!(boxed > 0);

    let open = dead_line_penalty(&Board::new(15), 7, 7, Player::X, &config.scoring);
    assert_eq!(open, 0);
  }

  #[test]
  fn strategic_score_restores_the_board() {
    let config = EngineConfig::default();
    let mut board = Board::new(15);
    place(&mut board, Player::X, &[(7, 7), (8, 8)]);
    let before = board.stone_count();
    strategic_score(&mut board, Coord { x: 6, y: 6 }, Player::O, &config);
    assert_eq!(board.stone_count(), before);
    assert_eq!(board.get(6, 6), None);
  }

  #[test]
  fn blocking_a_strong_cell_outscores_a_remote_one() {
    let config = EngineConfig::default();
    let mut board = Board::new(15);
    place(&mut board, Player::X, &[(5, 7), (6, 7), (7, 7)]);
    let block = strategic_score(&mut board, Coord { x: 8, y: 7 }, Player::O, &config);
    let remote = strategic_score(&mut board, Coord { x: 1, y: 13 }, Player::O, &config);
    assert!(block > remote);
  }
}
