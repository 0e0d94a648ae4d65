use serde::{Deserialize, Serialize};

use crate::engine::Board;
use crate::scan::{forward_window, LineToken, DIRECTIONS};
use crate::types::Player;

/// Shape weights used by every scoring tier. Defaults are the tuned
/// reference values; all of them can be overridden from the config file.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternWeights {
  pub five: i32,
  pub open_four: i32,
  pub four: i32,
  pub broken_four: i32,
  pub open_three: i32,
  pub three: i32,
  pub open_two: i32,
  pub two: i32,
  pub one: i32,
}

impl Default for PatternWeights {
  fn default() -> Self {
    Self {
      five: 100_000,
      open_four: 50_000,
      four: 10_000,
      broken_four: 7_000,
      open_three: 1_000,
      three: 500,
      open_two: 100,
      two: 50,
      one: 10,
    }
  }
}

/// Score one 5-cell window for `player`. Any opposing stone or boundary in
/// the window keeps the run from ever reaching five there, so mixed windows
/// count for nothing.
pub fn score_window5(window: &[LineToken], player: Player, weights: &PatternWeights) -> i32 {
  debug_assert_eq!(window.len(), 5);

  let mut own = 0;
  let mut empty = 0;
  let mut first_own = usize::MAX;
  let mut last_own = 0;
  for (idx, token) in window.iter().enumerate() {
    match token {
      LineToken::Stone(p) if *p == player => {
        own += 1;
        if first_own == usize::MAX {
          first_own = idx;
        }
        last_own = idx;
      }
      LineToken::Empty => empty += 1,
      // 对方棋子或边界，这条线没有价值
      _ => return 0,
    }
  }

  let flanks_open = window[0].is_empty() && window[4].is_empty();
  let contiguous = own > 0 && last_own - first_own + 1 == own;
  match (own, empty) {
    (5, _) => weights.five,
    (4, 1) if contiguous => weights.four,
    (4, 1) => weights.broken_four,
    (3, 2) if flanks_open => weights.open_three,
    (3, 2) => weights.three,
    (2, 3) if flanks_open => weights.open_two,
    (2, 3) => weights.two,
    (1, 4) => weights.one,
    _ => 0,
  }
}

/// Pattern sum for `player` over every cell-and-axis 5-window on the board.
pub fn position_score(board: &Board, player: Player, weights: &PatternWeights) -> i32 {
  let size = board.size();
  let mut score = 0;

  for y in 0..size {
    for x in 0..size {
      for dir in DIRECTIONS {
        let window = forward_window(board, x, y, dir, 5);
        score += score_window5(&window, player, weights);
      }
    }
  }

  score
}

/// Any 5-token sub-slice with four own stones and one gap is one move away
/// from five. Catches split shapes like `PPP.P` that plain run counting
/// misses.
pub(crate) fn has_four_gap_window(window: &[LineToken], player: Player) -> bool {
  if window.len() < 5 {
    return false;
  }
  for start in 0..=window.len() - 5 {
    let slice = &window[start..start + 5];
    let own = slice.iter().filter(|t| t.is_own(player)).count();
    let empty = slice.iter().filter(|t| t.is_empty()).count();
    if own == 4 && empty == 1 {
      return true;
    }
  }
  false
}

/// Split threes (`.PP.P.` and `.P.PP.`) grow into a four threat the same way
/// an open three does.
pub(crate) fn has_broken_three_window(window: &[LineToken], player: Player) -> bool {
  if window.len() < 6 {
    return false;
  }
  let own = |t: &LineToken| t.is_own(player);
  let gap = |t: &LineToken| t.is_empty();
  for start in 0..=window.len() - 6 {
    let s = &window[start..start + 6];
    let low = gap(&s[0]) && own(&s[1]) && own(&s[2]) && gap(&s[3]) && own(&s[4]) && gap(&s[5]);
    let high = gap(&s[0]) && own(&s[1]) && gap(&s[2]) && own(&s[3]) && own(&s[4]) && gap(&s[5]);
    if low || high {
      return true;
    }
  }
  false
}

#[cfg(test)]
mod tests {
  use super::*;

  const W: PatternWeights = PatternWeights {
    five: 100_000,
    open_four: 50_000,
    four: 10_000,
    broken_four: 7_000,
    open_three: 1_000,
    three: 500,
    open_two: 100,
    two: 50,
    one: 10,
  };

  fn tokens(shape: &str, player: Player) -> Vec<LineToken> {
    shape
      .chars()
      .map(|c| match c {
        'P' => LineToken::Stone(player),
        'o' => LineToken::Stone(player.other()),
        '#' => LineToken::Boundary,
        _ => LineToken::Empty,
      })
      .collect()
  }

  #[test]
  fn counts_runs_by_size_and_openness() {
    assert_eq!(score_window5(&tokens("PPPPP", Player::X), Player::X, &W), 100_000);
    assert_eq!(score_window5(&tokens("PPPP.", Player::X), Player::X, &W), 10_000);
    assert_eq!(score_window5(&tokens("PP.PP", Player::X), Player::X, &W), 7_000);
    assert_eq!(score_window5(&tokens("PPP.P", Player::X), Player::X, &W), 7_000);
    assert_eq!(score_window5(&tokens(".PPP.", Player::X), Player::X, &W), 1_000);
    assert_eq!(score_window5(&tokens("PPP..", Player::X), Player::X, &W), 500);
    assert_eq!(score_window5(&tokens(".PP..", Player::X), Player::X, &W), 100);
    assert_eq!(score_window5(&tokens("PP...", Player::X), Player::X, &W), 50);
    assert_eq!(score_window5(&tokens("P....", Player::X), Player::X, &W), 10);
    assert_eq!(score_window5(&tokens(".....", Player::X), Player::X, &W), 0);
  }

  #[test]
  fn opposing_stone_zeroes_the_window() {
    assert_eq!(score_window5(&tokens("PPPPo", Player::X), Player::X, &W), 0);
    assert_eq!(score_window5(&tokens("oPPP.", Player::X), Player::X, &W), 0);
  }

  #[test]
  fn boundary_blocks_but_is_nobody_s_stone() {
    assert_eq!(score_window5(&tokens("PPPP#", Player::X), Player::X, &W), 0);
    assert_eq!(score_window5(&tokens("####P", Player::X), Player::X, &W), 0);
    // The same window seen by the other player is worth nothing either.
    assert_eq!(score_window5(&tokens("####P", Player::X), Player::O, &W), 0);
  }

  #[test]
  fn position_score_is_zero_on_an_empty_board() {
    let board = Board::new(15);
    assert_eq!(position_score(&board, Player::X, &W), 0);
  }

  #[test]
  fn position_score_sees_a_lone_stone_from_all_axes() {
    let mut board = Board::new(15);
    board.set(7, 7, Player::X);
    let score = position_score(&board, Player::X, &W);
    assert!(score > 0);
    assert_eq!(score % W.one, 0);
    assert_eq!(position_score(&board, Player::O, &W), 0);
  }

  #[test]
  fn four_gap_windows_cover_split_fours() {
    assert!(has_four_gap_window(&tokens("PPP.P", Player::X), Player::X));
    assert!(has_four_gap_window(&tokens("PP.PP", Player::X), Player::X));
    assert!(has_four_gap_window(&tokens("..P.PPP..", Player::X), Player::X));
    assert!(!has_four_gap_window(&tokens("PPP..", Player::X), Player::X));
    assert!(!has_four_gap_window(&tokens("PPPoP", Player::X), Player::X));
  }

  #[test]
  fn broken_three_windows_need_open_flanks() {
    assert!(has_broken_three_window(&tokens(".PP.P.", Player::X), Player::X));
    assert!(has_broken_three_window(&tokens(".P.PP.", Player::X), Player::X));
    assert!(!has_broken_three_window(&tokens("oPP.P.", Player::X), Player::X));
    assert!(!has_broken_three_window(&tokens("#PP.P.", Player::X), Player::X));
    assert!(!has_broken_three_window(&tokens(".PPP..", Player::X), Player::X));
  }
}
