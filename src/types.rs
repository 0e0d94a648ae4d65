use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Player {
  X,
  O,
}

impl Player {
  pub fn other(self) -> Self {
    match self {
      Player::X => Player::O,
      Player::O => Player::X,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSetKind {
  Standard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameResult {
  XWin,
  OWin,
  Draw,
}

impl GameResult {
  pub fn win_for(player: Player) -> Self {
    match player {
      Player::X => GameResult::XWin,
      Player::O => GameResult::OWin,
    }
  }

  pub fn winner(self) -> Option<Player> {
    match self {
      GameResult::XWin => Some(Player::X),
      GameResult::OWin => Some(Player::O),
      GameResult::Draw => None,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coord {
  pub x: usize,
  pub y: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
  pub x: usize,
  pub y: usize,
  pub player: Player,
}

/// Read-only view of a position as supplied by the game-state owner.
/// `board` is row-major, `board_size * board_size` cells.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
  pub board_size: usize,
  pub board: Vec<Option<Player>>,
  pub move_count: usize,
  pub to_move: Player,
  pub game_over: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub winner: Option<Player>,
}
