use std::path::PathBuf;

use thiserror::Error;

/// Rejected placements. Always recoverable: the caller picks another cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IllegalMove {
  #[error("coordinates ({x}, {y}) are outside the board")]
  OutOfBounds { x: usize, y: usize },

  #[error("cell ({x}, {y}) is already occupied")]
  Occupied { x: usize, y: usize },

  #[error("({x}, {y}) touches no existing stone")]
  NotAdjacent { x: usize, y: usize },

  #[error("game is already finished")]
  Finished,
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Read {
    path: PathBuf,
    source: std::io::Error,
  },

  #[error("failed to parse TOML: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("invalid config: {0}")]
  Validation(String),
}
