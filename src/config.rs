use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::patterns::PatternWeights;

/// Everything tunable about the selector. Field defaults are the tuned
/// reference values; a TOML file may override any subset.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
  /// Soft wall-clock budget for one decision.
  pub time_budget_ms: u64,
  /// Defense share of the fallback score, in tenths (9 = 0.9x attack).
  pub defense_weight: i32,
  /// The opening table runs while fewer stones than this are on the board.
  pub opening_limit: usize,
  pub weights: PatternWeights,
  pub thresholds: TierThresholds,
  pub scoring: ScoringWeights,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      time_budget_ms: 3_000,
      defense_weight: 9,
      opening_limit: 4,
      weights: PatternWeights::default(),
      thresholds: TierThresholds::default(),
      scoring: ScoringWeights::default(),
    }
  }
}

/// Cutoffs deciding whether a scored tier fires at all. Tuned empirically;
/// the two defensive sweeps overlap on purpose and keep separate knobs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TierThresholds {
  pub danger: i32,
  pub open_three_block: i32,
  pub aggression: i32,
  pub slow_threat: i32,
}

impl Default for TierThresholds {
  fn default() -> Self {
    Self {
      danger: 1_500,
      open_three_block: 800,
      aggression: 2_500,
      slow_threat: 110,
    }
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringWeights {
  pub threat_dir: i32,
  pub double_three_danger: i32,
  pub four_three_danger: i32,
  pub open_three_attack: i32,
  pub four_attack: i32,
  pub fork: i32,
  pub center_line: i32,
  pub space_empty: i32,
  pub space_own: i32,
  pub space_radius: usize,
  pub dev_own: i32,
  pub dev_empty: i32,
  pub dead_line: i32,
  pub center_bonus: i32,
  pub conn_own: i32,
  pub conn_opp: i32,
}

impl Default for ScoringWeights {
  fn default() -> Self {
    Self {
      threat_dir: 500,
      double_three_danger: 1_200,
      four_three_danger: 1_500,
      open_three_attack: 700,
      four_attack: 900,
      fork: 350,
      center_line: 40,
      space_empty: 2,
      space_own: 3,
      space_radius: 2,
      dev_own: 2,
      dev_empty: 1,
      dead_line: 30,
      center_bonus: 5,
      conn_own: 6,
      conn_opp: 3,
    }
  }
}

impl EngineConfig {
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let config: EngineConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  /// Missing file falls back to defaults; a present but broken file is an
  /// error.
  pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
    if path.exists() {
      Self::load(path)
    } else {
      Ok(Self::default())
    }
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.time_budget_ms == 0 {
      return Err(ConfigError::Validation("timeBudgetMs must be > 0".into()));
    }
    if self.defense_weight <= 0 || self.defense_weight > 20 {
      return Err(ConfigError::Validation(
        "defenseWeight must be in 1..=20 (tenths)".into(),
      ));
    }
    if self.opening_limit > 6 {
      return Err(ConfigError::Validation(
        "openingLimit must be at most 6".into(),
      ));
    }

    let w = &self.weights;
    let descending = [
      ("five", w.five, "openFour", w.open_four),
      ("openFour", w.open_four, "four", w.four),
      ("four", w.four, "brokenFour", w.broken_four),
      ("brokenFour", w.broken_four, "openThree", w.open_three),
      ("openThree", w.open_three, "three", w.three),
      ("three", w.three, "openTwo", w.open_two),
      ("openTwo", w.open_two, "two", w.two),
      ("two", w.two, "one", w.one),
    ];
    for (hi_name, hi, lo_name, lo) in descending {
      if hi <= lo {
        return Err(ConfigError::Validation(format!(
          "weights.{hi_name} must exceed weights.{lo_name}"
        )));
      }
    }
    if w.one <= 0 {
      return Err(ConfigError::Validation("weights.one must be > 0".into()));
    }

    let t = &self.thresholds;
    if t.danger <= 0 || t.open_three_block <= 0 || t.aggression <= 0 || t.slow_threat <= 0 {
      return Err(ConfigError::Validation("thresholds must be > 0".into()));
    }

    if self.scoring.space_radius == 0 {
      return Err(ConfigError::Validation(
        "scoring.spaceRadius must be >= 1".into(),
      ));
    }

    Ok(())
  }
}
