//! Engine tuning knobs with serde defaults and bounds validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::ScoreClamp;

/// Which aggregate decides the winner once every player has finished.
///
/// The two shipped board variants disagreed here; the default follows the
/// more fully featured one (sum across all passions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WinnerPolicy {
    /// Highest sum across all six passion scores.
    #[default]
    TotalScore,
    /// Highest score in the player's own main passion.
    MainPassion,
}

/// Escalating resolution probabilities for scheduled risk outcomes,
/// indexed by how many turns remain after the current decrement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskCurve {
    /// Probability while two or more turns remain.
    #[serde(default = "RiskCurve::default_early")]
    pub early: f32,
    /// Probability when exactly one turn remains.
    #[serde(default = "RiskCurve::default_late")]
    pub late: f32,
    /// Probability on the last chance; resolution is forced at zero
    /// remaining turns regardless of the draw.
    #[serde(default = "RiskCurve::default_last")]
    pub last: f32,
}

impl RiskCurve {
    const fn default_early() -> f32 {
        0.5
    }

    const fn default_late() -> f32 {
        0.7
    }

    const fn default_last() -> f32 {
        0.9
    }

    /// Probability for a given number of remaining turns.
    #[must_use]
    pub const fn probability(&self, remaining_turns: i32) -> f32 {
        if remaining_turns >= 2 {
            self.early
        } else if remaining_turns == 1 {
            self.late
        } else {
            self.last
        }
    }
}

impl Default for RiskCurve {
    fn default() -> Self {
        Self {
            early: Self::default_early(),
            late: Self::default_late(),
            last: Self::default_last(),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Inclusive lower bound of the base die.
    #[serde(default = "EngineConfig::default_dice_min")]
    pub dice_min: i32,
    /// Inclusive upper bound of the base die.
    #[serde(default = "EngineConfig::default_dice_max")]
    pub dice_max: i32,
    /// Rolls granted at the start of each turn.
    #[serde(default = "EngineConfig::default_rolls_per_turn")]
    pub rolls_per_turn: u32,
    /// Multiplier applied when points land in the player's main passion.
    #[serde(default = "EngineConfig::default_main_passion_factor")]
    pub main_passion_factor: f32,
    /// Score interval that awards one star per crossing.
    #[serde(default = "EngineConfig::default_star_threshold")]
    pub star_threshold: i32,
    /// Share of the main-passion score granted to the first finisher.
    #[serde(default = "EngineConfig::default_first_finish_bonus_ratio")]
    pub first_finish_bonus_ratio: f32,
    /// Base points awarded on a successful risk-checkpoint flip.
    #[serde(default = "EngineConfig::default_risk_checkpoint_bonus")]
    pub risk_checkpoint_bonus: i32,
    /// Success probability of the risk-checkpoint flip.
    #[serde(default = "EngineConfig::default_risk_checkpoint_chance")]
    pub risk_checkpoint_chance: f32,
    #[serde(default)]
    pub risk_curve: RiskCurve,
    #[serde(default)]
    pub winner_policy: WinnerPolicy,
    #[serde(default)]
    pub score_clamp: ScoreClamp,
}

impl EngineConfig {
    const fn default_dice_min() -> i32 {
        1
    }

    const fn default_dice_max() -> i32 {
        6
    }

    const fn default_rolls_per_turn() -> u32 {
        1
    }

    const fn default_main_passion_factor() -> f32 {
        1.2
    }

    const fn default_star_threshold() -> i32 {
        100
    }

    const fn default_first_finish_bonus_ratio() -> f32 {
        0.2
    }

    const fn default_risk_checkpoint_bonus() -> i32 {
        10
    }

    const fn default_risk_checkpoint_chance() -> f32 {
        0.5
    }

    /// Validate documented bounds.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when any field violates its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dice_min < 1 || self.dice_max < self.dice_min {
            return Err(ConfigError::DiceBounds {
                min: self.dice_min,
                max: self.dice_max,
            });
        }
        if self.rolls_per_turn == 0 {
            return Err(ConfigError::MinViolation {
                field: "rolls_per_turn",
                min: 1,
            });
        }
        if self.star_threshold <= 0 {
            return Err(ConfigError::MinViolation {
                field: "star_threshold",
                min: 1,
            });
        }
        Self::check_probability("risk_checkpoint_chance", self.risk_checkpoint_chance)?;
        Self::check_probability("risk_curve.early", self.risk_curve.early)?;
        Self::check_probability("risk_curve.late", self.risk_curve.late)?;
        Self::check_probability("risk_curve.last", self.risk_curve.last)?;
        Ok(())
    }

    fn check_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::ProbabilityRange { field, value });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dice_min: Self::default_dice_min(),
            dice_max: Self::default_dice_max(),
            rolls_per_turn: Self::default_rolls_per_turn(),
            main_passion_factor: Self::default_main_passion_factor(),
            star_threshold: Self::default_star_threshold(),
            first_finish_bonus_ratio: Self::default_first_finish_bonus_ratio(),
            risk_checkpoint_bonus: Self::default_risk_checkpoint_bonus(),
            risk_checkpoint_chance: Self::default_risk_checkpoint_chance(),
            risk_curve: RiskCurve::default(),
            winner_policy: WinnerPolicy::default(),
            score_clamp: ScoreClamp::default(),
        }
    }
}

/// Validation failures for [`EngineConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("dice bounds invalid: min {min}, max {max}")]
    DiceBounds { min: i32, max: i32 },
    #[error("{field} must be at least {min}")]
    MinViolation { field: &'static str, min: i32 },
    #[error("{field} must lie in [0, 1], got {value}")]
    ProbabilityRange { field: &'static str, value: f32 },
}
