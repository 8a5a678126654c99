//! Mutable per-player state.

use serde::{Deserialize, Serialize};

use crate::score::{Passion, ScoreSet};

/// Presentation flavor tag carried by a player (avatar selection only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Runtime counters for one status effect attached to a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveStatusEffect {
    pub card_id: String,
    #[serde(default)]
    pub remaining_rolls: u32,
    #[serde(default)]
    pub remaining_turns: u32,
    #[serde(default)]
    pub remaining_skip_rounds: u32,
}

/// One player's complete mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Main passion; grants the main-passion multiplier and drives one of
    /// the winner policies.
    pub passion: Passion,
    pub gender: Gender,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub scores: ScoreSet,
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub available_rolls: u32,
    /// Item card ids currently held. Duplicates are allowed unless the
    /// item declares itself unique per player.
    #[serde(default)]
    pub inventory: Vec<String>,
    /// Status-effect card ids surfaced to the UI.
    #[serde(default)]
    pub status_cards: Vec<String>,
    #[serde(default)]
    pub active_effects: Vec<ActiveStatusEffect>,
    /// Roster index of this player's partner; symmetric when present.
    #[serde(default)]
    pub partner: Option<usize>,
    /// Leftover movement stored while a branch choice is pending.
    #[serde(default)]
    pub pending_movement: u32,
    /// Whether the player is currently traversing the risk route.
    #[serde(default)]
    pub on_risk_route: bool,
}

impl Player {
    #[must_use]
    pub fn new(name: &str, passion: Passion, gender: Gender) -> Self {
        Self {
            name: name.to_string(),
            passion,
            gender,
            position: 0,
            finished: false,
            scores: ScoreSet::default(),
            stars: 0,
            available_rolls: 0,
            inventory: Vec::new(),
            status_cards: Vec::new(),
            active_effects: Vec::new(),
            partner: None,
            pending_movement: 0,
            on_risk_route: false,
        }
    }

    /// Sum of all passion scores (no multipliers, no bonuses).
    #[must_use]
    pub const fn total_score(&self) -> i32 {
        self.scores.total()
    }

    #[must_use]
    pub const fn has_partner(&self) -> bool {
        self.partner.is_some()
    }

    #[must_use]
    pub fn holds_item(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|id| id == item_id)
    }

    /// Restore the player to a fresh pre-game state, keeping identity.
    pub fn reset(&mut self) {
        self.position = 0;
        self.finished = false;
        self.scores = ScoreSet::default();
        self.stars = 0;
        self.available_rolls = 0;
        self.inventory.clear();
        self.status_cards.clear();
        self.active_effects.clear();
        self.partner = None;
        self.pending_movement = 0;
        self.on_risk_route = false;
    }
}
