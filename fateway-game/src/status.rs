//! Status-effect lifetime configuration and the lifecycle manager.
//!
//! Effects attached to a player expire along independent dimensions: a
//! roll budget, a turn budget, specific rolled values, or after forcing a
//! number of skipped turns. Each dimension is optional.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardCatalog, CardDef, CardKind};
use crate::player::{ActiveStatusEffect, Player};

/// Die faces that immediately break an effect, stored inline.
pub type BreakValues = SmallVec<[i32; 4]>;

/// How long a card stays active once tracked as a status effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatusLifetime {
    /// Expire after this many rolls by the owning player.
    #[serde(default)]
    pub max_rolls: Option<u32>,
    /// Expire after this many of the owning player's turns.
    #[serde(default)]
    pub max_turns: Option<u32>,
    /// Base die values that break the effect immediately.
    #[serde(default)]
    pub break_on_rolls: BreakValues,
    /// Full turns the owner must skip because of this effect.
    #[serde(default)]
    pub skip_rounds: u32,
}

impl StatusLifetime {
    /// True when no lifetime dimension is enabled.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.max_rolls.is_none()
            && self.max_turns.is_none()
            && self.break_on_rolls.is_empty()
            && self.skip_rounds == 0
    }
}

/// Create or refresh the tracked record for a card on a player.
///
/// Cards with no trackable lifetime and no explicit tracking flag are
/// ignored. Re-applying an already-active card resets its counters to the
/// configured maximums instead of stacking a second record.
pub fn register(player: &mut Player, card: &CardDef) {
    if !card.is_trackable() {
        return;
    }

    let cfg = &card.lifetime;
    if card.track_as_status && !player.status_cards.iter().any(|id| id == &card.id) {
        player.status_cards.push(card.id.clone());
        log::debug!("status effect '{}' tracked for {}", card.title, player.name);
    }

    if let Some(existing) = player
        .active_effects
        .iter_mut()
        .find(|effect| effect.card_id == card.id)
    {
        if let Some(max_rolls) = cfg.max_rolls {
            existing.remaining_rolls = max_rolls;
        }
        if let Some(max_turns) = cfg.max_turns {
            existing.remaining_turns = max_turns;
        }
        existing.remaining_skip_rounds = cfg.skip_rounds;
    } else {
        player.active_effects.push(ActiveStatusEffect {
            card_id: card.id.clone(),
            remaining_rolls: cfg.max_rolls.unwrap_or(0),
            remaining_turns: cfg.max_turns.unwrap_or(0),
            remaining_skip_rounds: cfg.skip_rounds,
        });
    }
}

/// Remove a tracked effect from a player, stripping item cards from the
/// inventory as well. Returns false when nothing was tracked (idempotent).
pub fn remove(player: &mut Player, card_id: &str, catalog: &CardCatalog) -> bool {
    let had_id = player.status_cards.iter().any(|id| id == card_id);
    let had_record = player
        .active_effects
        .iter()
        .any(|effect| effect.card_id == card_id);

    player.status_cards.retain(|id| id != card_id);
    player.active_effects.retain(|effect| effect.card_id != card_id);

    if let Some(card) = catalog.get(card_id)
        && card.kind() == CardKind::Item
        && let Some(slot) = player.inventory.iter().position(|id| id == card_id)
    {
        player.inventory.remove(slot);
        log::debug!("expired item '{card_id}' removed from {}'s inventory", player.name);
    }

    had_id || had_record
}

/// Tick roll-scoped lifetimes after the owner rolled `base_roll` (the
/// unmodified die value). Returns the ids of effects that expired.
pub fn on_roll(player: &mut Player, base_roll: i32, catalog: &CardCatalog) -> Vec<String> {
    let mut expired = Vec::new();
    let mut orphaned = Vec::new();

    for effect in &mut player.active_effects {
        let Some(card) = catalog.get(&effect.card_id) else {
            log::warn!("status effect references unknown card '{}'", effect.card_id);
            orphaned.push(effect.card_id.clone());
            continue;
        };
        let cfg = &card.lifetime;

        if cfg.max_rolls.is_some() && effect.remaining_rolls > 0 {
            effect.remaining_rolls -= 1;
            if effect.remaining_rolls == 0 {
                expired.push(effect.card_id.clone());
                continue;
            }
        }

        if cfg.break_on_rolls.contains(&base_roll) {
            expired.push(effect.card_id.clone());
        }
    }

    for card_id in orphaned {
        player.active_effects.retain(|effect| effect.card_id != card_id);
    }
    for card_id in &expired {
        remove(player, card_id, catalog);
    }
    expired
}

/// Tick turn-scoped lifetimes when the owner's turn ends. Returns the ids
/// of effects that expired.
pub fn on_turn_end(player: &mut Player, catalog: &CardCatalog) -> Vec<String> {
    let mut expired = Vec::new();
    let mut orphaned = Vec::new();

    for effect in &mut player.active_effects {
        let Some(card) = catalog.get(&effect.card_id) else {
            orphaned.push(effect.card_id.clone());
            continue;
        };

        if card.lifetime.max_turns.is_some() && effect.remaining_turns > 0 {
            effect.remaining_turns -= 1;
            if effect.remaining_turns == 0 {
                expired.push(effect.card_id.clone());
            }
        }
    }

    for card_id in orphaned {
        player.active_effects.retain(|effect| effect.card_id != card_id);
    }
    for card_id in &expired {
        remove(player, card_id, catalog);
    }
    expired
}

/// Consume one skip round from every skip-flagged effect at turn start.
///
/// Returns true when the owner must skip this turn entirely. Effects whose
/// skip budget reaches zero are removed.
pub fn consume_skip(player: &mut Player, catalog: &CardCatalog) -> bool {
    let mut must_skip = false;
    let mut spent = Vec::new();

    for effect in &mut player.active_effects {
        if effect.remaining_skip_rounds > 0 {
            must_skip = true;
            effect.remaining_skip_rounds -= 1;
            if effect.remaining_skip_rounds == 0 {
                spent.push(effect.card_id.clone());
            }
        }
    }

    for card_id in &spent {
        remove(player, card_id, catalog);
    }
    must_skip
}
