//! Registry of delayed risk outcomes awaiting probabilistic resolution.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RiskCurve;
use crate::score::Passion;

/// One pending delayed outcome, keyed to a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledRisk {
    pub card_id: String,
    /// Roster index of the target player.
    pub player: usize,
    /// Fixed scoring category carried over from the scheduling context.
    pub passion_override: Option<Passion>,
    pub remaining_turns: i32,
}

/// Holds scheduled risks and decides, turn by turn, which ones fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RiskRegistry {
    entries: Vec<ScheduledRisk>,
}

impl RiskRegistry {
    /// Schedule a new delayed outcome; duration is floored at one turn.
    pub fn schedule(
        &mut self,
        card_id: &str,
        player: usize,
        passion_override: Option<Passion>,
        duration_turns: u32,
    ) {
        self.entries.push(ScheduledRisk {
            card_id: card_id.to_string(),
            player,
            passion_override,
            remaining_turns: i32::try_from(duration_turns.max(1)).unwrap_or(1),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn entries(&self) -> &[ScheduledRisk] {
        &self.entries
    }

    /// Tick every entry belonging to `player` and remove those that fire.
    ///
    /// Each tick decrements the remaining-turn counter, then draws against
    /// the escalating curve. An entry at zero remaining turns always
    /// fires, regardless of the draw.
    pub fn take_due<R>(&mut self, player: usize, curve: &RiskCurve, rng: &mut R) -> Vec<ScheduledRisk>
    where
        R: Rng + ?Sized,
    {
        let mut due = Vec::new();
        let mut index = 0;
        while index < self.entries.len() {
            if self.entries[index].player != player {
                index += 1;
                continue;
            }
            let entry = &mut self.entries[index];
            entry.remaining_turns -= 1;
            let probability = curve.probability(entry.remaining_turns);
            let draw = rng.r#gen::<f32>();
            if draw <= probability || entry.remaining_turns <= 0 {
                due.push(self.entries.remove(index));
            } else {
                index += 1;
            }
        }
        due
    }

    /// Drop entries whose target index is no longer valid for the roster.
    pub fn retain_players(&mut self, roster_len: usize) {
        self.entries.retain(|entry| entry.player < roster_len);
    }
}
