//! Card definitions and the immutable card catalog.
//!
//! Cards are a tagged union: a common header (identity, primary effect,
//! points payload, status lifetime, media cues) plus a per-kind payload
//! carrying only the fields that kind actually uses.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::score::{Passion, PassionAmounts, PassionMultipliers};
use crate::status::StatusLifetime;

/// Card category, implied by the payload variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Event,
    Item,
    Field,
}

/// Primary effect dispatched by the card resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardEffect {
    GivePoints,
    GiveItem,
    TakeItem,
    StartMinigame,
    ScheduleRiskOutcome,
    HelpLastPlace,
    ShowInventory,
    /// Reserved extension point with no built-in behavior.
    Custom,
}

/// Flat single-passion point grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePoints {
    pub delta: i32,
    /// Force the grant into the player's main passion, ignoring any
    /// field-specific override.
    #[serde(default)]
    pub to_main_passion: bool,
    #[serde(default = "default_passion")]
    pub passion: Passion,
}

const fn default_passion() -> Passion {
    Passion::Yellow
}

/// Point payload shared by points-capable effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PointsSpec {
    #[serde(default)]
    pub simple: Option<SimplePoints>,
    #[serde(default)]
    pub multi: Option<PassionAmounts>,
    /// Extra flat points into the player's main passion.
    #[serde(default)]
    pub main_delta: i32,
}

impl PointsSpec {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.simple.is_none() && self.multi.is_none() && self.main_delta == 0
    }
}

/// Who receives an item distributed by an event's secondary effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionTarget {
    /// The next non-finished player in turn order after the acting player.
    NextPlayer,
    /// Every non-finished player.
    AllPlayers,
    /// Every non-finished player currently in a partnership.
    AllPartnered,
    /// The acting player's partner, if present.
    OwnPartner,
}

/// Item handed out as part of an event's secondary effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDistribution {
    pub item_id: String,
    pub target: DistributionTarget,
}

/// Secondary effects applied after an event card's primary effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SecondaryEffects {
    /// Dissolve every partnership on the board.
    #[serde(default)]
    pub reset_all_relationships: bool,
    /// Dissolve only the acting player's partnership.
    #[serde(default)]
    pub reset_own_relationship: bool,
    #[serde(default)]
    pub distribute_item: Option<ItemDistribution>,
    /// Main-passion bonus for every partnered, non-finished player.
    #[serde(default)]
    pub partnered_bonus: i32,
    /// Main-passion bonus for the acting player and their partner.
    #[serde(default)]
    pub couple_bonus: i32,
}

impl SecondaryEffects {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.reset_all_relationships
            && !self.reset_own_relationship
            && self.distribute_item.is_none()
            && self.partnered_bonus == 0
            && self.couple_bonus == 0
    }
}

/// Payload fields specific to event cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EventPayload {
    #[serde(default)]
    pub minigame_id: Option<String>,
    /// Item referenced by give-item or take-item effects carried on an
    /// event card.
    #[serde(default)]
    pub target_item_id: Option<String>,
    /// Turns over which a scheduled risk outcome may trigger.
    #[serde(default = "default_risk_duration")]
    pub risk_duration_turns: u32,
    #[serde(default)]
    pub secondary: SecondaryEffects,
}

const fn default_risk_duration() -> u32 {
    3
}

/// Payload fields specific to item cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemPayload {
    #[serde(default)]
    pub tags: Vec<String>,
    /// A player can hold at most one copy of this item.
    #[serde(default)]
    pub unique_per_player: bool,
    /// Passion points granted when the holder crosses the finish line.
    #[serde(default)]
    pub redeem_scores: Option<PassionAmounts>,
    #[serde(default)]
    pub score_multipliers: Option<PassionMultipliers>,
    /// Passive points granted on every roll while held.
    #[serde(default)]
    pub per_roll_bonus: Option<PassionAmounts>,
    /// Flat bonus added to every roll while held.
    #[serde(default)]
    pub dice_bonus: i32,
    /// Bonus added when the base roll is odd.
    #[serde(default)]
    pub odd_roll_bonus: i32,
    /// Bonus added when the base roll is even.
    #[serde(default)]
    pub even_roll_bonus: i32,
}

/// Payload fields specific to field cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FieldPayload {
    /// Landing prompts a manual card scan instead of applying directly.
    #[serde(default)]
    pub triggers_manual_scan: bool,
    /// Landing launches this minigame instead of applying directly.
    #[serde(default)]
    pub minigame_id: Option<String>,
}

/// Per-kind payload of a card definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardPayload {
    Event(EventPayload),
    Item(ItemPayload),
    Field(FieldPayload),
}

/// Immutable card definition, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub effect: CardEffect,
    #[serde(default)]
    pub points: PointsSpec,
    #[serde(default)]
    pub lifetime: StatusLifetime,
    /// Show this card in the player's status-effect list when applied.
    #[serde(default)]
    pub track_as_status: bool,
    #[serde(default)]
    pub audio_template: Option<String>,
    #[serde(default)]
    pub video_template: Option<String>,
    #[serde(flatten)]
    pub payload: CardPayload,
}

impl CardDef {
    #[must_use]
    pub const fn kind(&self) -> CardKind {
        match self.payload {
            CardPayload::Event(_) => CardKind::Event,
            CardPayload::Item(_) => CardKind::Item,
            CardPayload::Field(_) => CardKind::Field,
        }
    }

    #[must_use]
    pub const fn as_event(&self) -> Option<&EventPayload> {
        match &self.payload {
            CardPayload::Event(payload) => Some(payload),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_item(&self) -> Option<&ItemPayload> {
        match &self.payload {
            CardPayload::Item(payload) => Some(payload),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_field(&self) -> Option<&FieldPayload> {
        match &self.payload {
            CardPayload::Field(payload) => Some(payload),
            _ => None,
        }
    }

    /// Whether applying this card should create a status-effect record.
    #[must_use]
    pub fn is_trackable(&self) -> bool {
        self.track_as_status || !self.lifetime.is_trivial()
    }

    /// Minigame launched by this card, for either kind that can carry one.
    #[must_use]
    pub fn minigame_id(&self) -> Option<&str> {
        match &self.payload {
            CardPayload::Event(payload) => payload.minigame_id.as_deref(),
            CardPayload::Field(payload) => payload.minigame_id.as_deref(),
            CardPayload::Item(_) => None,
        }
    }
}

/// Container for all card definitions, with id lookups and random draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CardCatalog {
    #[serde(default)]
    pub cards: Vec<CardDef>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl CardCatalog {
    /// Create an empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from pre-parsed definitions.
    #[must_use]
    pub fn from_cards(cards: Vec<CardDef>) -> Self {
        let mut catalog = Self {
            cards,
            index: HashMap::new(),
        };
        catalog.rebuild_index();
        catalog
    }

    /// Load a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into card definitions.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut catalog: Self = serde_json::from_str(json)?;
        catalog.rebuild_index();
        Ok(catalog)
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .cards
            .iter()
            .enumerate()
            .map(|(idx, card)| (card.id.clone(), idx))
            .collect();
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CardDef> {
        let trimmed = id.trim();
        self.index.get(trimmed).map(|idx| &self.cards[*idx])
    }

    /// Look up an item card, returning its item payload alongside.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<(&CardDef, &ItemPayload)> {
        let card = self.get(id)?;
        let payload = card.as_item()?;
        Some((card, payload))
    }

    #[must_use]
    pub fn draw_random_event<R>(&self, rng: &mut R) -> Option<&CardDef>
    where
        R: Rng + ?Sized,
    {
        self.draw_random_of_kind(CardKind::Event, rng)
    }

    #[must_use]
    pub fn draw_random_item<R>(&self, rng: &mut R) -> Option<&CardDef>
    where
        R: Rng + ?Sized,
    {
        self.draw_random_of_kind(CardKind::Item, rng)
    }

    fn draw_random_of_kind<R>(&self, kind: CardKind, rng: &mut R) -> Option<&CardDef>
    where
        R: Rng + ?Sized,
    {
        let pool: Vec<&CardDef> = self
            .cards
            .iter()
            .filter(|card| card.kind() == kind)
            .collect();
        if pool.is_empty() {
            return None;
        }
        let choice = rng.gen_range(0..pool.len());
        Some(pool[choice])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngBundle;

    fn sample_catalog_json() -> &'static str {
        r#"{
            "cards": [
                {
                    "id": "ev_windfall",
                    "title": "Windfall",
                    "effect": "give_points",
                    "kind": "event",
                    "points": { "simple": { "delta": 15, "passion": "green" } }
                },
                {
                    "id": "it_lucky_coin",
                    "title": "Lucky Coin",
                    "effect": "give_item",
                    "kind": "item",
                    "unique_per_player": true,
                    "dice_bonus": 1
                },
                {
                    "id": "fd_scan",
                    "title": "Scan Station",
                    "effect": "custom",
                    "kind": "field",
                    "triggers_manual_scan": true
                }
            ]
        }"#
    }

    #[test]
    fn catalog_parses_tagged_payloads() {
        let catalog = CardCatalog::from_json(sample_catalog_json()).unwrap();
        assert_eq!(catalog.cards.len(), 3);

        let event = catalog.get("ev_windfall").unwrap();
        assert_eq!(event.kind(), CardKind::Event);
        assert_eq!(event.points.simple.unwrap().delta, 15);

        let (item, payload) = catalog.item("it_lucky_coin").unwrap();
        assert_eq!(item.effect, CardEffect::GiveItem);
        assert!(payload.unique_per_player);
        assert_eq!(payload.dice_bonus, 1);

        let field = catalog.get("fd_scan").unwrap();
        assert!(field.as_field().unwrap().triggers_manual_scan);
    }

    #[test]
    fn lookup_trims_whitespace_and_misses_cleanly() {
        let catalog = CardCatalog::from_json(sample_catalog_json()).unwrap();
        assert!(catalog.get("  ev_windfall ").is_some());
        assert!(catalog.get("nonexistent").is_none());
        assert!(catalog.item("ev_windfall").is_none());
    }

    #[test]
    fn random_draws_respect_kind_pools() {
        let catalog = CardCatalog::from_json(sample_catalog_json()).unwrap();
        let rng = RngBundle::from_user_seed(3);
        for _ in 0..8 {
            let event = catalog.draw_random_event(&mut *rng.draw()).unwrap();
            assert_eq!(event.kind(), CardKind::Event);
            let item = catalog.draw_random_item(&mut *rng.draw()).unwrap();
            assert_eq!(item.kind(), CardKind::Item);
        }
    }

    #[test]
    fn empty_catalog_draws_nothing() {
        let catalog = CardCatalog::empty();
        let rng = RngBundle::from_user_seed(3);
        assert!(catalog.draw_random_event(&mut *rng.draw()).is_none());
        assert!(catalog.draw_random_item(&mut *rng.draw()).is_none());
    }

    #[test]
    fn trackable_follows_flag_or_lifetime() {
        let catalog = CardCatalog::from_json(sample_catalog_json()).unwrap();
        assert!(!catalog.get("ev_windfall").unwrap().is_trackable());

        let mut card = catalog.get("ev_windfall").unwrap().clone();
        card.track_as_status = true;
        assert!(card.is_trackable());
    }
}
