//! Board topology: field definitions and stop-field queries.

use serde::{Deserialize, Serialize};

use crate::score::Passion;

/// What kind of field a board index represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Neutral,
    Event,
    ItemShop,
    Minigame,
    Crossroad,
    Finish,
}

/// Flat passion reward granted for landing on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReward {
    pub passion: Passion,
    pub amount: i32,
}

/// Definition of one special board field. Fields without a definition are
/// plain neutral fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub index: u32,
    #[serde(default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub description: String,
    /// Landing reward, independent of any configured card.
    #[serde(default)]
    pub reward: Option<FieldReward>,
    #[serde(default)]
    pub safe_event_card: Option<String>,
    #[serde(default)]
    pub risk_event_card: Option<String>,
    #[serde(default)]
    pub safe_item_card: Option<String>,
    #[serde(default)]
    pub risk_item_card: Option<String>,
    #[serde(default)]
    pub safe_field_card: Option<String>,
    #[serde(default)]
    pub risk_field_card: Option<String>,
    /// Minigame launched by landing on this field, when it is a minigame
    /// field without a card naming one.
    #[serde(default)]
    pub minigame_id: Option<String>,
    /// Landing prompts the player to enter a card id manually.
    #[serde(default)]
    pub requires_manual_input: bool,
    /// This field evaluates the outcome of an earlier risk-route choice.
    #[serde(default)]
    pub is_risk_checkpoint: bool,
}

impl FieldDef {
    #[must_use]
    pub fn new(index: u32, field_type: FieldType) -> Self {
        Self {
            index,
            field_type,
            description: String::new(),
            reward: None,
            safe_event_card: None,
            risk_event_card: None,
            safe_item_card: None,
            risk_item_card: None,
            safe_field_card: None,
            risk_field_card: None,
            minigame_id: None,
            requires_manual_input: false,
            is_risk_checkpoint: false,
        }
    }

    /// Route-dependent event card; the risk slot falls back to the safe one.
    #[must_use]
    pub fn event_card_for(&self, on_risk_route: bool) -> Option<&str> {
        route_slot(on_risk_route, &self.risk_event_card, &self.safe_event_card)
    }

    /// Route-dependent item card; the risk slot falls back to the safe one.
    #[must_use]
    pub fn item_card_for(&self, on_risk_route: bool) -> Option<&str> {
        route_slot(on_risk_route, &self.risk_item_card, &self.safe_item_card)
    }

    /// Route-dependent field card; the risk slot falls back to the safe one.
    #[must_use]
    pub fn field_card_for(&self, on_risk_route: bool) -> Option<&str> {
        route_slot(on_risk_route, &self.risk_field_card, &self.safe_field_card)
    }
}

fn route_slot<'a>(
    on_risk_route: bool,
    risk: &'a Option<String>,
    safe: &'a Option<String>,
) -> Option<&'a str> {
    if on_risk_route && risk.is_some() {
        risk.as_deref()
    } else {
        safe.as_deref()
    }
}

/// Kind of field that interrupts movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKind {
    /// Safe/risk branch point requiring a route choice.
    Branch,
    /// Risk-resolution checkpoint ("Last Crossroads").
    RiskCheckpoint,
}

/// A stop-worthy field found within a movement range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopField {
    pub index: u32,
    pub kind: StopKind,
}

/// Linear board of indexed fields. Only special fields carry definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub total_fields: u32,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl Board {
    /// Board with no special fields beyond the implicit finish.
    #[must_use]
    pub const fn plain(total_fields: u32) -> Self {
        Self {
            total_fields,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub const fn from_fields(total_fields: u32, fields: Vec<FieldDef>) -> Self {
        Self {
            total_fields,
            fields,
        }
    }

    /// Load a board layout from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a board layout.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Index of the finish field.
    #[must_use]
    pub const fn finish_index(&self) -> u32 {
        self.total_fields.saturating_sub(1)
    }

    #[must_use]
    pub fn field_definition_at(&self, index: u32) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.index == index)
    }

    /// Field type at an index; positions at or past the last field count
    /// as the finish, undefined positions as neutral.
    #[must_use]
    pub fn field_type_at(&self, index: u32) -> FieldType {
        if let Some(field) = self.field_definition_at(index) {
            return field.field_type;
        }
        if index >= self.finish_index() {
            FieldType::Finish
        } else {
            FieldType::Neutral
        }
    }

    /// First stop-worthy field strictly after `start` and at or before
    /// `target`. Nearness decides; a branch point and a risk checkpoint
    /// never share an index.
    #[must_use]
    pub fn first_stop_in_range(&self, start: u32, target: u32) -> Option<StopField> {
        for index in (start + 1)..=target {
            if let Some(field) = self.field_definition_at(index) {
                if field.field_type == FieldType::Crossroad {
                    return Some(StopField {
                        index,
                        kind: StopKind::Branch,
                    });
                }
                if field.is_risk_checkpoint {
                    return Some(StopField {
                        index,
                        kind: StopKind::RiskCheckpoint,
                    });
                }
            }
        }
        None
    }
}
