//! Collaborator interfaces injected into the turn engine.
//!
//! The engine never reaches into UI code; hosts implement [`GameHooks`]
//! and receive prompt requests plus fire-and-forget feedback events.

use crate::board::FieldType;
use crate::player::Player;
use crate::score::Passion;

/// Fire-and-forget notifications for the presentation layer. The engine
/// never consumes a return value from these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    TurnEnded {
        ending: String,
        next: String,
    },
    TurnSkipped {
        skipped: String,
        next: String,
    },
    PointsGained {
        player: String,
        passion: Passion,
        delta: i32,
    },
    StarsGained {
        player: String,
        stars: u32,
    },
    FieldLanded {
        player: String,
        index: u32,
        field_type: FieldType,
        description: String,
    },
    RiskOutcome {
        player: String,
        success: bool,
    },
    PartnershipFormed {
        a: String,
        b: String,
    },
    PartnershipDissolved {
        a: String,
        b: String,
    },
    ItemReceived {
        player: String,
        item_id: String,
    },
    ItemLost {
        player: String,
        item_id: String,
    },
    StatusEffectExpired {
        player: String,
        card_id: String,
    },
    /// Opaque audio/video template names attached to a card; the core
    /// does not interpret these.
    MediaCue {
        card_id: String,
        audio: Option<String>,
        video: Option<String>,
    },
    GameEnded {
        winner: String,
    },
}

/// Host-side collaborators for prompts, minigames, and feedback.
///
/// Prompt methods return whether the host will answer asynchronously:
/// `true` keeps the engine suspended until the matching resume call
/// (`resolve_branch_choice`, `acknowledge_risk_outcome`), `false` lets
/// the engine fall back to its default resolution immediately. At most
/// one suspension is outstanding per turn.
pub trait GameHooks {
    /// A branch point was reached; ask for a safe/risk route choice.
    fn branch_choice_requested(&mut self, _player: &Player, _leftover_steps: u32) -> bool {
        false
    }

    /// A risk-checkpoint outcome is ready to display.
    fn risk_outcome_shown(&mut self, _player: &Player, _success: bool) -> bool {
        false
    }

    /// A field requires the player to enter a card id manually. Returning
    /// `true` locks input; the host answers via `apply_card_by_id` and
    /// then calls `unlock_input`.
    fn manual_card_input_requested(&mut self, _player: &Player) -> bool {
        false
    }

    /// Launch a minigame; its reward flows back as an opaque card apply.
    fn start_minigame(&mut self, _minigame_id: &str, _player: &Player) {}

    /// Open the external inventory view.
    fn show_inventory(&mut self, _player: &Player) {}

    /// Receive a feedback notification.
    fn feedback(&mut self, _event: FeedbackEvent) {}
}

/// Hook implementation that answers nothing and displays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHooks;

impl GameHooks for NullHooks {}

/// Test/diagnostic hooks that record every feedback event.
#[derive(Debug, Clone, Default)]
pub struct RecordingHooks {
    pub events: Vec<FeedbackEvent>,
    pub minigames: Vec<String>,
    /// When set, prompt requests stay suspended for manual resolution.
    pub hold_prompts: bool,
}

impl GameHooks for RecordingHooks {
    fn branch_choice_requested(&mut self, _player: &Player, _leftover_steps: u32) -> bool {
        self.hold_prompts
    }

    fn risk_outcome_shown(&mut self, _player: &Player, _success: bool) -> bool {
        self.hold_prompts
    }

    fn start_minigame(&mut self, minigame_id: &str, _player: &Player) {
        self.minigames.push(minigame_id.to_string());
    }

    fn feedback(&mut self, event: FeedbackEvent) {
        self.events.push(event);
    }
}
