//! Fateway game core.
//!
//! Platform-agnostic simulation engine for a turn-based board game:
//! dice-driven movement over a linear track with branch points, card
//! effects, per-category scoring with multipliers and star milestones,
//! timed status effects, and delayed risk outcomes.
//!
//! The crate owns no rendering, input, audio, or persistence. Hosts
//! drive the engine through [`engine::GameEngine`] and observe it
//! through the [`hooks::GameHooks`] trait.

pub mod board;
pub mod cards;
pub mod config;
pub mod engine;
pub mod hooks;
pub mod player;
mod resolver;
pub mod risk;
pub mod rng;
pub mod score;
pub mod status;

pub use board::{Board, FieldDef, FieldReward, FieldType};
pub use cards::{CardCatalog, CardDef, CardEffect, CardKind, CardPayload};
pub use config::{ConfigError, EngineConfig, RiskCurve, WinnerPolicy};
pub use engine::{GameEngine, PendingPrompt, RollBreakdown};
pub use hooks::{FeedbackEvent, GameHooks, NullHooks, RecordingHooks};
pub use player::{Gender, Player};
pub use risk::{RiskRegistry, ScheduledRisk};
pub use rng::RngBundle;
pub use score::{Passion, PassionAmounts, PassionMultipliers, ScoreClamp, ScoreSet};
pub use status::StatusLifetime;
