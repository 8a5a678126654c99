//! Turn and movement resolution engine.
//!
//! The engine owns the roster, board, catalog, RNG, and scheduled-risk
//! registry for the duration of one game. It is single-threaded and
//! turn-driven; prompts that need human input suspend the turn at an
//! explicit pending point and are resumed through `resolve_branch_choice`
//! or `acknowledge_risk_outcome`. While a suspension (or an external UI
//! lock) is outstanding, rolls and turn ends are rejected silently.

use rand::Rng;

use crate::board::{Board, FieldDef, FieldType, StopKind};
use crate::cards::CardCatalog;
use crate::config::{ConfigError, EngineConfig, WinnerPolicy};
use crate::hooks::{FeedbackEvent, GameHooks};
use crate::player::Player;
use crate::risk::RiskRegistry;
use crate::rng::RngBundle;
use crate::score::{Passion, rounded_points, stars_crossed};
use crate::status;

/// Breakdown of the most recent roll, exposed for the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RollBreakdown {
    /// Unmodified die value.
    pub base: i32,
    /// Sum of flat and parity item bonuses.
    pub bonus: i32,
    /// Movement actually applied, floored at zero.
    pub final_roll: i32,
}

/// The single outstanding suspension point, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingPrompt {
    /// Waiting for a safe/risk route choice at a branch point.
    BranchChoice { player: usize, leftover: u32 },
    /// Waiting for the risk-checkpoint outcome popup to close.
    RiskAck { player: usize, leftover: u32 },
}

/// Root orchestrator for a running game.
pub struct GameEngine<H: GameHooks> {
    pub(crate) cfg: EngineConfig,
    pub(crate) board: Board,
    pub(crate) catalog: CardCatalog,
    pub(crate) players: Vec<Player>,
    pub(crate) current: usize,
    pub(crate) first_finisher: Option<usize>,
    pub(crate) risks: RiskRegistry,
    pub(crate) pending: Option<PendingPrompt>,
    pub(crate) external_lock: bool,
    pub(crate) game_over_announced: bool,
    pub(crate) last_roll: RollBreakdown,
    pub(crate) seed: u64,
    pub(crate) rng: RngBundle,
    pub(crate) hooks: H,
}

impl<H: GameHooks> GameEngine<H> {
    /// Construct an engine and start the first player's turn.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when the configuration violates its
    /// documented bounds.
    pub fn new(
        cfg: EngineConfig,
        board: Board,
        catalog: CardCatalog,
        players: Vec<Player>,
        seed: u64,
        hooks: H,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut engine = Self {
            cfg,
            board,
            catalog,
            players,
            current: 0,
            first_finisher: None,
            risks: RiskRegistry::default(),
            pending: None,
            external_lock: false,
            game_over_announced: false,
            last_roll: RollBreakdown::default(),
            seed,
            rng: RngBundle::from_user_seed(seed),
            hooks,
        };
        engine.clear_all_partnerships();
        engine.begin_turn();
        Ok(engine)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, idx: usize) -> Option<&Player> {
        self.players.get(idx)
    }

    /// Index of the player whose turn it is. Falls back to zero when the
    /// stored index is out of range, so the turn loop never gets stuck.
    #[must_use]
    pub fn current_index(&self) -> usize {
        if self.current < self.players.len() {
            self.current
        } else {
            0
        }
    }

    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_index())
    }

    #[must_use]
    pub const fn last_roll(&self) -> RollBreakdown {
        self.last_roll
    }

    #[must_use]
    pub const fn pending_prompt(&self) -> Option<PendingPrompt> {
        self.pending
    }

    #[must_use]
    pub const fn is_input_locked(&self) -> bool {
        self.pending.is_some() || self.external_lock
    }

    /// Lock input while a host-owned popup is open.
    pub const fn lock_input(&mut self) {
        self.external_lock = true;
    }

    pub const fn unlock_input(&mut self) {
        self.external_lock = false;
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn scheduled_risks(&self) -> &RiskRegistry {
        &self.risks
    }

    #[must_use]
    pub const fn hooks(&self) -> &H {
        &self.hooks
    }

    pub const fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Player indices sorted by descending aggregate total score.
    #[must_use]
    pub fn rankings(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.players.len()).collect();
        order.sort_by_key(|idx| std::cmp::Reverse(self.players[*idx].total_score()));
        order
    }

    /// Player with the lowest board position, first found on ties.
    #[must_use]
    pub fn last_place_index(&self) -> Option<usize> {
        let mut last: Option<usize> = None;
        for (idx, player) in self.players.iter().enumerate() {
            match last {
                None => last = Some(idx),
                Some(best) if player.position < self.players[best].position => last = Some(idx),
                Some(_) => {}
            }
        }
        last
    }

    /// True exactly when every player has finished.
    #[must_use]
    pub fn game_ended(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.finished)
    }

    /// Winner under the configured policy; first found on ties.
    #[must_use]
    pub fn winner_index(&self) -> Option<usize> {
        let mut winner: Option<(usize, i32)> = None;
        for (idx, player) in self.players.iter().enumerate() {
            let score = match self.cfg.winner_policy {
                WinnerPolicy::TotalScore => player.total_score(),
                WinnerPolicy::MainPassion => player.scores.get(player.passion),
            };
            match winner {
                Some((_, best)) if score <= best => {}
                _ => winner = Some((idx, score)),
            }
        }
        winner.map(|(idx, _)| idx)
    }

    // ------------------------------------------------------------------
    // Turn flow
    // ------------------------------------------------------------------

    /// Roll the die for the current player and run the full movement and
    /// field-resolution sequence. Precondition violations (locked input,
    /// finished player, no rolls left) are rejected silently.
    pub fn roll_for_current_player(&mut self) {
        if self.is_input_locked() {
            log::debug!("roll rejected: input locked");
            return;
        }
        if self.players.is_empty() {
            log::warn!("roll rejected: empty roster");
            return;
        }
        self.current = self.current_index();
        let idx = self.current;
        if self.players[idx].finished {
            log::debug!("roll rejected: {} already finished", self.players[idx].name);
            return;
        }
        if self.players[idx].available_rolls == 0 {
            log::debug!("roll rejected: {} has no rolls left", self.players[idx].name);
            return;
        }
        self.handle_roll(idx);
    }

    fn handle_roll(&mut self, idx: usize) {
        let base = self
            .rng
            .dice()
            .gen_range(self.cfg.dice_min..=self.cfg.dice_max);
        let flat = self.dice_flat_bonus(idx);
        let parity = self.dice_parity_bonus(idx, base);
        let final_roll = (base + flat + parity).max(0);
        self.last_roll = RollBreakdown {
            base,
            bonus: flat + parity,
            final_roll,
        };
        log::debug!(
            "{} rolled {base} + bonus {} = {final_roll}",
            self.players[idx].name,
            flat + parity
        );

        // Rolling a bare 1 ends a partnership, before any movement.
        if base == 1 && self.players[idx].has_partner() {
            self.clear_partner(idx);
        }

        self.apply_per_roll_bonuses(idx);
        let expired = status::on_roll(&mut self.players[idx], base, &self.catalog);
        self.emit_expirations(idx, expired);

        self.players[idx].available_rolls -= 1;

        if final_roll > 0 {
            self.move_with_branch_check(idx, final_roll.unsigned_abs());
        } else {
            self.process_scheduled_risks(idx);
            self.check_game_end();
        }
    }

    /// End the current player's turn and rotate to the next active player.
    /// Rejected while input is locked or rolls remain.
    pub fn try_end_turn(&mut self) {
        if self.is_input_locked() {
            log::debug!("end turn rejected: input locked");
            return;
        }
        if self.players.is_empty() {
            return;
        }
        self.current = self.current_index();
        let idx = self.current;
        if !self.players[idx].finished && self.players[idx].available_rolls > 0 {
            log::debug!(
                "end turn rejected: {} still has {} roll(s)",
                self.players[idx].name,
                self.players[idx].available_rolls
            );
            return;
        }

        let expired = status::on_turn_end(&mut self.players[idx], &self.catalog);
        self.emit_expirations(idx, expired);

        if self.check_game_end() {
            return;
        }

        let ending = self.players[idx].name.clone();
        self.advance_index();
        let next = self.players[self.current].name.clone();
        self.hooks.feedback(FeedbackEvent::TurnEnded { ending, next });
        self.begin_turn();
    }

    /// Restore every player and the engine to a fresh game start.
    pub fn reset_game(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        self.current = 0;
        self.first_finisher = None;
        self.risks.clear();
        self.pending = None;
        self.external_lock = false;
        self.game_over_announced = false;
        self.last_roll = RollBreakdown::default();
        self.begin_turn();
        log::debug!("game reset complete");
    }

    /// Deterministically reseed the RNG streams.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = RngBundle::from_user_seed(seed);
    }

    /// Grant rolls to the current player, consuming forced skips first.
    fn begin_turn(&mut self) {
        let len = self.players.len();
        if len == 0 {
            return;
        }
        // Bound covers a full rotation plus every outstanding skip round.
        let outstanding_skips: usize = self
            .players
            .iter()
            .flat_map(|p| p.active_effects.iter())
            .map(|e| e.remaining_skip_rounds as usize)
            .sum();
        let bound = len + outstanding_skips + 1;

        for _ in 0..bound {
            if self.players.iter().all(|p| p.finished) {
                return;
            }
            let idx = self.current_index();
            self.current = idx;
            if self.players[idx].finished {
                self.advance_index();
                continue;
            }
            if status::consume_skip(&mut self.players[idx], &self.catalog) {
                let skipped = self.players[idx].name.clone();
                log::debug!("{skipped} skips this entire turn");
                self.advance_index();
                let next = self.players[self.current].name.clone();
                self.hooks
                    .feedback(FeedbackEvent::TurnSkipped { skipped, next });
                continue;
            }
            self.players[idx].available_rolls = self.cfg.rolls_per_turn.max(1);
            self.last_roll = RollBreakdown::default();
            log::debug!(
                "turn started for {} ({} roll(s))",
                self.players[idx].name,
                self.players[idx].available_rolls
            );
            return;
        }
        log::warn!("turn rotation safeguard tripped");
    }

    /// Advance the current index to the next non-finished player, with a
    /// wrap-around safeguard when everyone has finished.
    fn advance_index(&mut self) {
        let len = self.players.len();
        if len == 0 {
            return;
        }
        let start = self.current_index();
        self.current = start;
        let mut safeguard = 0;
        loop {
            self.current = (self.current + 1) % len;
            safeguard += 1;
            if safeguard > len + 1 {
                break;
            }
            if !self.players[self.current].finished || self.current == start {
                break;
            }
        }
    }

    /// Next non-finished player after `idx` in turn order, if any.
    #[must_use]
    pub(crate) fn next_active_after(&self, idx: usize) -> Option<usize> {
        let len = self.players.len();
        if len == 0 || idx >= len {
            return None;
        }
        let mut next = idx;
        for _ in 0..len {
            next = (next + 1) % len;
            if next == idx {
                return None;
            }
            if !self.players[next].finished {
                return Some(next);
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    fn move_with_branch_check(&mut self, idx: usize, steps: u32) {
        if steps == 0 {
            return;
        }
        let start = self.players[idx].position;
        let target = start + steps;
        log::debug!(
            "{} moving from {start} to {target}",
            self.players[idx].name
        );

        if let Some(stop) = self.board.first_stop_in_range(start, target) {
            let leftover = target - stop.index;
            let player = &mut self.players[idx];
            player.position = stop.index;
            player.pending_movement = leftover;
            match stop.kind {
                StopKind::Branch => {
                    self.players[idx].on_risk_route = false;
                    self.pending = Some(PendingPrompt::BranchChoice {
                        player: idx,
                        leftover,
                    });
                    if !self
                        .hooks
                        .branch_choice_requested(&self.players[idx], leftover)
                    {
                        log::debug!("no branch prompt handler; defaulting to safe route");
                        self.resolve_branch_choice(false);
                    }
                }
                StopKind::RiskCheckpoint => self.handle_risk_checkpoint(idx),
            }
            return;
        }

        self.players[idx].position = target;
        self.process_scheduled_risks(idx);
        self.resolve_field(idx);
        self.check_game_end();
    }

    /// Resume a suspended branch choice with the chosen route.
    /// Ignored when no branch choice is pending.
    pub fn resolve_branch_choice(&mut self, chose_risk: bool) {
        let Some(PendingPrompt::BranchChoice { player: idx, leftover }) = self.pending else {
            log::debug!("branch choice ignored: none pending");
            return;
        };
        self.pending = None;
        {
            let player = &mut self.players[idx];
            player.on_risk_route = chose_risk;
            player.pending_movement = 0;
        }
        log::debug!(
            "{} chose the {} route",
            self.players[idx].name,
            if chose_risk { "risk" } else { "safe" }
        );

        self.resolve_field(idx);

        if leftover > 0 {
            self.move_with_branch_check(idx, leftover);
        } else {
            self.process_scheduled_risks(idx);
            self.check_game_end();
        }
    }

    fn handle_risk_checkpoint(&mut self, idx: usize) {
        let leftover = self.players[idx].pending_movement;

        if !self.players[idx].on_risk_route {
            // Safe-route players pass through without a popup.
            self.continue_after_checkpoint(idx, leftover);
            return;
        }

        let success = self.rng.chance().r#gen::<f32>() < self.cfg.risk_checkpoint_chance;
        log::debug!(
            "{} risk outcome: {}",
            self.players[idx].name,
            if success { "success" } else { "failed" }
        );
        if success {
            let main = self.players[idx].passion;
            let bonus = self.cfg.risk_checkpoint_bonus;
            self.grant_points(idx, main, bonus);
        }
        self.hooks.feedback(FeedbackEvent::RiskOutcome {
            player: self.players[idx].name.clone(),
            success,
        });

        self.pending = Some(PendingPrompt::RiskAck {
            player: idx,
            leftover,
        });
        if !self.hooks.risk_outcome_shown(&self.players[idx], success) {
            self.acknowledge_risk_outcome();
        }
    }

    /// Resume after the host closed the risk-outcome popup.
    /// Ignored when no acknowledgment is pending.
    pub fn acknowledge_risk_outcome(&mut self) {
        let Some(PendingPrompt::RiskAck { player: idx, leftover }) = self.pending else {
            log::debug!("risk acknowledgment ignored: none pending");
            return;
        };
        self.pending = None;
        self.players[idx].on_risk_route = false;
        self.continue_after_checkpoint(idx, leftover);
    }

    fn continue_after_checkpoint(&mut self, idx: usize, leftover: u32) {
        self.players[idx].pending_movement = 0;
        if leftover > 0 {
            self.move_with_branch_check(idx, leftover);
        } else {
            self.process_scheduled_risks(idx);
            self.check_game_end();
        }
    }

    // ------------------------------------------------------------------
    // Field resolution
    // ------------------------------------------------------------------

    fn resolve_field(&mut self, idx: usize) {
        let position = self.players[idx].position;
        let field_type = self.board.field_type_at(position);
        let field = self.board.field_definition_at(position).cloned();
        log::debug!(
            "{} landed on a {field_type:?} field (index {position})",
            self.players[idx].name
        );

        if let Some(def) = &field
            && def.is_risk_checkpoint
        {
            // Checkpoints are evaluated during movement, not on landing.
            return;
        }

        self.hooks.feedback(FeedbackEvent::FieldLanded {
            player: self.players[idx].name.clone(),
            index: position,
            field_type,
            description: field
                .as_ref()
                .map(|def| def.description.clone())
                .unwrap_or_default(),
        });

        match field_type {
            FieldType::Neutral => self.handle_neutral_field(idx, field.as_ref()),
            FieldType::Event => self.handle_event_field(idx, field.as_ref()),
            FieldType::ItemShop => self.handle_item_shop_field(idx, field.as_ref()),
            FieldType::Minigame => {
                let minigame = field
                    .as_ref()
                    .and_then(|def| def.minigame_id.as_deref())
                    .unwrap_or("default")
                    .to_string();
                self.hooks.start_minigame(&minigame, &self.players[idx]);
            }
            FieldType::Crossroad => {
                // Branching already happened during movement.
            }
            FieldType::Finish => self.handle_finish(idx),
        }

        if let Some(def) = &field
            && def.requires_manual_input
            && !self.players[idx].finished
        {
            self.request_manual_card_input(idx);
        }
    }

    fn handle_neutral_field(&mut self, idx: usize, field: Option<&FieldDef>) {
        let Some(def) = field else { return };
        let on_risk = self.players[idx].on_risk_route;

        if let Some(card_id) = def.field_card_for(on_risk) {
            match self.catalog.get(card_id).cloned() {
                None => log::warn!("field {} references unknown card '{card_id}'", def.index),
                Some(card) => {
                    let manual_scan = card
                        .as_field()
                        .is_some_and(|payload| payload.triggers_manual_scan);
                    if manual_scan {
                        self.request_manual_card_input(idx);
                    } else if let Some(minigame) = card.minigame_id().map(str::to_string) {
                        self.hooks.start_minigame(&minigame, &self.players[idx]);
                    } else {
                        let passion_override = def.reward.map(|reward| reward.passion);
                        self.apply_card(&card, idx, passion_override);
                    }
                }
            }
        }

        // Field scoring reward, independent of any configured card.
        if let Some(reward) = def.reward
            && reward.amount != 0
        {
            self.grant_points(idx, reward.passion, reward.amount);
        }
    }

    fn handle_event_field(&mut self, idx: usize, field: Option<&FieldDef>) {
        let on_risk = self.players[idx].on_risk_route;
        let configured = field
            .and_then(|def| def.event_card_for(on_risk))
            .and_then(|card_id| {
                let found = self.catalog.get(card_id).cloned();
                if found.is_none() {
                    log::warn!("event field references unknown card '{card_id}'");
                }
                found
            });
        let card = match configured {
            Some(card) => Some(card),
            None => self.catalog.draw_random_event(&mut *self.rng.draw()).cloned(),
        };
        let Some(card) = card else {
            log::warn!("no event cards available to draw");
            return;
        };
        let passion_override = field.and_then(|def| def.reward).map(|reward| reward.passion);
        self.apply_card(&card, idx, passion_override);
    }

    fn handle_item_shop_field(&mut self, idx: usize, field: Option<&FieldDef>) {
        let on_risk = self.players[idx].on_risk_route;
        let configured = field
            .and_then(|def| def.item_card_for(on_risk))
            .and_then(|card_id| {
                let found = self.catalog.get(card_id).cloned();
                if found.is_none() {
                    log::warn!("item shop references unknown card '{card_id}'");
                }
                found
            });
        let card = match configured {
            Some(card) => Some(card),
            None => self.catalog.draw_random_item(&mut *self.rng.draw()).cloned(),
        };
        let Some(card) = card else {
            log::warn!("no item cards available to draw");
            return;
        };
        self.apply_card(&card, idx, None);
    }

    /// Finish handling; idempotent for players who already finished.
    fn handle_finish(&mut self, idx: usize) {
        if self.players[idx].finished {
            return;
        }
        log::debug!("{} reached the finish", self.players[idx].name);
        self.players[idx].finished = true;
        self.players[idx].available_rolls = 0;

        if self.players[idx].has_partner() {
            self.clear_partner(idx);
        }

        let finish = self.board.finish_index();
        if self.players[idx].position > finish {
            self.players[idx].position = finish;
        }

        if self.first_finisher.is_none() {
            self.first_finisher = Some(idx);
            let main = self.players[idx].passion;
            let main_score = self.players[idx].scores.get(main);
            let bonus = rounded_points(main_score, self.cfg.first_finish_bonus_ratio);
            if bonus > 0 {
                self.grant_points(idx, main, bonus);
            }
        }

        self.redeem_and_clear(idx);
    }

    /// Convert redeemable items into points, then drop every item and
    /// status effect the finisher still carries.
    fn redeem_and_clear(&mut self, idx: usize) {
        let mut grants: Vec<(Passion, i32)> = Vec::new();
        for item_id in &self.players[idx].inventory {
            let Some((_, payload)) = self.catalog.item(item_id) else {
                continue;
            };
            let Some(redeem) = payload.redeem_scores else {
                continue;
            };
            for passion in Passion::ALL {
                let amount = redeem.amount(passion);
                if amount != 0 {
                    grants.push((passion, amount));
                }
            }
        }
        for (passion, amount) in grants {
            self.grant_points(idx, passion, amount);
        }

        let player = &mut self.players[idx];
        player.inventory.clear();
        player.status_cards.clear();
        player.active_effects.clear();
    }

    fn request_manual_card_input(&mut self, idx: usize) {
        if self.external_lock {
            return;
        }
        log::debug!("manual card input required for {}", self.players[idx].name);
        if self.hooks.manual_card_input_requested(&self.players[idx]) {
            self.external_lock = true;
        }
    }

    fn check_game_end(&mut self) -> bool {
        if !self.game_ended() {
            return false;
        }
        if !self.game_over_announced {
            self.game_over_announced = true;
            if let Some(winner) = self.winner_index() {
                let name = self.players[winner].name.clone();
                log::debug!("game over; winner: {name}");
                self.hooks.feedback(FeedbackEvent::GameEnded { winner: name });
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Dice and item modifiers
    // ------------------------------------------------------------------

    fn dice_flat_bonus(&self, idx: usize) -> i32 {
        self.players[idx]
            .inventory
            .iter()
            .filter_map(|item_id| self.catalog.item(item_id))
            .map(|(_, payload)| payload.dice_bonus)
            .sum()
    }

    fn dice_parity_bonus(&self, idx: usize, base_roll: i32) -> i32 {
        let is_odd = base_roll % 2 != 0;
        self.players[idx]
            .inventory
            .iter()
            .filter_map(|item_id| self.catalog.item(item_id))
            .map(|(_, payload)| {
                if is_odd {
                    payload.odd_roll_bonus
                } else {
                    payload.even_roll_bonus
                }
            })
            .sum()
    }

    fn apply_per_roll_bonuses(&mut self, idx: usize) {
        let mut grants: Vec<(Passion, i32)> = Vec::new();
        for item_id in &self.players[idx].inventory {
            let Some((_, payload)) = self.catalog.item(item_id) else {
                continue;
            };
            let Some(bonus) = payload.per_roll_bonus else {
                continue;
            };
            for passion in Passion::ALL {
                let amount = bonus.amount(passion);
                if amount != 0 {
                    grants.push((passion, amount));
                }
            }
        }
        for (passion, amount) in grants {
            self.grant_points(idx, passion, amount);
        }
    }

    // ------------------------------------------------------------------
    // Scoring pipeline
    // ------------------------------------------------------------------

    /// Product of the per-passion multipliers of every held item.
    #[must_use]
    pub(crate) fn item_score_multiplier(&self, idx: usize, passion: Passion) -> f32 {
        let mut factor = 1.0_f32;
        for item_id in &self.players[idx].inventory {
            let Some((_, payload)) = self.catalog.item(item_id) else {
                continue;
            };
            let Some(multipliers) = payload.score_multipliers else {
                continue;
            };
            let item_factor = multipliers.factor(passion);
            if item_factor > 0.0 {
                factor *= item_factor;
            }
        }
        factor
    }

    /// Every point grant funnels through here: main-passion multiplier,
    /// item multipliers, rounding, then star milestones.
    pub(crate) fn grant_points(&mut self, idx: usize, passion: Passion, base: i32) {
        if base == 0 || idx >= self.players.len() {
            return;
        }
        let mut factor = 1.0_f32;
        if passion == self.players[idx].passion {
            factor *= self.cfg.main_passion_factor;
        }
        factor *= self.item_score_multiplier(idx, passion);

        let final_points = rounded_points(base, factor);
        if final_points == 0 {
            return;
        }

        let before = self.players[idx].scores.get(passion);
        self.players[idx]
            .scores
            .add(passion, final_points, self.cfg.score_clamp);
        let after = self.players[idx].scores.get(passion);

        let gained = stars_crossed(before, after, self.cfg.star_threshold);
        let name = self.players[idx].name.clone();
        if gained > 0 {
            self.players[idx].stars += gained;
            log::debug!("{name} gained {gained} star(s)");
            self.hooks.feedback(FeedbackEvent::StarsGained {
                player: name.clone(),
                stars: gained,
            });
        }
        self.hooks.feedback(FeedbackEvent::PointsGained {
            player: name,
            passion,
            delta: final_points,
        });
    }

    // ------------------------------------------------------------------
    // Scheduled risks
    // ------------------------------------------------------------------

    pub(crate) fn process_scheduled_risks(&mut self, idx: usize) {
        let due = {
            let mut chance = self.rng.chance();
            self.risks.take_due(idx, &self.cfg.risk_curve, &mut *chance)
        };
        for entry in due {
            match self.catalog.get(&entry.card_id).cloned() {
                None => log::warn!("scheduled risk references unknown card '{}'", entry.card_id),
                Some(card) => {
                    log::debug!(
                        "risk outcome '{}' triggered for {}",
                        card.title,
                        self.players[entry.player].name
                    );
                    self.apply_risk_consequence(&card, entry.player, entry.passion_override);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Partnerships
    // ------------------------------------------------------------------

    /// Link two players as partners, dissolving any prior links first.
    pub fn set_partners(&mut self, a: usize, b: usize) {
        if a == b || a >= self.players.len() || b >= self.players.len() {
            log::warn!("invalid partner pair ({a}, {b})");
            return;
        }
        self.clear_partner(a);
        self.clear_partner(b);
        self.players[a].partner = Some(b);
        self.players[b].partner = Some(a);
        self.hooks.feedback(FeedbackEvent::PartnershipFormed {
            a: self.players[a].name.clone(),
            b: self.players[b].name.clone(),
        });
    }

    /// Dissolve a player's partnership symmetrically, if present.
    pub fn clear_partner(&mut self, idx: usize) {
        if idx >= self.players.len() {
            return;
        }
        let Some(partner) = self.players[idx].partner.take() else {
            return;
        };
        if let Some(other) = self.players.get_mut(partner) {
            other.partner = None;
        }
        let b = self
            .players
            .get(partner)
            .map_or_else(String::new, |p| p.name.clone());
        self.hooks.feedback(FeedbackEvent::PartnershipDissolved {
            a: self.players[idx].name.clone(),
            b,
        });
    }

    pub fn clear_all_partnerships(&mut self) {
        for player in &mut self.players {
            player.partner = None;
        }
    }

    // ------------------------------------------------------------------
    // Status effects (external surface)
    // ------------------------------------------------------------------

    /// Register a card as a status effect on a player, by id.
    pub fn add_status_effect(&mut self, idx: usize, card_id: &str) {
        let Some(player) = self.players.get_mut(idx) else {
            return;
        };
        match self.catalog.get(card_id) {
            None => log::warn!("add_status_effect: unknown card '{card_id}'"),
            Some(card) => status::register(player, card),
        }
    }

    /// Remove a status effect from a player, by id. Idempotent.
    pub fn remove_status_effect(&mut self, idx: usize, card_id: &str) {
        let Some(player) = self.players.get_mut(idx) else {
            return;
        };
        status::remove(player, card_id, &self.catalog);
    }

    pub(crate) fn emit_expirations(&mut self, idx: usize, expired: Vec<String>) {
        let name = self.players[idx].name.clone();
        for card_id in expired {
            log::debug!("status effect '{card_id}' expired for {name}");
            self.hooks.feedback(FeedbackEvent::StatusEffectExpired {
                player: name.clone(),
                card_id,
            });
        }
    }
}
