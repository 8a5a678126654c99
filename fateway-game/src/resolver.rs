//! Card resolver: applies a card definition to a target player.
//!
//! Resolution order is fixed: primary effect, then event secondary
//! effects, then status-effect registration, then media cues. Malformed
//! definitions (an effect whose payload lacks the data it needs) degrade
//! to a logged warning and no state change.

use crate::cards::{CardDef, DistributionTarget, ItemDistribution, SecondaryEffects};
use crate::hooks::{FeedbackEvent, GameHooks};
use crate::score::Passion;
use crate::status;

use crate::engine::GameEngine;

impl<H: GameHooks> GameEngine<H> {
    /// Apply a card to a player by roster index.
    ///
    /// `passion_override` redirects simple point grants that are not
    /// pinned to the target's main passion; it is carried into scheduled
    /// risk outcomes so a delayed card scores the way its origin field
    /// would have.
    pub fn apply_card(&mut self, card: &CardDef, target: usize, passion_override: Option<Passion>) {
        if target >= self.players.len() {
            log::warn!("card '{}' targets invalid player index {target}", card.id);
            return;
        }
        log::debug!(
            "applying '{}' ({:?}) to {}",
            card.title,
            card.effect,
            self.players[target].name
        );

        match card.effect {
            crate::cards::CardEffect::GivePoints => {
                self.apply_points_card(card, target, passion_override);
            }
            crate::cards::CardEffect::GiveItem => self.give_item(card, target),
            crate::cards::CardEffect::TakeItem => self.take_item(card, target),
            crate::cards::CardEffect::StartMinigame => match card.minigame_id() {
                None => log::warn!("card '{}' starts a minigame but names none", card.id),
                Some(minigame_id) => {
                    let minigame_id = minigame_id.to_string();
                    self.hooks.start_minigame(&minigame_id, &self.players[target]);
                }
            },
            crate::cards::CardEffect::ScheduleRiskOutcome => {
                self.schedule_risk_outcome(card, target, passion_override);
            }
            crate::cards::CardEffect::HelpLastPlace => {
                self.help_last_place(card, passion_override);
            }
            crate::cards::CardEffect::ShowInventory => {
                self.hooks.show_inventory(&self.players[target]);
            }
            crate::cards::CardEffect::Custom => {
                log::debug!("custom card '{}' has no built-in behavior", card.id);
            }
        }

        if let Some(event) = card.as_event() {
            let secondary = event.secondary.clone();
            if !secondary.is_empty() {
                self.apply_secondary_effects(&secondary, target);
            }
        }

        status::register(&mut self.players[target], card);
        self.emit_media_cue(card);
    }

    /// Look a card up by id and apply it; the entry point for manual card
    /// input and minigame rewards.
    pub fn apply_card_by_id(
        &mut self,
        card_id: &str,
        target: usize,
        passion_override: Option<Passion>,
    ) {
        match self.catalog.get(card_id).cloned() {
            None => log::warn!("unknown card id '{card_id}'"),
            Some(card) => self.apply_card(&card, target, passion_override),
        }
    }

    /// Apply a scheduled risk card that just fired. Runs the card's point
    /// payload, secondary effects, and tracking, but never its primary
    /// effect, so a scheduling card cannot reschedule itself.
    pub(crate) fn apply_risk_consequence(
        &mut self,
        card: &CardDef,
        target: usize,
        passion_override: Option<Passion>,
    ) {
        if target >= self.players.len() {
            return;
        }
        if !card.points.is_empty() {
            self.apply_points_card(card, target, passion_override);
        }
        if let Some(event) = card.as_event() {
            let secondary = event.secondary.clone();
            if !secondary.is_empty() {
                self.apply_secondary_effects(&secondary, target);
            }
        }
        status::register(&mut self.players[target], card);
        self.emit_media_cue(card);
    }

    fn apply_points_card(&mut self, card: &CardDef, target: usize, passion_override: Option<Passion>) {
        let points = card.points;
        if points.is_empty() {
            log::warn!("card '{}' gives points but defines none", card.id);
            return;
        }

        if let Some(multi) = points.multi {
            for passion in Passion::ALL {
                let amount = multi.amount(passion);
                if amount != 0 {
                    self.grant_points(target, passion, amount);
                }
            }
        }

        if points.main_delta != 0 {
            let main = self.players[target].passion;
            self.grant_points(target, main, points.main_delta);
        }

        if let Some(simple) = points.simple
            && simple.delta != 0
        {
            let passion = if simple.to_main_passion {
                self.players[target].passion
            } else {
                passion_override.unwrap_or(simple.passion)
            };
            self.grant_points(target, passion, simple.delta);
        }
    }

    /// Resolve the item card a give/take effect refers to: the card itself
    /// when it is an item, otherwise the event's referenced item.
    fn referenced_item(&self, card: &CardDef) -> Option<CardDef> {
        if card.as_item().is_some() {
            return Some(card.clone());
        }
        let item_id = card.as_event()?.target_item_id.as_deref()?;
        let found = self.catalog.get(item_id).cloned();
        match &found {
            None => log::warn!("card '{}' references unknown item '{item_id}'", card.id),
            Some(item) if item.as_item().is_none() => {
                log::warn!("card '{}' references non-item '{item_id}'", card.id);
                return None;
            }
            Some(_) => {}
        }
        found
    }

    fn give_item(&mut self, card: &CardDef, target: usize) {
        let Some(item) = self.referenced_item(card) else {
            log::warn!("card '{}' gives an item but names none", card.id);
            return;
        };
        let unique = item.as_item().is_some_and(|payload| payload.unique_per_player);
        if unique && self.players[target].holds_item(&item.id) {
            log::debug!(
                "{} already holds unique item '{}'",
                self.players[target].name,
                item.id
            );
            return;
        }
        self.players[target].inventory.push(item.id.clone());
        if item.id != card.id {
            status::register(&mut self.players[target], &item);
        }
        self.hooks.feedback(FeedbackEvent::ItemReceived {
            player: self.players[target].name.clone(),
            item_id: item.id,
        });
    }

    fn take_item(&mut self, card: &CardDef, target: usize) {
        let item_id = self
            .referenced_item(card)
            .map_or_else(|| card.id.clone(), |item| item.id);
        let slot = self.players[target]
            .inventory
            .iter()
            .position(|id| id == &item_id);
        let Some(slot) = slot else {
            log::debug!(
                "{} does not hold '{item_id}'; nothing to take",
                self.players[target].name
            );
            return;
        };
        self.players[target].inventory.remove(slot);
        status::remove(&mut self.players[target], &item_id, &self.catalog);
        self.hooks.feedback(FeedbackEvent::ItemLost {
            player: self.players[target].name.clone(),
            item_id,
        });
    }

    fn schedule_risk_outcome(
        &mut self,
        card: &CardDef,
        target: usize,
        passion_override: Option<Passion>,
    ) {
        let Some(event) = card.as_event() else {
            log::warn!("card '{}' schedules a risk but is not an event", card.id);
            return;
        };
        self.risks
            .schedule(&card.id, target, passion_override, event.risk_duration_turns);
        log::debug!(
            "risk '{}' scheduled for {} over {} turn(s)",
            card.id,
            self.players[target].name,
            event.risk_duration_turns
        );
    }

    fn help_last_place(&mut self, card: &CardDef, passion_override: Option<Passion>) {
        let Some(idx) = self.last_place_index() else {
            log::warn!("card '{}' helps last place but the roster is empty", card.id);
            return;
        };
        self.apply_points_card(card, idx, passion_override);
    }

    fn apply_secondary_effects(&mut self, fx: &SecondaryEffects, actor: usize) {
        // Resetting everything subsumes resetting the actor's own link.
        if fx.reset_all_relationships {
            self.clear_all_partnerships();
        } else if fx.reset_own_relationship {
            self.clear_partner(actor);
        }

        if let Some(distribution) = &fx.distribute_item {
            self.distribute_item(distribution, actor);
        }

        if fx.partnered_bonus != 0 {
            let targets: Vec<usize> = self
                .players
                .iter()
                .enumerate()
                .filter(|(_, player)| !player.finished && player.has_partner())
                .map(|(idx, _)| idx)
                .collect();
            for idx in targets {
                let main = self.players[idx].passion;
                self.grant_points(idx, main, fx.partnered_bonus);
            }
        }

        if fx.couple_bonus != 0 {
            let mut targets = vec![actor];
            if let Some(partner) = self.players[actor].partner
                && self.players.get(partner).is_some_and(|p| !p.finished)
            {
                targets.push(partner);
            }
            for idx in targets {
                let main = self.players[idx].passion;
                self.grant_points(idx, main, fx.couple_bonus);
            }
        }
    }

    fn distribute_item(&mut self, distribution: &ItemDistribution, actor: usize) {
        let Some(card) = self.catalog.get(&distribution.item_id).cloned() else {
            log::warn!("distributed item '{}' is unknown", distribution.item_id);
            return;
        };
        if card.as_item().is_none() {
            log::warn!("distributed card '{}' is not an item", distribution.item_id);
            return;
        }

        let targets: Vec<usize> = match distribution.target {
            DistributionTarget::NextPlayer => {
                self.next_active_after(actor).into_iter().collect()
            }
            DistributionTarget::AllPlayers => (0..self.players.len())
                .filter(|idx| !self.players[*idx].finished)
                .collect(),
            DistributionTarget::AllPartnered => (0..self.players.len())
                .filter(|idx| {
                    !self.players[*idx].finished && self.players[*idx].has_partner()
                })
                .collect(),
            DistributionTarget::OwnPartner => self.players[actor]
                .partner
                .filter(|partner| self.players.get(*partner).is_some_and(|p| !p.finished))
                .into_iter()
                .collect(),
        };

        for idx in targets {
            self.give_item(&card, idx);
            status::register(&mut self.players[idx], &card);
        }
    }

    fn emit_media_cue(&mut self, card: &CardDef) {
        if card.audio_template.is_none() && card.video_template.is_none() {
            return;
        }
        self.hooks.feedback(FeedbackEvent::MediaCue {
            card_id: card.id.clone(),
            audio: card.audio_template.clone(),
            video: card.video_template.clone(),
        });
    }
}
