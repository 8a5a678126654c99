//! End-to-end turn flow scenarios: movement, branching, checkpoints,
//! partnership dissolution, and turn rotation.

use fateway_game::{
    Board, CardCatalog, EngineConfig, FeedbackEvent, FieldDef, FieldType, GameEngine, Gender,
    Passion, PendingPrompt, Player, RecordingHooks,
};

fn fixed_dice(value: i32) -> EngineConfig {
    EngineConfig {
        dice_min: value,
        dice_max: value,
        ..EngineConfig::default()
    }
}

fn roster(names: &[&str]) -> Vec<Player> {
    let passions = [
        Passion::Yellow,
        Passion::Green,
        Passion::Blue,
        Passion::Purple,
    ];
    names
        .iter()
        .zip(passions)
        .map(|(name, passion)| Player::new(name, passion, Gender::Female))
        .collect()
}

fn engine(
    cfg: EngineConfig,
    board: Board,
    players: Vec<Player>,
    hooks: RecordingHooks,
) -> GameEngine<RecordingHooks> {
    let _ = env_logger::builder().is_test(true).try_init();
    GameEngine::new(cfg, board, CardCatalog::empty(), players, 42, hooks)
        .expect("config must validate")
}

fn branching_board() -> Board {
    let mut checkpoint = FieldDef::new(4, FieldType::Neutral);
    checkpoint.is_risk_checkpoint = true;
    Board::from_fields(
        20,
        vec![FieldDef::new(2, FieldType::Crossroad), checkpoint],
    )
}

#[test]
fn two_players_race_to_the_finish() {
    let mut engine = engine(
        fixed_dice(3),
        Board::plain(7),
        roster(&["Ada", "Ben"]),
        RecordingHooks::default(),
    );

    engine.roll_for_current_player();
    assert_eq!(engine.players()[0].position, 3);
    engine.try_end_turn();

    engine.roll_for_current_player();
    assert_eq!(engine.players()[1].position, 3);
    engine.try_end_turn();

    // 3 + 3 lands exactly on the finish at index 6.
    engine.roll_for_current_player();
    assert!(engine.players()[0].finished);
    assert_eq!(engine.players()[0].position, 6);
    assert_eq!(engine.players()[0].available_rolls, 0);
    assert!(!engine.game_ended());
    engine.try_end_turn();

    engine.roll_for_current_player();
    assert!(engine.players()[1].finished);
    assert!(engine.game_ended());
    assert!(
        engine
            .hooks()
            .events
            .iter()
            .any(|event| matches!(event, FeedbackEvent::GameEnded { .. }))
    );
}

#[test]
fn overshooting_the_finish_clamps_position() {
    let mut engine = engine(
        fixed_dice(4),
        Board::plain(7),
        roster(&["Ada"]),
        RecordingHooks::default(),
    );

    engine.roll_for_current_player();
    assert_eq!(engine.players()[0].position, 4);
    engine.try_end_turn();

    // 4 + 4 would land on 8; the finish sits at 6.
    engine.roll_for_current_player();
    assert!(engine.players()[0].finished);
    assert_eq!(engine.players()[0].position, 6);
}

#[test]
fn finished_player_rolls_are_rejected() {
    let mut engine = engine(
        fixed_dice(6),
        Board::plain(7),
        roster(&["Ada"]),
        RecordingHooks::default(),
    );

    engine.roll_for_current_player();
    assert!(engine.players()[0].finished);

    let before = engine.players()[0].clone();
    engine.roll_for_current_player();
    assert_eq!(engine.players()[0], before);
}

#[test]
fn branch_stop_suspends_and_stores_leftover_movement() {
    let hooks = RecordingHooks {
        hold_prompts: true,
        ..RecordingHooks::default()
    };
    let mut engine = engine(fixed_dice(7), branching_board(), roster(&["Ada"]), hooks);

    engine.roll_for_current_player();
    assert_eq!(engine.players()[0].position, 2);
    assert_eq!(engine.players()[0].pending_movement, 5);
    assert!(engine.is_input_locked());
    assert!(matches!(
        engine.pending_prompt(),
        Some(PendingPrompt::BranchChoice { leftover: 5, .. })
    ));

    // Locked input rejects rolls and turn ends alike.
    engine.roll_for_current_player();
    engine.try_end_turn();
    assert_eq!(engine.players()[0].position, 2);

    engine.resolve_branch_choice(true);
    assert!(engine.players()[0].on_risk_route);
    // Leftover 5 runs into the checkpoint at 4 and suspends again for the
    // outcome acknowledgment, carrying the remaining 3 steps.
    assert_eq!(engine.players()[0].position, 4);
    assert!(matches!(
        engine.pending_prompt(),
        Some(PendingPrompt::RiskAck { leftover: 3, .. })
    ));

    engine.acknowledge_risk_outcome();
    assert!(engine.pending_prompt().is_none());
    assert_eq!(engine.players()[0].position, 7);
    assert!(!engine.players()[0].on_risk_route);
}

#[test]
fn rolling_a_bare_one_dissolves_the_partnership_before_moving() {
    let mut engine = engine(
        fixed_dice(1),
        Board::plain(20),
        roster(&["Ada", "Ben"]),
        RecordingHooks::default(),
    );
    engine.set_partners(0, 1);
    assert!(engine.players()[0].has_partner());

    engine.roll_for_current_player();
    assert!(!engine.players()[0].has_partner());
    assert!(!engine.players()[1].has_partner());
    assert_eq!(engine.players()[0].position, 1);
    assert!(
        engine
            .hooks()
            .events
            .iter()
            .any(|event| matches!(event, FeedbackEvent::PartnershipDissolved { .. }))
    );
}

#[test]
fn safe_route_passes_the_checkpoint_without_an_outcome() {
    let mut engine = engine(
        fixed_dice(3),
        branching_board(),
        roster(&["Ada"]),
        RecordingHooks::default(),
    );

    // Stops at the branch on 2; the default fallback picks the safe route
    // and the remaining step lands on 3.
    engine.roll_for_current_player();
    assert_eq!(engine.players()[0].position, 3);
    assert!(!engine.players()[0].on_risk_route);
    engine.try_end_turn();

    // 3 to 6 crosses the checkpoint at 4; safe-route players pass through.
    engine.roll_for_current_player();
    assert_eq!(engine.players()[0].position, 6);
    assert!(
        !engine
            .hooks()
            .events
            .iter()
            .any(|event| matches!(event, FeedbackEvent::RiskOutcome { .. }))
    );
}

#[test]
fn risk_route_checkpoint_success_awards_the_bonus() {
    let cfg = EngineConfig {
        risk_checkpoint_chance: 1.0,
        ..fixed_dice(2)
    };
    let hooks = RecordingHooks {
        hold_prompts: true,
        ..RecordingHooks::default()
    };
    let mut engine = engine(cfg, branching_board(), roster(&["Ada"]), hooks);

    // Lands exactly on the branch; choose the risk route.
    engine.roll_for_current_player();
    engine.resolve_branch_choice(true);
    assert!(engine.players()[0].on_risk_route);
    engine.try_end_turn();

    // Lands exactly on the checkpoint; chance 1.0 forces success.
    engine.roll_for_current_player();
    assert!(matches!(
        engine.pending_prompt(),
        Some(PendingPrompt::RiskAck { .. })
    ));
    engine.acknowledge_risk_outcome();

    // Base bonus 10 into the main passion: round(10 * 1.2) = 12.
    assert_eq!(engine.players()[0].scores.get(Passion::Yellow), 12);
    assert!(!engine.players()[0].on_risk_route);
    assert!(
        engine
            .hooks()
            .events
            .iter()
            .any(|event| matches!(event, FeedbackEvent::RiskOutcome { success: true, .. }))
    );
}

#[test]
fn risk_route_checkpoint_failure_awards_nothing() {
    let cfg = EngineConfig {
        risk_checkpoint_chance: 0.0,
        ..fixed_dice(2)
    };
    let hooks = RecordingHooks {
        hold_prompts: true,
        ..RecordingHooks::default()
    };
    let mut engine = engine(cfg, branching_board(), roster(&["Ada"]), hooks);

    engine.roll_for_current_player();
    engine.resolve_branch_choice(true);
    engine.try_end_turn();
    engine.roll_for_current_player();
    engine.acknowledge_risk_outcome();

    assert_eq!(engine.players()[0].total_score(), 0);
    assert!(
        engine
            .hooks()
            .events
            .iter()
            .any(|event| matches!(event, FeedbackEvent::RiskOutcome { success: false, .. }))
    );
}

#[test]
fn skip_round_effect_skips_the_whole_turn() {
    let catalog = CardCatalog::from_json(
        r#"{
            "cards": [
                {
                    "id": "ev_detention",
                    "title": "Detention",
                    "effect": "custom",
                    "kind": "event",
                    "lifetime": { "skip_rounds": 1 }
                }
            ]
        }"#,
    )
    .expect("catalog parses");
    let mut engine = GameEngine::new(
        fixed_dice(3),
        Board::plain(20),
        catalog,
        roster(&["Ada", "Ben"]),
        42,
        RecordingHooks::default(),
    )
    .expect("config must validate");

    engine.add_status_effect(1, "ev_detention");

    engine.roll_for_current_player();
    engine.try_end_turn();

    // Ben's turn is consumed by the skip; play returns to Ada.
    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.players()[1].position, 0);
    assert!(engine.hooks().events.iter().any(|event| matches!(
        event,
        FeedbackEvent::TurnSkipped { skipped, .. } if skipped == "Ben"
    )));
    assert!(engine.players()[1].active_effects.is_empty());
}

#[test]
fn minigame_fields_use_their_configured_id() {
    let mut named = FieldDef::new(3, FieldType::Minigame);
    named.minigame_id = Some("mg_dance".to_string());
    let plain = FieldDef::new(6, FieldType::Minigame);
    let board = Board::from_fields(20, vec![named, plain]);
    let mut engine = engine(
        fixed_dice(3),
        board,
        roster(&["Ada"]),
        RecordingHooks::default(),
    );

    engine.roll_for_current_player();
    engine.try_end_turn();
    engine.roll_for_current_player();
    assert_eq!(
        engine.hooks().minigames,
        vec!["mg_dance".to_string(), "default".to_string()]
    );
}

#[test]
fn reset_restores_a_fresh_game() {
    let mut engine = engine(
        fixed_dice(3),
        Board::plain(7),
        roster(&["Ada", "Ben"]),
        RecordingHooks::default(),
    );

    engine.roll_for_current_player();
    engine.try_end_turn();
    engine.roll_for_current_player();
    engine.try_end_turn();
    engine.roll_for_current_player();
    assert!(engine.players()[0].finished);

    engine.reset_game();
    assert_eq!(engine.current_index(), 0);
    assert!(engine.players().iter().all(|p| p.position == 0));
    assert!(engine.players().iter().all(|p| !p.finished));
    assert!(!engine.is_input_locked());
    assert_eq!(engine.players()[0].available_rolls, 1);
}
