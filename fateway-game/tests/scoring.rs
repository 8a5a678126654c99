//! Scoring pipeline scenarios: main-passion multiplier, field overrides,
//! item multipliers, star milestones, and finish-line bonuses.

use fateway_game::{
    Board, CardCatalog, EngineConfig, FeedbackEvent, GameEngine, Gender, Passion, Player,
    RecordingHooks, WinnerPolicy,
};

fn catalog() -> CardCatalog {
    CardCatalog::from_json(
        r#"{
            "cards": [
                {
                    "id": "ev_main10",
                    "title": "Spotlight",
                    "effect": "give_points",
                    "kind": "event",
                    "points": { "simple": { "delta": 10, "to_main_passion": true } }
                },
                {
                    "id": "ev_yellow10",
                    "title": "Sunburst",
                    "effect": "give_points",
                    "kind": "event",
                    "points": { "simple": { "delta": 10, "passion": "yellow" } }
                },
                {
                    "id": "ev_green95",
                    "title": "Harvest",
                    "effect": "give_points",
                    "kind": "event",
                    "points": { "simple": { "delta": 95, "passion": "green" } }
                },
                {
                    "id": "it_amp",
                    "title": "Amplifier",
                    "effect": "give_item",
                    "kind": "item",
                    "score_multipliers": { "yellow": 1.5 }
                },
                {
                    "id": "it_medal",
                    "title": "Medal",
                    "effect": "give_item",
                    "kind": "item",
                    "redeem_scores": { "green": 5 }
                }
            ]
        }"#,
    )
    .expect("catalog parses")
}

fn engine_with(board: Board, dice: i32) -> GameEngine<RecordingHooks> {
    let _ = env_logger::builder().is_test(true).try_init();
    let cfg = EngineConfig {
        dice_min: dice,
        dice_max: dice,
        ..EngineConfig::default()
    };
    let players = vec![Player::new("Ada", Passion::Yellow, Gender::Female)];
    GameEngine::new(cfg, board, catalog(), players, 42, RecordingHooks::default())
        .expect("config must validate")
}

#[test]
fn main_passion_grants_are_multiplied_and_rounded() {
    let mut engine = engine_with(Board::plain(40), 3);
    engine.apply_card_by_id("ev_main10", 0, None);
    assert_eq!(engine.players()[0].scores.get(Passion::Yellow), 12);
}

#[test]
fn field_override_redirects_simple_points() {
    let mut engine = engine_with(Board::plain(40), 3);
    engine.apply_card_by_id("ev_yellow10", 0, Some(Passion::Green));
    assert_eq!(engine.players()[0].scores.get(Passion::Green), 10);
    assert_eq!(engine.players()[0].scores.get(Passion::Yellow), 0);
}

#[test]
fn main_passion_pin_beats_the_override() {
    let mut engine = engine_with(Board::plain(40), 3);
    engine.apply_card_by_id("ev_main10", 0, Some(Passion::Green));
    assert_eq!(engine.players()[0].scores.get(Passion::Yellow), 12);
    assert_eq!(engine.players()[0].scores.get(Passion::Green), 0);
}

#[test]
fn crossing_the_threshold_awards_a_star() {
    let mut engine = engine_with(Board::plain(40), 3);

    engine.apply_card_by_id("ev_green95", 0, None);
    assert_eq!(engine.players()[0].stars, 0);

    engine.apply_card_by_id("ev_green95", 0, None);
    assert_eq!(engine.players()[0].scores.get(Passion::Green), 190);
    assert_eq!(engine.players()[0].stars, 1);
    assert!(
        engine
            .hooks()
            .events
            .iter()
            .any(|event| matches!(event, FeedbackEvent::StarsGained { stars: 1, .. }))
    );
}

#[test]
fn item_multipliers_stack_with_the_main_passion_factor() {
    let mut engine = engine_with(Board::plain(40), 3);
    engine.apply_card_by_id("it_amp", 0, None);
    assert!(engine.players()[0].holds_item("it_amp"));

    // round(10 * 1.2 * 1.5) = 18.
    engine.apply_card_by_id("ev_main10", 0, None);
    assert_eq!(engine.players()[0].scores.get(Passion::Yellow), 18);
}

#[test]
fn first_finisher_bonus_and_redemption_run_at_the_finish() {
    let mut engine = engine_with(Board::plain(4), 3);
    engine.apply_card_by_id("ev_main10", 0, None);
    engine.apply_card_by_id("it_medal", 0, None);
    assert_eq!(engine.players()[0].scores.get(Passion::Yellow), 12);

    engine.roll_for_current_player();
    assert!(engine.players()[0].finished);

    // First-finisher bonus: round(12 * 0.2) = 2 base, then the main
    // multiplier: round(2 * 1.2) = 2. Total 14.
    assert_eq!(engine.players()[0].scores.get(Passion::Yellow), 14);
    // Redeemed medal: 5 into green (no main multiplier).
    assert_eq!(engine.players()[0].scores.get(Passion::Green), 5);
    assert!(engine.players()[0].inventory.is_empty());
}

#[test]
fn zero_main_score_yields_no_finish_bonus() {
    let mut engine = engine_with(Board::plain(4), 3);
    engine.roll_for_current_player();
    assert!(engine.players()[0].finished);
    assert_eq!(engine.players()[0].total_score(), 0);
    assert!(
        !engine
            .hooks()
            .events
            .iter()
            .any(|event| matches!(event, FeedbackEvent::PointsGained { .. }))
    );
}

#[test]
fn winner_policy_decides_between_different_leaders() {
    // Ada leads on her own main passion; Ben leads on aggregate total.
    let finished_game = |policy: WinnerPolicy| {
        let cfg = EngineConfig {
            dice_min: 3,
            dice_max: 3,
            winner_policy: policy,
            ..EngineConfig::default()
        };
        let players = vec![
            Player::new("Ada", Passion::Yellow, Gender::Female),
            Player::new("Ben", Passion::Green, Gender::Male),
        ];
        let mut engine = GameEngine::new(
            cfg,
            Board::plain(4),
            catalog(),
            players,
            42,
            RecordingHooks::default(),
        )
        .expect("config must validate");

        // Ada: 12 into yellow, her main passion. Ben: 30 into yellow,
        // which is not his, so his main-passion score stays zero.
        engine.apply_card_by_id("ev_main10", 0, None);
        for _ in 0..3 {
            engine.apply_card_by_id("ev_yellow10", 1, None);
        }

        engine.roll_for_current_player();
        engine.try_end_turn();
        engine.roll_for_current_player();
        assert!(engine.game_ended());
        engine
    };

    // Ada finishes first: round(12 * 0.2) = 2 bonus, main-multiplied to
    // 2, so her totals are 14 against Ben's 30.
    let by_total = finished_game(WinnerPolicy::TotalScore);
    assert_eq!(by_total.winner_index(), Some(1));
    assert!(by_total.hooks().events.iter().any(|event| matches!(
        event,
        FeedbackEvent::GameEnded { winner } if winner == "Ben"
    )));

    let by_main = finished_game(WinnerPolicy::MainPassion);
    assert_eq!(by_main.winner_index(), Some(0));
    assert!(by_main.hooks().events.iter().any(|event| matches!(
        event,
        FeedbackEvent::GameEnded { winner } if winner == "Ada"
    )));
}

#[test]
fn rankings_sort_by_total_score() {
    let cfg = EngineConfig {
        dice_min: 3,
        dice_max: 3,
        ..EngineConfig::default()
    };
    let players = vec![
        Player::new("Ada", Passion::Yellow, Gender::Female),
        Player::new("Ben", Passion::Green, Gender::Male),
    ];
    let mut engine = GameEngine::new(
        cfg,
        Board::plain(40),
        catalog(),
        players,
        42,
        RecordingHooks::default(),
    )
    .expect("config must validate");

    engine.apply_card_by_id("ev_yellow10", 1, None);
    assert_eq!(engine.rankings(), vec![1, 0]);

    engine.apply_card_by_id("ev_green95", 0, None);
    assert_eq!(engine.rankings(), vec![0, 1]);
}
