//! Battle creation and rehydration against an in-memory content repository.

use std::collections::BTreeMap;

use tactics_core::rules::{Origin, RuleLimits};
use tactics_core::{
    BattleConfig, BattleEnv, BattleState, BoardMap, EndTurnAction, Faction, HandlerRegistry,
    MapOracle, PieceId, PieceOracle, PieceTemplate, PlayerId, Position, RehydrationError,
    RuleEffect, RuleId, RuleSource, RuleTemplate, SkillDefinition, SkillId, SkillLogic, SkillOracle,
    Tile, TileKind, TriggerType, apply_battle_action, create_initial_battle_for_players,
    rehydrate, status,
};

struct Library {
    maps: Vec<BoardMap>,
    pieces: Vec<PieceTemplate>,
    skills: Vec<SkillDefinition>,
}

impl MapOracle for Library {
    fn map(&self, id: &str) -> Option<BoardMap> {
        self.maps.iter().find(|m| m.id == id).cloned()
    }

    fn default_map_id(&self) -> &str {
        "yard"
    }
}

impl PieceOracle for Library {
    fn all_pieces(&self) -> Vec<PieceTemplate> {
        self.pieces.clone()
    }
}

impl SkillOracle for Library {
    fn skill(&self, id: &SkillId) -> Option<SkillDefinition> {
        self.skills.iter().find(|s| &s.id == id).cloned()
    }

    fn all_skills(&self) -> Vec<SkillDefinition> {
        self.skills.clone()
    }
}

fn library() -> Library {
    let yard = BoardMap::open("yard", 6, 6)
        .with_tile(Tile::new(0, 0, TileKind::Spawn).with_damage_per_turn(2))
        .with_tile(Tile::new(5, 5, TileKind::Spawn));
    let bulwark = SkillDefinition::new("bulwark", "Bulwark").with_passive_rule(
        RuleTemplate::new(
            "Bulwark",
            TriggerType::BeforeDamageTaken,
            RuleEffect::BlockDamage { message: None },
        )
        .with_limits(RuleLimits::default().with_max_uses(1)),
    );
    Library {
        maps: vec![yard],
        pieces: vec![
            PieceTemplate::new("knight", "Knight", Faction::Red)
                .with_stats(30, 6, 1, 3)
                .with_skill("strike"),
            PieceTemplate::new("squire", "Squire", Faction::Red)
                .with_stats(20, 4, 0, 3)
                .with_skill("bulwark"),
            PieceTemplate::new("archer", "Archer", Faction::Blue)
                .with_stats(18, 5, 0, 2)
                .with_skill("strike"),
            PieceTemplate::new("mystic", "Mystic", Faction::Blue)
                .with_stats(16, 3, 0, 2)
                .with_skill("ghost"),
        ],
        skills: vec![SkillDefinition::new("strike", "Strike").with_power(1.5), bulwark],
    }
}

fn players() -> Vec<PlayerId> {
    vec![PlayerId::new("p1"), PlayerId::new("p2")]
}

fn roster() -> Vec<String> {
    ["knight", "squire", "archer"].map(String::from).to_vec()
}

fn env<'a>(library: &'a Library, config: &'a BattleConfig) -> BattleEnv<'a> {
    BattleEnv::new(
        Some(library as &dyn MapOracle),
        Some(library as &dyn PieceOracle),
        Some(library as &dyn SkillOracle),
        None,
        config,
    )
}

fn piece_position(state: &BattleState, id: &str) -> Option<Position> {
    state.piece(&PieceId::new(id)).and_then(|p| p.position)
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn pieces_take_spawn_tiles_then_rows_from_their_edge() {
    let library = library();
    let config = BattleConfig::default();
    let state = create_initial_battle_for_players(&players(), &roster(), None, None, &env(&library, &config))
        .expect("battle created");

    assert_eq!(state.map.id, "yard");
    assert_eq!(piece_position(&state, "red-1"), Some(Position::new(0, 0)));
    assert_eq!(piece_position(&state, "red-2"), Some(Position::new(1, 0)));
    assert_eq!(piece_position(&state, "blue-1"), Some(Position::new(5, 5)));

    assert_eq!(state.turn.current_player_id, PlayerId::new("p1"));
    assert_eq!(state.turn.turn_number, 1);
    assert_eq!(state.turn.phase, tactics_core::TurnPhase::Action);
    // The first player's opening regen has run, the second waits for turn 2.
    assert_eq!(state.players[0].action_points, 2);
    assert_eq!(state.players[1].action_points, 1);
    assert_eq!(state.check_invariants(), Ok(()));
}

#[test]
fn creation_requires_two_distinct_players() {
    let library = library();
    let config = BattleConfig::default();
    let env = env(&library, &config);

    let solo = vec![PlayerId::new("p1")];
    assert!(create_initial_battle_for_players(&solo, &roster(), None, None, &env).is_none());

    let twins = vec![PlayerId::new("p1"), PlayerId::new("p1")];
    assert!(create_initial_battle_for_players(&twins, &roster(), None, None, &env).is_none());
}

#[test]
fn side_without_pieces_aborts_creation() {
    let library = library();
    let config = BattleConfig::default();
    let only_red = vec!["knight".to_owned()];

    let state = create_initial_battle_for_players(&players(), &only_red, None, None, &env(&library, &config));
    assert!(state.is_none());
}

#[test]
fn per_player_selection_recolours_templates() {
    let library = library();
    let config = BattleConfig::default();
    let mut selections = BTreeMap::new();
    selections.insert(PlayerId::new("p1"), vec!["archer".to_owned()]);
    selections.insert(PlayerId::new("p2"), vec!["knight".to_owned()]);

    let state = create_initial_battle_for_players(
        &players(),
        &[],
        Some(&selections),
        None,
        &env(&library, &config),
    )
    .expect("battle created");

    let red = state.piece(&PieceId::new("red-1")).expect("p1 piece");
    assert_eq!(red.template_id, "archer");
    assert_eq!(red.faction, Faction::Red);
    let blue = state.piece(&PieceId::new("blue-1")).expect("p2 piece");
    assert_eq!(blue.template_id, "knight");
    assert_eq!(blue.owner_player_id, PlayerId::new("p2"));
}

#[test]
fn passive_skills_attach_their_rules() {
    let library = library();
    let config = BattleConfig::default();
    let state = create_initial_battle_for_players(&players(), &roster(), None, None, &env(&library, &config))
        .expect("battle created");

    let squire = state.piece(&PieceId::new("red-2")).expect("squire");
    assert!(
        squire
            .rules
            .iter()
            .any(|rule| rule.source == RuleSource::Passive(SkillId::new("bulwark")))
    );
    assert!(state.skills_by_id.contains_key(&SkillId::new("strike")));
}

#[test]
fn missing_content_falls_back_unless_strict() {
    let library = library();
    let lenient = BattleConfig::default();
    let strict = BattleConfig::default().strict();
    let with_mystic = ["knight", "mystic"].map(String::from).to_vec();

    let state = create_initial_battle_for_players(
        &players(),
        &with_mystic,
        None,
        Some("nowhere"),
        &env(&library, &lenient),
    )
    .expect("lenient creation succeeds");
    assert_eq!(state.map.id, "fallback");
    assert!(state.skills_by_id.contains_key(&SkillId::new("ghost")));

    let missing_map = create_initial_battle_for_players(
        &players(),
        &roster(),
        None,
        Some("nowhere"),
        &env(&library, &strict),
    );
    assert!(missing_map.is_none());

    let missing_skill =
        create_initial_battle_for_players(&players(), &with_mystic, None, None, &env(&library, &strict));
    assert!(missing_skill.is_none());
}

#[test]
fn hazardous_tiles_hurt_pieces_at_their_owners_turn_start() {
    let library = library();
    let config = BattleConfig::default();
    let env = env(&library, &config);
    let state = create_initial_battle_for_players(&players(), &roster(), None, None, &env)
        .expect("battle created");
    assert!(
        state
            .rules
            .iter()
            .any(|rule| rule.effect == RuleEffect::TileHazard && rule.source == RuleSource::Map)
    );

    // Turn 1 already opened on the hazard.
    let hp = |s: &BattleState| s.piece(&PieceId::new("red-1")).map(|p| p.current_hp);
    assert_eq!(hp(&state), Some(28));

    let state = apply_battle_action(&state, &EndTurnAction::new("p1").into(), &env).expect("p1 ends");
    assert_eq!(hp(&state), Some(28));

    let state = apply_battle_action(&state, &EndTurnAction::new("p2").into(), &env).expect("p2 ends");
    assert_eq!(hp(&state), Some(26));
}

// ============================================================================
// Rehydration
// ============================================================================

fn created(library: &Library) -> BattleState {
    let config = BattleConfig::default();
    create_initial_battle_for_players(&players(), &roster(), None, None, &env(library, &config))
        .expect("battle created")
}

#[test]
fn rehydrate_refreshes_definitions_and_reconciles_status_rules() {
    let library = library();
    let config = BattleConfig::default();
    let env = env(&library, &config);
    let mut state = created(&library);

    if let Some(stale) = state.skills_by_id.get_mut(&SkillId::new("strike")) {
        stale.power_multiplier = 1.0;
    }
    let archer = PieceId::new("blue-1");
    let effect = status::add_poison(&mut state, &env, &archer, 2, 3, &Origin::system())
        .expect("poison applies");
    let orphan = status::add_burn(&mut state, &env, &archer, 1, 3, &Origin::system())
        .expect("burn applies");
    if let Some(piece) = state.piece_mut(&archer) {
        piece.rules.retain(|rule| rule.status_id() != Some(&effect.id));
        piece.statuses.remove(&orphan.id);
    }

    let report = rehydrate(&mut state, &env).expect("rehydrated");

    assert!(report.is_clean());
    assert!(report.refreshed_skills.contains(&SkillId::new("strike")));
    assert_eq!(report.restored_status_rules, vec![effect.id.clone()]);
    assert_eq!(report.dropped_rules, vec![orphan.rule_id.clone()]);
    assert_eq!(
        state.skills_by_id.get(&SkillId::new("strike")).map(|s| s.power_multiplier),
        Some(1.5)
    );
    let piece = state.piece(&archer).expect("archer");
    assert!(piece.rules.iter().any(|rule| rule.status_id() == Some(&effect.id)));
}

#[test]
fn strict_rehydrate_rejects_unknown_handlers_and_keeps_state() {
    let library = library();
    let config = BattleConfig::default().strict();
    let handlers = HandlerRegistry::new();
    let env = env(&library, &config).with_handlers(&handlers);
    let mut state = created(&library);
    let curse = RuleTemplate::new(
        "Curse",
        TriggerType::BeginTurn,
        RuleEffect::Handler {
            name: "vanished".into(),
            params: BTreeMap::new(),
        },
    )
    .instantiate(RuleId::new("rule-curse"), None, RuleSource::Custom);
    state.rules.register(curse);
    let before = state.clone();

    let err = rehydrate(&mut state, &env).expect_err("unknown handler");

    assert_eq!(err, RehydrationError::UnresolvedHandlers(vec!["vanished".to_owned()]));
    assert_eq!(state, before);
}

#[test]
fn lenient_rehydrate_reports_unknown_skill_handlers() {
    let library = library();
    let config = BattleConfig::default();
    let handlers = HandlerRegistry::new();
    let env = BattleEnv::new(None, None, None, Some(&handlers), &config);
    let mut state = created(&library);
    state.skills_by_id.insert(
        SkillId::new("strike"),
        SkillDefinition::new("strike", "Strike").with_logic(SkillLogic::Handler("vanished".into())),
    );

    let report = rehydrate(&mut state, &env).expect("lenient rehydrate succeeds");

    assert!(!report.is_clean());
    assert_eq!(report.unresolved_handlers, vec!["vanished".to_owned()]);
    assert!(report.refreshed_skills.is_empty());
}
