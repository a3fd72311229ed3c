//! Shared battle fixtures for the integration tests.
#![allow(dead_code)]

use tactics_core::{
    BattleAction, BattleConfig, BattleEnv, BattleState, BoardMap, ExecuteError, Faction,
    PieceId, PieceInstance, PieceTemplate, PlayerId, Position, SkillDefinition, SkillId, SkillState,
    TurnPhase, apply_battle_action,
};

pub const P1: &str = "p1";
pub const P2: &str = "p2";

/// 8x6 open arena in the action phase of p1's first turn.
pub fn arena() -> BattleState {
    arena_on(BoardMap::open("arena", 8, 6))
}

pub fn arena_on(map: BoardMap) -> BattleState {
    let mut state = BattleState::new(
        map,
        [PlayerId::new(P1), PlayerId::new(P2)],
        &BattleConfig::default(),
    );
    state.turn.phase = TurnPhase::Action;
    state
}

/// Piece spec used by [`place`].
pub struct Unit<'a> {
    pub id: &'a str,
    pub owner: &'a str,
    pub at: (i32, i32),
    pub hp: u32,
    pub attack: i32,
    pub defense: i32,
    pub move_range: u32,
    pub skills: Vec<SkillDefinition>,
}

impl<'a> Unit<'a> {
    pub fn new(id: &'a str, owner: &'a str, at: (i32, i32)) -> Self {
        Self {
            id,
            owner,
            at,
            hp: 20,
            attack: 5,
            defense: 0,
            move_range: 3,
            skills: Vec::new(),
        }
    }

    pub fn hp(mut self, hp: u32) -> Self {
        self.hp = hp;
        self
    }

    pub fn attack(mut self, attack: i32) -> Self {
        self.attack = attack;
        self
    }

    pub fn defense(mut self, defense: i32) -> Self {
        self.defense = defense;
        self
    }

    pub fn move_range(mut self, move_range: u32) -> Self {
        self.move_range = move_range;
        self
    }

    pub fn skill(mut self, definition: SkillDefinition) -> Self {
        self.skills.push(definition);
        self
    }
}

pub fn place(state: &mut BattleState, unit: Unit<'_>) {
    let faction = if unit.owner == P1 {
        Faction::Red
    } else {
        Faction::Blue
    };
    let template = PieceTemplate::new(unit.id, unit.id, faction).with_stats(
        unit.hp,
        unit.attack,
        unit.defense,
        unit.move_range,
    );
    let skills = unit
        .skills
        .iter()
        .map(|definition| SkillState::for_definition(definition, 0))
        .collect();
    for definition in unit.skills {
        state
            .skills_by_id
            .insert(definition.id.clone(), definition);
    }
    state.add_piece(PieceInstance::from_template(
        PieceId::new(unit.id),
        &template,
        PlayerId::new(unit.owner),
        faction,
        Some(Position::new(unit.at.0, unit.at.1)),
        skills,
    ));
}

pub fn act(
    state: &BattleState,
    action: impl Into<BattleAction>,
) -> Result<BattleState, ExecuteError> {
    apply_battle_action(state, &action.into(), &BattleEnv::empty())
}

pub fn hp(state: &BattleState, id: &str) -> Option<u32> {
    state.find_piece(&PieceId::new(id)).map(|p| p.current_hp)
}

pub fn position(state: &BattleState, id: &str) -> Option<Position> {
    state.piece(&PieceId::new(id)).and_then(|p| p.position)
}

pub fn action_points(state: &BattleState, player: &str) -> u32 {
    state
        .player(&PlayerId::new(player))
        .map_or(0, |p| p.action_points)
}

pub fn charge_points(state: &BattleState, player: &str) -> u32 {
    state
        .player(&PlayerId::new(player))
        .map_or(0, |p| p.charge_points)
}

pub fn cooldown(state: &BattleState, piece: &str, skill: &str) -> Option<u32> {
    state
        .piece(&PieceId::new(piece))
        .and_then(|p| p.skill(&SkillId::new(skill)))
        .map(|s| s.current_cooldown)
}
