//! Battle bootstrap.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::env::{BattleEnv, BoardMap, Faction, PieceTemplate, SkillDefinition, SkillKind};
use crate::rules::{RuleEffect, RuleSource, RuleTemplate, TriggerType, attach_rule};
use crate::state::{BattleState, PieceInstance, PlayerId, Position, SkillState};

use super::phase::begin_phase;

/// Builds the opening state of a 1v1 battle.
///
/// - `players` must hold exactly two distinct ids; the first plays red and
///   moves first, the second plays blue.
/// - Without a per-player selection a player fields every template in
///   `selected_templates` that belongs to their faction. A per-player
///   selection may name any template; it is recoloured to the player's
///   faction.
/// - Pieces are placed on their faction's spawn tiles (red in the top half,
///   blue in the bottom half), then on free walkable tiles scanned from the
///   player's edge. Pieces that find no tile stay off the board.
///
/// The battle is returned in turn 1's action phase, after the first player's
/// `start → action` step has run.
///
/// Returns `None` when the players are invalid, when a side ends up with no
/// pieces, or when strict content is enabled and a map or skill is missing.
pub fn create_initial_battle_for_players(
    players: &[PlayerId],
    selected_templates: &[String],
    selections: Option<&BTreeMap<PlayerId, Vec<String>>>,
    map_id: Option<&str>,
    env: &BattleEnv<'_>,
) -> Option<BattleState> {
    let [first, second] = players else {
        warn!(target: "tactics::engine", count = players.len(), "a battle needs exactly two players");
        return None;
    };
    if first == second {
        warn!(target: "tactics::engine", player = %first, "a battle needs two distinct players");
        return None;
    }

    let config = env.config();
    let map = resolve_map(map_id, env)?;
    let mut state = BattleState::new(map, [first.clone(), second.clone()], config);

    let templates = env.pieces().map(|oracle| oracle.all_pieces()).unwrap_or_else(|error| {
        warn!(target: "tactics::engine", %error, "no piece templates available");
        Vec::new()
    });

    for (index, player) in [first, second].into_iter().enumerate() {
        let faction = Faction::for_player_index(index);
        let roster = roster_for(player, faction, &templates, selected_templates, selections);
        let mut slots = placement_slots(&state, faction).into_iter();

        for template in roster {
            let position = slots.by_ref().find(|p| state.is_free(*p));
            spawn_piece(&mut state, env, player, faction, &template, position)?;
        }
        if state.living_pieces_of(player).next().is_none() {
            warn!(target: "tactics::engine", player = %player, "player has no pieces");
            return None;
        }
    }

    if state.map.has_hazards() {
        let id = state.ids.next_rule_id();
        let hazard = RuleTemplate::new("Hazardous terrain", TriggerType::BeginTurn, RuleEffect::TileHazard)
            .instantiate(id, None, RuleSource::Map);
        state.rules.register(hazard);
    }

    // Turn 1 opens like every later turn: BeginTurn rules fire and the first
    // player regenerates before the first action.
    let opening = begin_phase(&mut state, env);
    debug!(
        target: "tactics::engine",
        map = %state.map.id,
        pieces = state.pieces.len(),
        first = %first,
        regenerated = opening.regenerated,
        "battle created"
    );
    Some(state)
}

fn resolve_map(map_id: Option<&str>, env: &BattleEnv<'_>) -> Option<BoardMap> {
    let strict = env.config().strict_content;
    let found = match env.maps() {
        Ok(oracle) => {
            let id = map_id.unwrap_or_else(|| oracle.default_map_id());
            let map = oracle.map(id);
            if map.is_none() {
                warn!(target: "tactics::engine", map = id, "map not found");
            }
            map
        }
        Err(error) => {
            warn!(target: "tactics::engine", %error, "map oracle unavailable");
            None
        }
    };
    match found {
        Some(map) => Some(map),
        None if strict => None,
        None => {
            warn!(target: "tactics::engine", "using generated fallback map");
            Some(BoardMap::fallback())
        }
    }
}

fn roster_for(
    player: &PlayerId,
    faction: Faction,
    templates: &[PieceTemplate],
    selected_templates: &[String],
    selections: Option<&BTreeMap<PlayerId, Vec<String>>>,
) -> Vec<PieceTemplate> {
    let find = |id: &String| {
        let template = templates.iter().find(|t| &t.id == id).cloned();
        if template.is_none() {
            warn!(target: "tactics::engine", template = %id, "piece template not found");
        }
        template
    };

    match selections.and_then(|s| s.get(player)) {
        Some(chosen) => chosen
            .iter()
            .filter_map(find)
            .map(|mut template| {
                template.faction = faction;
                template
            })
            .collect(),
        None => selected_templates
            .iter()
            .filter_map(find)
            .filter(|template| template.faction == faction)
            .collect(),
    }
}

/// Candidate cells in placement order: own spawn tiles first, then every
/// walkable tile scanned row by row from the faction's edge.
fn placement_slots(state: &BattleState, faction: Faction) -> Vec<Position> {
    let map = &state.map;
    let half = i32::try_from(map.height / 2).unwrap_or(i32::MAX);
    let from_bottom = faction == Faction::Blue;

    let mut spawns: Vec<Position> = map
        .spawn_tiles()
        .map(|tile| tile.position())
        .filter(|p| if from_bottom { p.y >= half } else { p.y < half })
        .collect();
    let mut rows: Vec<Position> = map
        .tiles()
        .iter()
        .filter(|tile| tile.walkable)
        .map(|tile| tile.position())
        .collect();

    let order = |a: &Position, b: &Position| {
        if from_bottom {
            b.y.cmp(&a.y).then(a.x.cmp(&b.x))
        } else {
            a.y.cmp(&b.y).then(a.x.cmp(&b.x))
        }
    };
    spawns.sort_by(order);
    rows.sort_by(order);
    spawns.extend(rows);
    spawns
}

fn spawn_piece(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    player: &PlayerId,
    faction: Faction,
    template: &PieceTemplate,
    position: Option<Position>,
) -> Option<()> {
    let mut skills = Vec::with_capacity(template.skills.len());
    let mut passives = Vec::new();
    for entry in &template.skills {
        let definition = resolve_skill(state, env, &entry.skill_id)?;
        skills.push(SkillState::for_definition(&definition, entry.initial_charges));
        if definition.kind == SkillKind::Passive {
            if let Some(rule) = &definition.passive_rule {
                passives.push((definition.id.clone(), rule.clone()));
            }
        }
        state.skills_by_id.insert(definition.id.clone(), definition);
    }

    let id = state.ids.next_piece_id(faction);
    if position.is_none() {
        debug!(target: "tactics::engine", piece = %id, "no free tile, piece stays off the board");
    }
    let piece = PieceInstance::from_template(id.clone(), template, player.clone(), faction, position, skills);
    state.add_piece(piece);

    for (skill_id, rule) in passives {
        attach_rule(state, &id, &rule, RuleSource::Passive(skill_id));
    }
    Some(())
}

fn resolve_skill(
    state: &BattleState,
    env: &BattleEnv<'_>,
    skill_id: &crate::state::SkillId,
) -> Option<SkillDefinition> {
    if let Some(known) = state.skills_by_id.get(skill_id) {
        return Some(known.clone());
    }
    let found = env.skills().ok().and_then(|oracle| oracle.skill(skill_id));
    match found {
        Some(definition) => Some(definition),
        None if env.config().strict_content => {
            warn!(target: "tactics::engine", skill = %skill_id, "skill definition missing");
            None
        }
        None => {
            warn!(
                target: "tactics::engine",
                skill = %skill_id,
                "skill definition missing, substituting fallback"
            );
            Some(SkillDefinition::fallback(skill_id.clone()))
        }
    }
}
