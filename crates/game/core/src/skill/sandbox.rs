//! Execution surface exposed to skill logic.
//!
//! Interpreted programs and native handlers both run against a
//! [`SkillSandbox`]: a scratch copy of the battle plus the casting context. All
//! mutations go through the combat, status and rule systems so every trigger
//! fires exactly as it would for any other source of damage or healing.

use tracing::debug;

use crate::combat::{self, CombatError, DamageReport, DamageType, HealReport};
use crate::env::{BattleEnv, OracleError, SkillDefinition};
use crate::rules::{
    Origin, RuleSource, RuleTemplate, TriggerContext, TriggerType, attach_rule, check_triggers,
};
use crate::state::{
    BattleState, PieceId, PieceInstance, PlayerId, Position, RuleId, SkillId, StatusEffect,
    StatusEffectSpec,
};
use crate::status::{self, StatusError};

use super::types::{Selector, SkillTarget, TargetFilter, TargetKind, TargetRequest};

/// Explicit casting context handed to every skill invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillContext {
    pub caster: PieceId,
    pub player_id: PlayerId,
    pub skill_id: SkillId,
    /// Target supplied with the action, if any.
    pub target: Option<SkillTarget>,
    pub power_multiplier: f64,
}

impl SkillContext {
    pub fn new(definition: &SkillDefinition, caster: PieceId, player_id: PlayerId) -> Self {
        Self {
            caster,
            player_id,
            skill_id: definition.id.clone(),
            target: None,
            power_multiplier: definition.power_multiplier,
        }
    }

    pub fn with_target(mut self, target: Option<SkillTarget>) -> Self {
        self.target = target;
        self
    }
}

/// Result returned by skill logic that ran to completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillOutcome {
    pub success: bool,
    pub message: String,
}

impl SkillOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Unexpected failure inside skill logic.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkillFault {
    #[error("caster {0} is not in play")]
    CasterMissing(PieceId),

    #[error("caster {0} is not on the board")]
    CasterOffBoard(PieceId),

    #[error("operation requires a selected target")]
    NoTarget,

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("handler failed: {0}")]
    Handler(String),
}

/// Early exit from skill logic.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SkillInterrupt {
    /// A target is required; the caller must supply one and resubmit.
    #[error("skill needs a target")]
    NeedsTarget(TargetRequest),

    /// The supplied target does not satisfy the request.
    #[error("{0}")]
    InvalidTarget(String),

    #[error(transparent)]
    Fault(#[from] SkillFault),
}

impl From<CombatError> for SkillInterrupt {
    fn from(error: CombatError) -> Self {
        SkillInterrupt::Fault(error.into())
    }
}

impl From<StatusError> for SkillInterrupt {
    fn from(error: StatusError) -> Self {
        SkillInterrupt::Fault(error.into())
    }
}

impl From<OracleError> for SkillInterrupt {
    fn from(error: OracleError) -> Self {
        SkillInterrupt::Fault(error.into())
    }
}

pub struct SkillSandbox<'a> {
    state: &'a mut BattleState,
    env: BattleEnv<'a>,
    ctx: &'a SkillContext,
    definition: &'a SkillDefinition,
    current: Option<SkillTarget>,
    messages: Vec<String>,
}

impl<'a> SkillSandbox<'a> {
    pub fn new(
        state: &'a mut BattleState,
        env: BattleEnv<'a>,
        ctx: &'a SkillContext,
        definition: &'a SkillDefinition,
    ) -> Self {
        Self {
            state,
            env,
            ctx,
            definition,
            current: None,
            messages: Vec::new(),
        }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn env(&self) -> BattleEnv<'a> {
        self.env
    }

    pub fn context(&self) -> &SkillContext {
        self.ctx
    }

    pub fn definition(&self) -> &SkillDefinition {
        self.definition
    }

    pub(crate) fn into_messages(self) -> Vec<String> {
        self.messages
    }

    pub fn say(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    fn origin(&self) -> Origin {
        Origin::piece(self.ctx.caster.clone())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn caster(&self) -> Result<&PieceInstance, SkillInterrupt> {
        self.state
            .piece(&self.ctx.caster)
            .filter(|p| p.is_alive())
            .ok_or_else(|| SkillFault::CasterMissing(self.ctx.caster.clone()).into())
    }

    pub fn caster_position(&self) -> Result<Position, SkillInterrupt> {
        self.caster()?
            .position
            .ok_or_else(|| SkillFault::CasterOffBoard(self.ctx.caster.clone()).into())
    }

    /// Caster's effective attack scaled by the skill's power multiplier.
    pub fn caster_power(&self) -> Result<f64, SkillInterrupt> {
        Ok(f64::from(self.caster()?.effective_attack()) * self.ctx.power_multiplier)
    }

    pub fn piece(&self, id: &PieceId) -> Option<&PieceInstance> {
        self.state.piece(id)
    }

    pub fn piece_at(&self, position: Position) -> Option<&PieceInstance> {
        self.state.piece_at(position)
    }

    pub fn current_target(&self) -> Option<&SkillTarget> {
        self.current.as_ref()
    }

    pub fn set_target(&mut self, target: SkillTarget) {
        self.current = Some(target);
    }

    /// Living piece designated by the current target, if any.
    pub fn current_piece(&self) -> Option<PieceId> {
        match self.current.as_ref()? {
            SkillTarget::Piece(id) => self
                .state
                .piece(id)
                .filter(|p| p.is_alive())
                .map(|p| p.instance_id.clone()),
            SkillTarget::Cell(position) => {
                self.state.piece_at(*position).map(|p| p.instance_id.clone())
            }
        }
    }

    /// Position of the current target.
    pub fn current_position(&self) -> Option<Position> {
        match self.current.as_ref()? {
            SkillTarget::Piece(id) => self.state.find_piece(id)?.position,
            SkillTarget::Cell(position) => Some(*position),
        }
    }

    /// Returns the supplied target if it satisfies `request`, otherwise
    /// interrupts with [`SkillInterrupt::NeedsTarget`] or
    /// [`SkillInterrupt::InvalidTarget`].
    pub fn select_target(&mut self, request: &TargetRequest) -> Result<SkillTarget, SkillInterrupt> {
        let Some(target) = self.ctx.target.clone() else {
            return Err(SkillInterrupt::NeedsTarget(request.clone()));
        };
        self.validate_target(&target, request)?;
        self.current = Some(target.clone());
        Ok(target)
    }

    fn validate_target(
        &self,
        target: &SkillTarget,
        request: &TargetRequest,
    ) -> Result<(), SkillInterrupt> {
        let caster = self.caster()?;
        let owner = caster.owner_player_id.clone();
        let from = self.caster_position()?;

        let position = match (request.target_type, target) {
            (TargetKind::Piece, SkillTarget::Piece(id)) => {
                let piece = self
                    .state
                    .piece(id)
                    .filter(|p| p.is_alive())
                    .ok_or_else(|| invalid(format!("Target {id} is not a living piece")))?;
                let position = piece
                    .position
                    .ok_or_else(|| invalid(format!("Target {id} is not on the board")))?;
                let is_ally = piece.owner_player_id == owner;
                match request.filter {
                    TargetFilter::Enemy if is_ally => {
                        return Err(invalid(format!("Target {id} is not an enemy")));
                    }
                    TargetFilter::Ally if !is_ally => {
                        return Err(invalid(format!("Target {id} is not an ally")));
                    }
                    TargetFilter::EmptyCell => {
                        return Err(invalid("An empty cell is required".to_owned()));
                    }
                    _ => {}
                }
                position
            }
            (TargetKind::Grid, SkillTarget::Cell(position)) => {
                if !self.state.map.contains(*position) {
                    return Err(invalid(format!("Cell {position} is outside the map")));
                }
                let occupant = self.state.piece_at(*position);
                let ok = match request.filter {
                    TargetFilter::Any => true,
                    TargetFilter::EmptyCell => self.state.is_free(*position),
                    TargetFilter::Enemy => occupant.is_some_and(|p| p.owner_player_id != owner),
                    TargetFilter::Ally => occupant.is_some_and(|p| p.owner_player_id == owner),
                };
                if !ok {
                    return Err(invalid(format!("Cell {position} is not a valid target")));
                }
                *position
            }
            _ => return Err(invalid("Target type does not match the request".to_owned())),
        };

        if let Some(range) = request.range {
            let distance = from.manhattan_distance(position);
            if distance > range {
                return Err(invalid(format!(
                    "Target is {distance} tiles away, range is {range}"
                )));
            }
        }
        Ok(())
    }

    /// Picks a piece by `selector`, optionally bounded by a Manhattan range
    /// from the caster. Ties go to the earliest piece in battle order.
    pub fn select(
        &self,
        selector: Selector,
        range: Option<u32>,
    ) -> Result<Option<PieceId>, SkillInterrupt> {
        let caster = self.caster()?;
        let from = self.caster_position()?;
        let owner = &caster.owner_player_id;
        let within = |p: &&PieceInstance| {
            p.is_active()
                && p.instance_id != caster.instance_id
                && range.is_none_or(|r| p.position.is_some_and(|pos| from.manhattan_distance(pos) <= r))
        };
        let distance = |p: &PieceInstance| p.position.map_or(u32::MAX, |pos| from.manhattan_distance(pos));
        let enemies = || {
            self.state
                .pieces
                .iter()
                .filter(within)
                .filter(move |p| &p.owner_player_id != owner)
        };
        let allies = || {
            self.state
                .pieces
                .iter()
                .filter(within)
                .filter(move |p| &p.owner_player_id == owner)
        };

        let chosen = match selector {
            Selector::Caster => Some(caster),
            Selector::Supplied => match &self.ctx.target {
                Some(SkillTarget::Piece(id)) => self.state.piece(id).filter(|p| p.is_alive()),
                Some(SkillTarget::Cell(position)) => self.state.piece_at(*position),
                None => None,
            },
            Selector::NearestEnemy => enemies().min_by_key(|p| distance(p)),
            Selector::LowestHpEnemy => enemies().min_by_key(|p| p.current_hp),
            Selector::HighestAttackEnemy => enemies()
                .rev()
                .max_by_key(|p| p.effective_attack()),
            Selector::NearestAlly => allies().min_by_key(|p| distance(p)),
            Selector::LowestHpAlly => allies().min_by_key(|p| p.current_hp),
        };
        Ok(chosen.map(|p| p.instance_id.clone()))
    }

    /// Living enemies of the caster within `radius` of `center`.
    pub fn enemies_within(&self, center: Position, radius: u32) -> Result<Vec<PieceId>, SkillInterrupt> {
        let owner = self.caster()?.owner_player_id.clone();
        Ok(self.pieces_within(center, radius, |p| p.owner_player_id != owner))
    }

    /// Living allies of the caster (caster included) within `radius` of `center`.
    pub fn allies_within(&self, center: Position, radius: u32) -> Result<Vec<PieceId>, SkillInterrupt> {
        let owner = self.caster()?.owner_player_id.clone();
        Ok(self.pieces_within(center, radius, |p| p.owner_player_id == owner))
    }

    fn pieces_within(
        &self,
        center: Position,
        radius: u32,
        keep: impl Fn(&PieceInstance) -> bool,
    ) -> Vec<PieceId> {
        self.state
            .pieces
            .iter()
            .filter(|p| p.is_alive() && keep(p))
            .filter(|p| {
                p.position
                    .is_some_and(|pos| center.manhattan_distance(pos) <= radius)
            })
            .map(|p| p.instance_id.clone())
            .collect()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub fn deal_damage(
        &mut self,
        target: &PieceId,
        base: f64,
        damage_type: DamageType,
    ) -> Result<DamageReport, SkillInterrupt> {
        let origin = self.origin();
        let report = combat::deal_damage(self.state, &self.env, target, base, damage_type, &origin)?;
        self.messages.push(report.describe());
        self.messages.extend(report.messages.iter().cloned());
        Ok(report)
    }

    pub fn heal(&mut self, target: &PieceId, amount: f64) -> Result<HealReport, SkillInterrupt> {
        let origin = self.origin();
        let report = combat::heal_damage(self.state, &self.env, target, amount, &origin)?;
        self.messages.push(report.describe());
        self.messages.extend(report.messages.iter().cloned());
        Ok(report)
    }

    pub fn add_status(
        &mut self,
        target: &PieceId,
        spec: &StatusEffectSpec,
        uses: Option<i32>,
    ) -> Result<StatusEffect, SkillInterrupt> {
        let origin = self.origin();
        let effect = status::add_status_effect(self.state, &self.env, target, spec, uses, &origin)?;
        let name = self.state.piece(target).map_or_else(|| target.to_string(), |p| p.name.clone());
        self.messages
            .push(format!("{name} is affected by {}", effect.name));
        Ok(effect)
    }

    pub fn cleanse(&mut self, target: &PieceId) -> Vec<StatusEffect> {
        let origin = self.origin();
        let removed = status::cleanse_debuffs(self.state, &self.env, target, &origin);
        if !removed.is_empty() {
            self.messages
                .push(format!("{} debuff(s) removed from {target}", removed.len()));
        }
        removed
    }

    /// Moves the caster to a free, walkable cell and fires `AfterMove`.
    pub fn teleport(&mut self, to: Position) -> Result<(), SkillInterrupt> {
        let from = self.caster_position()?;
        if !self.state.map.contains(to) {
            return Err(invalid(format!("Cannot teleport outside the map to {to}")));
        }
        if !self.state.is_free(to) {
            return Err(invalid(format!("Cannot teleport to {to}")));
        }
        let caster = self.ctx.caster.clone();
        if let Some(piece) = self.state.piece_mut(&caster) {
            piece.position = Some(to);
        }
        debug!(target: "tactics::skills", piece = %caster, %from, %to, "teleported");
        let ctx = TriggerContext::new(TriggerType::AfterMove)
            .with_source(caster.clone())
            .with_player(self.ctx.player_id.clone())
            .with_position(to);
        let outcome = check_triggers(self.state, &self.env, &ctx);
        self.messages.push(format!("{caster} teleports to {to}"));
        self.messages.extend(outcome.messages);
        Ok(())
    }

    pub fn attach_rule(&mut self, template: &RuleTemplate) -> Result<RuleId, SkillInterrupt> {
        let source = RuleSource::Skill(self.ctx.skill_id.clone());
        attach_rule(self.state, &self.ctx.caster, template, source)
            .ok_or_else(|| SkillFault::CasterMissing(self.ctx.caster.clone()).into())
    }

    pub fn grant_charge_points(&mut self, amount: u32) -> Result<(), SkillInterrupt> {
        let owner = self.caster()?.owner_player_id.clone();
        if let Some(player) = self.state.player_mut(&owner) {
            player.charge_points = player.charge_points.saturating_add(amount);
        }
        self.messages
            .push(format!("{owner} gains {amount} charge point(s)"));
        Ok(())
    }
}

fn invalid(message: String) -> SkillInterrupt {
    SkillInterrupt::InvalidTarget(message)
}
