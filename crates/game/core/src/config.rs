/// Battle configuration constants and tunable parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Upper bound for a player's action points after regeneration.
    pub max_action_points: u32,

    /// Action points each player holds when the battle is created.
    pub initial_action_points: u32,

    /// Action points granted to the current player on every `start → action` step.
    pub action_point_regen: u32,

    /// Action point cost of a move action.
    pub move_cost: u32,

    /// Charge points awarded to the owner of a piece that lands a killing blow.
    pub kill_charge_reward: u32,

    /// Charge cost used for super/ultimate skills that do not declare one.
    pub default_charge_cost: u32,

    /// Maximum nesting of trigger evaluation (rules firing rules).
    pub max_trigger_depth: u8,

    /// Rejects moves whose intermediate tiles are blocked.
    pub enforce_move_path: bool,

    /// Turns missing maps and skill definitions into hard failures instead of
    /// substituting fallbacks.
    pub strict_content: bool,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 8;
    pub const PLAYER_COUNT: usize = 2;
    pub const FALLBACK_MAP_WIDTH: u32 = 8;
    pub const FALLBACK_MAP_HEIGHT: u32 = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_ACTION_POINTS: u32 = 10;
    pub const DEFAULT_INITIAL_ACTION_POINTS: u32 = 1;
    pub const DEFAULT_ACTION_POINT_REGEN: u32 = 1;
    pub const DEFAULT_MOVE_COST: u32 = 1;
    pub const DEFAULT_KILL_CHARGE_REWARD: u32 = 1;
    pub const DEFAULT_CHARGE_COST: u32 = 1;
    pub const DEFAULT_MAX_TRIGGER_DEPTH: u8 = 8;

    pub const fn new() -> Self {
        Self {
            max_action_points: Self::DEFAULT_MAX_ACTION_POINTS,
            initial_action_points: Self::DEFAULT_INITIAL_ACTION_POINTS,
            action_point_regen: Self::DEFAULT_ACTION_POINT_REGEN,
            move_cost: Self::DEFAULT_MOVE_COST,
            kill_charge_reward: Self::DEFAULT_KILL_CHARGE_REWARD,
            default_charge_cost: Self::DEFAULT_CHARGE_COST,
            max_trigger_depth: Self::DEFAULT_MAX_TRIGGER_DEPTH,
            enforce_move_path: true,
            strict_content: false,
        }
    }

    /// Returns a copy that fails on missing content instead of falling back.
    pub const fn strict(mut self) -> Self {
        self.strict_content = true;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared default used when an environment carries no explicit config.
pub(crate) static DEFAULT_CONFIG: BattleConfig = BattleConfig::new();
