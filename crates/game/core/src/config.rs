/// Match configuration: capacity limits and phase-completion thresholds.
///
/// Every field carries a serde default so partial TOML files load cleanly.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatchConfig {
    /// Maximum number of active zones a single cell may hold before a new
    /// placement triggers unstable resonance.
    pub max_zones_per_tile: usize,

    /// Turns a cell stays void after unstable resonance.
    pub void_duration: u32,

    /// Damage dealt by the volatile zone spawned on resonance. Zero disables
    /// the volatile zone entirely.
    pub volatile_zone_damage: u32,

    /// Radius of the volatile zone (same metric as regular zones).
    pub volatile_zone_radius: u32,

    /// Total queued moves (both players) that trigger the movement batch.
    pub total_move_threshold: u32,

    /// Moves each player must queue before the batch may run on quota.
    pub moves_per_player: u32,

    /// Ability activations a player may make in one of their aura sub-phases.
    pub max_aura_activations_per_phase: u32,

    /// Reachability range used by Reposition commands.
    pub reposition_range: u32,

    /// Magnitude multiplier (percent) applied to overloaded ability effects.
    pub overload_multiplier_percent: u32,

    /// Cap on status effects attached to one unit.
    pub max_status_effects: usize,
}

impl MatchConfig {
    pub const DEFAULT_MAX_ZONES_PER_TILE: usize = 4;
    pub const DEFAULT_VOID_DURATION: u32 = 2;
    pub const DEFAULT_VOLATILE_ZONE_DAMAGE: u32 = 30;
    pub const DEFAULT_VOLATILE_ZONE_RADIUS: u32 = 1;
    pub const DEFAULT_TOTAL_MOVE_THRESHOLD: u32 = 6;
    pub const DEFAULT_MOVES_PER_PLAYER: u32 = 3;
    pub const DEFAULT_MAX_AURA_ACTIVATIONS: u32 = 1;
    pub const DEFAULT_REPOSITION_RANGE: u32 = 1;
    pub const DEFAULT_OVERLOAD_MULTIPLIER_PERCENT: u32 = 150;
    pub const DEFAULT_MAX_STATUS_EFFECTS: usize = 8;

    pub fn new() -> Self {
        Self {
            max_zones_per_tile: Self::DEFAULT_MAX_ZONES_PER_TILE,
            void_duration: Self::DEFAULT_VOID_DURATION,
            volatile_zone_damage: Self::DEFAULT_VOLATILE_ZONE_DAMAGE,
            volatile_zone_radius: Self::DEFAULT_VOLATILE_ZONE_RADIUS,
            total_move_threshold: Self::DEFAULT_TOTAL_MOVE_THRESHOLD,
            moves_per_player: Self::DEFAULT_MOVES_PER_PLAYER,
            max_aura_activations_per_phase: Self::DEFAULT_MAX_AURA_ACTIVATIONS,
            reposition_range: Self::DEFAULT_REPOSITION_RANGE,
            overload_multiplier_percent: Self::DEFAULT_OVERLOAD_MULTIPLIER_PERCENT,
            max_status_effects: Self::DEFAULT_MAX_STATUS_EFFECTS,
        }
    }

    pub fn with_max_zones_per_tile(mut self, max: usize) -> Self {
        self.max_zones_per_tile = max;
        self
    }

    pub fn with_move_thresholds(mut self, total: u32, per_player: u32) -> Self {
        self.total_move_threshold = total;
        self.moves_per_player = per_player;
        self
    }

    pub fn with_max_aura_activations(mut self, max: u32) -> Self {
        self.max_aura_activations_per_phase = max;
        self
    }

    pub fn with_volatile_zone_damage(mut self, damage: u32) -> Self {
        self.volatile_zone_damage = damage;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new()
    }
}
