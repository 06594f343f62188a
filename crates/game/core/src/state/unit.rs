use std::collections::BTreeMap;

use super::status::{StatusEffectKind, StatusEffects};
use super::{GridPosition, PlayerId, ResourceMeter, UnitId};
use crate::env::AbilityId;

/// Complete per-unit state.
///
/// # Resources
///
/// - `hp`: unit is dead once `hp.current` reaches 0
/// - `aura`: ability fuel, spent by `UseAbility`
/// - `overload`: secondary per-unit charge; when it meets an ability's
///   overload threshold the ability can be used in the enhanced mode
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub team: PlayerId,
    pub position: GridPosition,

    pub hp: ResourceMeter,
    pub aura: ResourceMeter,
    pub overload: ResourceMeter,

    pub movement_range: u32,

    /// Abilities this unit may activate.
    pub abilities: Vec<AbilityId>,
    /// Remaining cooldown turns per ability. Absent means ready.
    pub ability_cooldowns: BTreeMap<AbilityId, u32>,

    pub status_effects: StatusEffects,

    pub has_acted_this_phase: bool,
    pub has_moved_this_turn: bool,
}

impl Unit {
    pub const DEFAULT_HP: u32 = 100;
    pub const DEFAULT_AURA: u32 = 10;
    pub const DEFAULT_OVERLOAD: u32 = 10;
    pub const DEFAULT_MOVEMENT_RANGE: u32 = 3;

    pub fn new(id: UnitId, team: PlayerId, position: GridPosition) -> Self {
        Self {
            id,
            team,
            position,
            hp: ResourceMeter::full(Self::DEFAULT_HP),
            aura: ResourceMeter::full(Self::DEFAULT_AURA),
            overload: ResourceMeter::new(0, Self::DEFAULT_OVERLOAD),
            movement_range: Self::DEFAULT_MOVEMENT_RANGE,
            abilities: Vec::new(),
            ability_cooldowns: BTreeMap::new(),
            status_effects: StatusEffects::empty(),
            has_acted_this_phase: false,
            has_moved_this_turn: false,
        }
    }

    pub fn with_hp(mut self, current: u32, maximum: u32) -> Self {
        self.hp = ResourceMeter::new(current, maximum);
        self
    }

    pub fn with_aura(mut self, current: u32, maximum: u32) -> Self {
        self.aura = ResourceMeter::new(current, maximum);
        self
    }

    pub fn with_overload(mut self, current: u32, maximum: u32) -> Self {
        self.overload = ResourceMeter::new(current, maximum);
        self
    }

    pub fn with_movement_range(mut self, range: u32) -> Self {
        self.movement_range = range;
        self
    }

    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        if !self.abilities.contains(&ability) {
            self.abilities.push(ability);
        }
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp.current > 0
    }

    pub fn knows(&self, ability: AbilityId) -> bool {
        self.abilities.contains(&ability)
    }

    /// Remaining cooldown turns for `ability` (0 when ready).
    pub fn cooldown(&self, ability: AbilityId) -> u32 {
        self.ability_cooldowns.get(&ability).copied().unwrap_or(0)
    }

    pub fn is_silenced(&self) -> bool {
        self.status_effects.has(StatusEffectKind::Silenced)
    }

    pub fn is_rooted(&self) -> bool {
        self.status_effects.has(StatusEffectKind::Rooted)
    }

    /// Decrements every cooldown by one turn, dropping finished entries.
    pub fn tick_cooldowns(&mut self) {
        self.ability_cooldowns.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
    }
}
