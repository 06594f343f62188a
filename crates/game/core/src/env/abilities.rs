//! Ability definitions consumed by `UseAbility` commands.

use crate::state::StatusEffectKind;

use super::ZoneTypeId;

/// Identifier of an ability definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityId(pub u32);

/// What an ability does to its target cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityEffect {
    /// Direct damage to the unit standing on the target cell.
    Damage(u32),
    /// Direct healing to the unit standing on the target cell.
    Heal(u32),
    /// Attaches a status effect to the unit standing on the target cell.
    ApplyStatus {
        kind: StatusEffectKind,
        duration: u32,
        potency: u32,
    },
    /// Places a zone of the given type anchored at the target cell.
    CreateZone(ZoneTypeId),
}

impl AbilityEffect {
    /// Whether the effect needs a unit on the target cell.
    pub fn targets_unit(&self) -> bool {
        !matches!(self, AbilityEffect::CreateZone(_))
    }
}

/// Complete definition of an ability, loaded from content data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    /// Maximum Chebyshev distance from caster to target cell.
    pub range: u32,
    /// Aura spent per activation.
    pub resource_cost: u32,
    /// Turns before the ability is ready again.
    pub cooldown: u32,
    /// Overload charge gained by a normal (non-overloaded) activation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub charge: u32,
    /// Overload charge required (and consumed) for an overloaded activation.
    /// Zero means the ability cannot be overloaded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub overload_threshold: u32,
    pub effect: AbilityEffect,
}

impl AbilityDefinition {
    pub fn can_overload(&self) -> bool {
        self.overload_threshold > 0
    }
}

/// Read-only catalog of ability definitions.
pub trait AbilityOracle: Send + Sync {
    fn ability(&self, id: AbilityId) -> Option<AbilityDefinition>;
}
