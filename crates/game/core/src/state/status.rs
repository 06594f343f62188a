//! Status effects attached to units.
//!
//! Durations count whole turns and tick once at the turn-end hook. The list
//! keeps application order so periodic effects resolve deterministically.

use super::UnitId;

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffectKind {
    /// Loses `potency` HP at each turn end.
    Burning,

    /// Recovers `potency` HP at each turn end.
    Regenerating,

    /// Cannot use abilities.
    Silenced,

    /// Cannot move or reposition.
    Rooted,

    /// Absorbs up to `potency` damage from each hit.
    Shielded,
}

impl StatusEffectKind {
    pub const fn is_periodic(self) -> bool {
        matches!(self, Self::Burning | Self::Regenerating)
    }
}

/// A single status effect instance owned by one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectInstance {
    pub kind: StatusEffectKind,
    pub remaining_duration: u32,
    pub source: UnitId,
    pub potency: u32,
}

impl StatusEffectInstance {
    pub fn new(kind: StatusEffectKind, remaining_duration: u32, source: UnitId, potency: u32) -> Self {
        Self {
            kind,
            remaining_duration,
            source,
            potency,
        }
    }
}

/// Ordered list of status effects on a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: Vec<StatusEffectInstance>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusEffectKind) -> Option<&StatusEffectInstance> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Attaches an effect, or refreshes an existing one of the same kind to
    /// the larger duration and potency.
    ///
    /// Returns false when the list is already at `capacity` and the kind is new.
    pub fn add(&mut self, effect: StatusEffectInstance, capacity: usize) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.remaining_duration = existing.remaining_duration.max(effect.remaining_duration);
            existing.potency = existing.potency.max(effect.potency);
            existing.source = effect.source;
            return true;
        }

        if self.effects.len() >= capacity {
            return false;
        }
        self.effects.push(effect);
        true
    }

    pub fn remove(&mut self, kind: StatusEffectKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }

    /// Decrements every duration by one turn and drops the ones that hit zero.
    ///
    /// Returns the kinds that expired, in list order.
    pub fn tick(&mut self) -> Vec<StatusEffectKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            effect.remaining_duration = effect.remaining_duration.saturating_sub(1);
            if effect.remaining_duration == 0 {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burning(duration: u32, potency: u32) -> StatusEffectInstance {
        StatusEffectInstance::new(StatusEffectKind::Burning, duration, UnitId(9), potency)
    }

    #[test]
    fn reapplying_refreshes_instead_of_duplicating() {
        let mut effects = StatusEffects::empty();
        assert!(effects.add(burning(2, 5), 8));
        assert!(effects.add(burning(1, 8), 8));

        assert_eq!(effects.len(), 1);
        let effect = effects.get(StatusEffectKind::Burning).unwrap();
        assert_eq!(effect.remaining_duration, 2);
        assert_eq!(effect.potency, 8);
    }

    #[test]
    fn capacity_limits_new_kinds_only() {
        let mut effects = StatusEffects::empty();
        assert!(effects.add(burning(2, 5), 1));
        let silence = StatusEffectInstance::new(StatusEffectKind::Silenced, 1, UnitId(9), 0);
        assert!(!effects.add(silence, 1));
        assert!(effects.add(burning(3, 1), 1));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn tick_removes_effects_reaching_zero() {
        let mut effects = StatusEffects::empty();
        effects.add(burning(1, 5), 8);
        effects.add(
            StatusEffectInstance::new(StatusEffectKind::Rooted, 2, UnitId(9), 0),
            8,
        );

        assert_eq!(effects.tick(), vec![StatusEffectKind::Burning]);
        assert!(effects.has(StatusEffectKind::Rooted));
        assert_eq!(effects.tick(), vec![StatusEffectKind::Rooted]);
        assert!(effects.is_empty());
    }
}
