//! Zone type data: radius, duration, effect parameters, merge and resonance rules.

use crate::state::StatusEffectKind;

/// Identifier of a zone type in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneTypeId(pub u32);

impl ZoneTypeId {
    /// Reserved for the volatile zone spawned by unstable resonance.
    pub const VOLATILE: Self = Self(u32::MAX);
}

/// Effect a zone applies to every unit inside its area during the effect pass.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneEffect {
    Damage(u32),
    Heal(u32),
    /// Attaches `Burning` with the given potency.
    DamageOverTime { potency: u32, duration: u32 },
    /// Attaches `Regenerating` with the given potency.
    HealOverTime { potency: u32, duration: u32 },
    ApplyStatus {
        kind: StatusEffectKind,
        duration: u32,
        potency: u32,
    },
}

/// Zone type data shared by every instance of the type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneSpec {
    pub id: ZoneTypeId,
    pub name: String,
    /// Area radius in the Chebyshev metric (1 = 3×3).
    pub radius: u32,
    /// Turns the zone lasts. [`ZoneSpec::PERMANENT`] never expires.
    pub duration: i32,
    pub effect: ZoneEffect,
    /// Origin tags carried into merges and matched against resonance lists.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
    /// Types that may merge into an existing instance of this type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub merges_with: Vec<ZoneTypeId>,
    /// Upper bound on the stack counter.
    #[cfg_attr(feature = "serde", serde(default = "default_max_stacks"))]
    pub max_stacks: u32,
    /// Origin tags that make stacks resonate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub resonance_tags: Vec<String>,
    /// Percent multiplier applied to resonating stacks (100 = no change).
    #[cfg_attr(feature = "serde", serde(default = "default_resonance_multiplier"))]
    pub resonance_multiplier_percent: u32,
}

#[cfg(feature = "serde")]
fn default_max_stacks() -> u32 {
    1
}

#[cfg(feature = "serde")]
fn default_resonance_multiplier() -> u32 {
    100
}

impl ZoneSpec {
    pub const PERMANENT: i32 = -1;
    /// Largest radius catalogs may declare.
    pub const MAX_RADIUS: u32 = 64;

    /// A non-merging zone type with default stacking and resonance.
    pub fn new(id: ZoneTypeId, name: impl Into<String>, radius: u32, duration: i32, effect: ZoneEffect) -> Self {
        Self {
            id,
            name: name.into(),
            radius,
            duration,
            effect,
            tags: Vec::new(),
            merges_with: Vec::new(),
            max_stacks: 1,
            resonance_tags: Vec::new(),
            resonance_multiplier_percent: 100,
        }
    }

    /// The one-turn, high-damage zone left behind by unstable resonance.
    pub fn volatile(damage: u32, radius: u32) -> Self {
        Self::new(ZoneTypeId::VOLATILE, "volatile", radius, 1, ZoneEffect::Damage(damage))
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_merge(mut self, merges_with: impl IntoIterator<Item = ZoneTypeId>, max_stacks: u32) -> Self {
        self.merges_with = merges_with.into_iter().collect();
        self.max_stacks = max_stacks.max(1);
        self
    }

    pub fn with_resonance<I, S>(mut self, tags: I, multiplier_percent: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resonance_tags = tags.into_iter().map(Into::into).collect();
        self.resonance_multiplier_percent = multiplier_percent;
        self
    }

    pub fn is_permanent(&self) -> bool {
        self.duration == Self::PERMANENT
    }

    pub fn accepts_merge(&self, incoming: ZoneTypeId) -> bool {
        self.merges_with.contains(&incoming)
    }
}

/// Read-only catalog of zone types.
pub trait ZoneOracle: Send + Sync {
    fn zone_type(&self, id: ZoneTypeId) -> Option<ZoneSpec>;
}
