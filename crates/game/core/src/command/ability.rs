use tracing::debug;

use crate::effect::{apply_damage, apply_heal, apply_status};
use crate::env::{AbilityDefinition, AbilityEffect, AbilityId, MatchEnv};
use crate::events::{EffectSource, MatchEvent};
use crate::state::{GridPosition, MatchState, PlayerId, StatusEffectInstance, UnitId};
use crate::zone;

use super::validation::{acting_unit, ensure_phase, ensure_slot_free};
use super::{CommandOutcome, CommandRejection, CommandTransition, CommandType};

/// Activate an ability against a target cell, optionally overloaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseAbilityCommand {
    pub unit: UnitId,
    pub ability: AbilityId,
    pub target: GridPosition,
    pub overload: bool,
}

impl UseAbilityCommand {
    fn scaled(&self, state: &MatchState, base: u32) -> u32 {
        if !self.overload {
            return base;
        }
        let scaled = u64::from(base) * u64::from(state.config.overload_multiplier_percent) / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }

    /// Kind-specific checks against a resolved definition.
    fn check_definition(
        &self,
        state: &MatchState,
        env: &MatchEnv<'_>,
        definition: &AbilityDefinition,
    ) -> Result<(), CommandRejection> {
        // acting_unit has already run, so the unit exists
        let Some(unit) = state.units.get(self.unit) else {
            return Err(CommandRejection::UnitNotFound(self.unit));
        };

        let remaining = unit.cooldown(self.ability);
        if remaining > 0 {
            return Err(CommandRejection::OnCooldown {
                ability: self.ability,
                remaining,
            });
        }
        if unit.aura.current < definition.resource_cost {
            return Err(CommandRejection::InsufficientAura {
                required: definition.resource_cost,
                available: unit.aura.current,
            });
        }
        if self.overload {
            if !definition.can_overload() {
                return Err(CommandRejection::OverloadUnsupported(self.ability));
            }
            if unit.overload.current < definition.overload_threshold {
                return Err(CommandRejection::InsufficientOverload {
                    required: definition.overload_threshold,
                    available: unit.overload.current,
                });
            }
        }

        if !env.grid()?.is_valid_position(self.target) {
            return Err(CommandRejection::OutOfBounds(self.target));
        }
        let distance = unit.position.chebyshev_distance(self.target);
        if distance > definition.range {
            return Err(CommandRejection::OutOfRange {
                distance,
                range: definition.range,
            });
        }

        match &definition.effect {
            AbilityEffect::CreateZone(zone_type) => {
                env.zone_type(*zone_type)?;
            }
            effect if effect.targets_unit() => {
                let has_target = state
                    .grid
                    .occupant(self.target)
                    .and_then(|id| state.units.get(id))
                    .is_some_and(|target| target.is_alive());
                if !has_target {
                    return Err(CommandRejection::NoTarget(self.target));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl CommandTransition for UseAbilityCommand {
    fn command_type(&self) -> CommandType {
        CommandType::UseAbility
    }

    fn validate(
        &self,
        player: PlayerId,
        state: &MatchState,
        env: &MatchEnv<'_>,
    ) -> Result<(), CommandRejection> {
        let unit = acting_unit(state, player, self.unit)?;
        ensure_phase(state, player, CommandType::UseAbility)?;
        ensure_slot_free(unit)?;

        if unit.is_silenced() {
            return Err(CommandRejection::Silenced(unit.id));
        }
        if !unit.knows(self.ability) {
            return Err(CommandRejection::AbilityNotKnown {
                unit: unit.id,
                ability: self.ability,
            });
        }
        let definition = env.ability(self.ability)?;
        self.check_definition(state, env, &definition)
    }

    fn execute(
        &self,
        player: PlayerId,
        state: &mut MatchState,
        env: &MatchEnv<'_>,
    ) -> Result<CommandOutcome, CommandRejection> {
        let definition = env.ability(self.ability)?;
        let zone_spec = match &definition.effect {
            AbilityEffect::CreateZone(zone_type) => Some(env.zone_type(*zone_type)?),
            _ => None,
        };

        let unit = state
            .units
            .get_mut(self.unit)
            .ok_or(CommandRejection::UnitNotFound(self.unit))?;
        unit.aura.spend(definition.resource_cost);
        if self.overload {
            unit.overload.drain(definition.overload_threshold);
        } else {
            unit.overload.restore(definition.charge);
        }
        if definition.cooldown > 0 {
            unit.ability_cooldowns.insert(self.ability, definition.cooldown);
        }
        unit.has_acted_this_phase = true;

        state.phase.record_aura_activation(player);
        state.events.push(MatchEvent::AbilityUsed {
            unit: self.unit,
            ability: self.ability,
            target: self.target,
            overloaded: self.overload,
        });

        let source = EffectSource::Ability {
            unit: self.unit,
            ability: self.ability,
        };
        let target_unit = state.grid.occupant(self.target);
        let mut placement = None;
        match definition.effect {
            AbilityEffect::Damage(amount) => {
                if let Some(target) = target_unit {
                    let amount = self.scaled(state, amount);
                    apply_damage(state, target, amount, source);
                }
            }
            AbilityEffect::Heal(amount) => {
                if let Some(target) = target_unit {
                    let amount = self.scaled(state, amount);
                    apply_heal(state, target, amount, source);
                }
            }
            AbilityEffect::ApplyStatus {
                kind,
                duration,
                potency,
            } => {
                if let Some(target) = target_unit {
                    let potency = self.scaled(state, potency);
                    apply_status(
                        state,
                        target,
                        StatusEffectInstance::new(kind, duration, self.unit, potency),
                    );
                }
            }
            AbilityEffect::CreateZone(_) => {
                if let Some(spec) = zone_spec {
                    let stacks = if self.overload { 2 } else { 1 };
                    placement = Some(zone::create_zone(state, spec, self.target, self.unit, stacks));
                }
            }
        }

        debug!(
            unit = %self.unit,
            ability = self.ability.0,
            target = %self.target,
            overloaded = self.overload,
            "ability resolved"
        );
        Ok(CommandOutcome::AbilityResolved {
            unit: self.unit,
            ability: self.ability,
            overloaded: self.overload,
            zone: placement,
        })
    }
}
