//! Flat string-keyed representation used for network transport.
//!
//! Every command round-trips through [`Command::to_wire`] and
//! [`Command::from_wire`] without loss. Keys:
//!
//! | key | commands |
//! |---|---|
//! | `commandType`, `commandId`, `playerId` | all |
//! | `unitId`, `targetX`, `targetY` | Move, UseAbility, Reposition |
//! | `abilityId`, `overload` | UseAbility |

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::env::AbilityId;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GridPosition, PlayerId, UnitId};

use super::{
    Command, CommandId, CommandKind, CommandType, EndPhaseCommand, MoveCommand, RepositionCommand,
    UseAbilityCommand,
};

pub type WireMap = BTreeMap<String, String>;

const COMMAND_TYPE: &str = "commandType";
const COMMAND_ID: &str = "commandId";
const PLAYER_ID: &str = "playerId";
const UNIT_ID: &str = "unitId";
const TARGET_X: &str = "targetX";
const TARGET_Y: &str = "targetY";
const ABILITY_ID: &str = "abilityId";
const OVERLOAD: &str = "overload";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WireError {
    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("field `{field}` has invalid value `{value}`")]
    InvalidField { field: String, value: String },

    #[error("unknown command type `{0}`")]
    UnknownCommandType(String),
}

impl GameError for WireError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            WireError::MissingField(_) => "WIRE_MISSING_FIELD",
            WireError::InvalidField { .. } => "WIRE_INVALID_FIELD",
            WireError::UnknownCommandType(_) => "WIRE_UNKNOWN_COMMAND_TYPE",
        }
    }
}

fn field<'m>(map: &'m WireMap, key: &str) -> Result<&'m str, WireError> {
    map.get(key)
        .map(String::as_str)
        .ok_or_else(|| WireError::MissingField(key.to_owned()))
}

fn parse<T: FromStr>(map: &WireMap, key: &str) -> Result<T, WireError> {
    let raw = field(map, key)?;
    raw.trim().parse().map_err(|_| WireError::InvalidField {
        field: key.to_owned(),
        value: raw.to_owned(),
    })
}

fn target(map: &WireMap) -> Result<GridPosition, WireError> {
    Ok(GridPosition::new(parse(map, TARGET_X)?, parse(map, TARGET_Y)?))
}

impl Command {
    pub fn to_wire(&self) -> WireMap {
        let mut map = WireMap::new();
        map.insert(COMMAND_TYPE.into(), self.command_type().to_string());
        map.insert(COMMAND_ID.into(), self.id.0.to_string());
        map.insert(PLAYER_ID.into(), self.player.as_u8().to_string());

        let put_target = |map: &mut WireMap, unit: UnitId, at: GridPosition| {
            map.insert(UNIT_ID.into(), unit.0.to_string());
            map.insert(TARGET_X.into(), at.column.to_string());
            map.insert(TARGET_Y.into(), at.row.to_string());
        };
        match &self.kind {
            CommandKind::Move(command) => put_target(&mut map, command.unit, command.destination),
            CommandKind::Reposition(command) => {
                put_target(&mut map, command.unit, command.destination)
            }
            CommandKind::UseAbility(command) => {
                put_target(&mut map, command.unit, command.target);
                map.insert(ABILITY_ID.into(), command.ability.0.to_string());
                map.insert(OVERLOAD.into(), command.overload.to_string());
            }
            CommandKind::EndPhase(_) => {}
        }
        map
    }

    /// Raw `commandId` of a map, readable even when the rest fails to decode.
    pub fn wire_id(map: &WireMap) -> Option<&str> {
        map.get(COMMAND_ID).map(String::as_str)
    }

    /// Decodes a wire map. Unknown keys are ignored.
    pub fn from_wire(map: &WireMap) -> Result<Self, WireError> {
        let raw_type = field(map, COMMAND_TYPE)?;
        let command_type = CommandType::from_str(raw_type.trim())
            .map_err(|_| WireError::UnknownCommandType(raw_type.to_owned()))?;
        let id = CommandId(parse(map, COMMAND_ID)?);

        let raw_player: u8 = parse(map, PLAYER_ID)?;
        let player = PlayerId::from_u8(raw_player).ok_or_else(|| WireError::InvalidField {
            field: PLAYER_ID.to_owned(),
            value: raw_player.to_string(),
        })?;

        let kind = match command_type {
            CommandType::Move => CommandKind::Move(MoveCommand {
                unit: UnitId(parse(map, UNIT_ID)?),
                destination: target(map)?,
            }),
            CommandType::Reposition => CommandKind::Reposition(RepositionCommand {
                unit: UnitId(parse(map, UNIT_ID)?),
                destination: target(map)?,
            }),
            CommandType::UseAbility => CommandKind::UseAbility(UseAbilityCommand {
                unit: UnitId(parse(map, UNIT_ID)?),
                ability: AbilityId(parse(map, ABILITY_ID)?),
                target: target(map)?,
                overload: match map.get(OVERLOAD) {
                    Some(_) => parse(map, OVERLOAD)?,
                    None => false,
                },
            }),
            CommandType::EndPhase => CommandKind::EndPhase(EndPhaseCommand),
        };
        Ok(Command::new(id, player, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_ability_round_trips() {
        let command = Command::use_ability(
            42,
            PlayerId::Two,
            UnitId(7),
            AbilityId(3),
            GridPosition::new(-1, 4),
        )
        .overloaded();

        let wire = command.to_wire();
        assert_eq!(wire.get("commandType").map(String::as_str), Some("UseAbility"));
        assert_eq!(wire.get("playerId").map(String::as_str), Some("2"));
        assert_eq!(Command::from_wire(&wire).unwrap(), command);
    }

    #[test]
    fn end_phase_carries_only_header_fields() {
        let command = Command::end_phase(1, PlayerId::One);
        let wire = command.to_wire();
        assert_eq!(wire.len(), 3);
        assert_eq!(Command::from_wire(&wire).unwrap(), command);
    }

    #[test]
    fn decode_reports_bad_fields() {
        let mut wire = Command::move_unit(5, PlayerId::One, UnitId(1), GridPosition::new(2, 2)).to_wire();
        wire.remove("targetY");
        assert_eq!(
            Command::from_wire(&wire),
            Err(WireError::MissingField("targetY".into()))
        );

        wire.insert("targetY".into(), "north".into());
        assert!(matches!(
            Command::from_wire(&wire),
            Err(WireError::InvalidField { .. })
        ));

        wire.insert("playerId".into(), "3".into());
        wire.insert("targetY".into(), "2".into());
        assert!(matches!(
            Command::from_wire(&wire),
            Err(WireError::InvalidField { field, .. }) if field == "playerId"
        ));

        wire.insert("commandType".into(), "Teleport".into());
        assert_eq!(
            Command::from_wire(&wire),
            Err(WireError::UnknownCommandType("Teleport".into()))
        );
    }
}
