//! Deterministic turn-based tactics rules.
//!
//! `tactics-core` defines the canonical match rules (phases, commands,
//! batched movement, zones) and exposes pure APIs that hosts drive one step
//! at a time. All state mutation flows through [`engine::MatchEngine`];
//! collaborators (grid reachability, ability and zone catalogs) are injected
//! through [`env::Env`].
pub mod command;
pub mod config;
pub mod effect;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod movement;
pub mod phase;
pub mod snapshot;
pub mod state;
pub mod zone;

pub use command::{
    Command, CommandId, CommandKind, CommandOutcome, CommandRejection, CommandTransition,
    CommandType, EndPhaseCommand, MoveCommand, RepositionCommand, UseAbilityCommand, WireError,
    WireMap,
};
pub use config::MatchConfig;
pub use engine::{EngineError, MatchEngine};
pub use env::{
    AbilityCatalog, AbilityDefinition, AbilityEffect, AbilityId, AbilityOracle, Env,
    GridDimensions, GridOracle, GridSnapshot, MatchEnv, OracleError, ZoneCatalog, ZoneEffect,
    ZoneOracle, ZoneSpec, ZoneTypeId,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use events::{EffectSource, EventQueue, MatchEvent};
pub use movement::{MoveRejection, MovementReport, MovementResolver, PendingMove};
pub use phase::{PhaseChange, PhaseMachine, TransitionError};
pub use snapshot::{MatchSnapshot, UnitSnapshot, ZoneSnapshot};
pub use state::{
    ActivePlayer, GridIndex, GridPosition, MatchState, Phase, PlayerId, ResourceMeter, StateError,
    StatusEffectInstance, StatusEffectKind, StatusEffects, TurnState, Unit, UnitId, UnitRegistry,
    VoidSpace, ZoneField, ZoneId, ZoneInstance,
};
pub use zone::{ZonePlacement, ZoneResolution};
