//! Shared read-only oracles for a running match.
//!
//! [`OracleBundle`] holds the grid layout and the ability and zone catalogs
//! behind `Arc`s so the worker and any number of sessions can build
//! [`tactics_core::MatchEnv`] views on demand. The data never changes while a
//! match runs; dynamic state lives in [`tactics_core::MatchState`].

use std::sync::Arc;

use tactics_content::ContentBundle;
use tactics_core::{AbilityCatalog, Env, GridSnapshot, MatchConfig, MatchEnv, ZoneCatalog};

#[derive(Clone, Debug)]
pub struct OracleBundle {
    grid: Arc<GridSnapshot>,
    abilities: Arc<AbilityCatalog>,
    zones: Arc<ZoneCatalog>,
}

impl OracleBundle {
    pub fn new(grid: GridSnapshot, abilities: AbilityCatalog, zones: ZoneCatalog) -> Self {
        Self {
            grid: Arc::new(grid),
            abilities: Arc::new(abilities),
            zones: Arc::new(zones),
        }
    }

    /// Splits a loaded content bundle into match rules and oracles.
    pub fn from_content(bundle: ContentBundle) -> (MatchConfig, Self) {
        let ContentBundle {
            config,
            grid,
            abilities,
            zones,
        } = bundle;
        (config, Self::new(grid, abilities, zones))
    }

    /// Borrowed trait-object view consumed by the engine.
    pub fn as_match_env(&self) -> MatchEnv<'_> {
        Env::with_all(self.grid.as_ref(), self.abilities.as_ref(), self.zones.as_ref())
            .as_match_env()
    }

    pub fn grid(&self) -> &GridSnapshot {
        &self.grid
    }

    pub fn abilities(&self) -> &AbilityCatalog {
        &self.abilities
    }

    pub fn zones(&self) -> &ZoneCatalog {
        &self.zones
    }
}
