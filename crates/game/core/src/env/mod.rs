//! Traits describing read-only collaborators.
//!
//! Oracles expose grid geometry and reachability, ability definitions, and
//! zone type data. The [`Env`] aggregate bundles them so the engine can reach
//! everything it needs without hard coupling to concrete implementations.
mod abilities;
mod error;
mod grid;
mod snapshot;
mod zones;

pub use abilities::{AbilityDefinition, AbilityEffect, AbilityId, AbilityOracle};
pub use error::OracleError;
pub use grid::{GridDimensions, GridOracle};
pub use snapshot::{AbilityCatalog, GridSnapshot, ZoneCatalog};
pub use zones::{ZoneEffect, ZoneOracle, ZoneSpec, ZoneTypeId};

/// Aggregates read-only oracles required by the command pipeline and resolvers.
#[derive(Debug)]
pub struct Env<'a, G, A, Z>
where
    G: GridOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    Z: ZoneOracle + ?Sized,
{
    grid: Option<&'a G>,
    abilities: Option<&'a A>,
    zones: Option<&'a Z>,
}

pub type MatchEnv<'a> = Env<'a, dyn GridOracle + 'a, dyn AbilityOracle + 'a, dyn ZoneOracle + 'a>;

// Only references are held, so the bundle is Copy whatever the oracle types are.
impl<G, A, Z> Clone for Env<'_, G, A, Z>
where
    G: GridOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    Z: ZoneOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<G, A, Z> Copy for Env<'_, G, A, Z>
where
    G: GridOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    Z: ZoneOracle + ?Sized,
{
}

impl<'a, G, A, Z> Env<'a, G, A, Z>
where
    G: GridOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    Z: ZoneOracle + ?Sized,
{
    pub fn new(grid: Option<&'a G>, abilities: Option<&'a A>, zones: Option<&'a Z>) -> Self {
        Self {
            grid,
            abilities,
            zones,
        }
    }

    pub fn with_all(grid: &'a G, abilities: &'a A, zones: &'a Z) -> Self {
        Self::new(Some(grid), Some(abilities), Some(zones))
    }

    pub fn empty() -> Self {
        Self {
            grid: None,
            abilities: None,
            zones: None,
        }
    }

    /// Returns the GridOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::GridNotAvailable` if no grid oracle was provided.
    pub fn grid(&self) -> Result<&'a G, OracleError> {
        self.grid.ok_or(OracleError::GridNotAvailable)
    }

    /// Returns the AbilityOracle, or an error if not available.
    pub fn abilities(&self) -> Result<&'a A, OracleError> {
        self.abilities.ok_or(OracleError::AbilitiesNotAvailable)
    }

    /// Returns the ZoneOracle, or an error if not available.
    pub fn zones(&self) -> Result<&'a Z, OracleError> {
        self.zones.ok_or(OracleError::ZonesNotAvailable)
    }

    /// Looks up an ability definition.
    ///
    /// # Errors
    ///
    /// `AbilitiesNotAvailable` when the oracle is missing, `AbilityNotFound`
    /// when the id is unknown to it.
    pub fn ability(&self, id: AbilityId) -> Result<AbilityDefinition, OracleError> {
        self.abilities()?
            .ability(id)
            .ok_or(OracleError::AbilityNotFound(id))
    }

    /// Looks up zone type data.
    pub fn zone_type(&self, id: ZoneTypeId) -> Result<ZoneSpec, OracleError> {
        self.zones()?
            .zone_type(id)
            .ok_or(OracleError::ZoneTypeNotFound(id))
    }
}

impl<'a, G, A, Z> Env<'a, G, A, Z>
where
    G: GridOracle + 'a,
    A: AbilityOracle + 'a,
    Z: ZoneOracle + 'a,
{
    /// Converts this environment into a trait-object based `MatchEnv`.
    pub fn as_match_env(&self) -> MatchEnv<'a> {
        let grid: Option<&'a dyn GridOracle> = self.grid.map(|grid| grid as _);
        let abilities: Option<&'a dyn AbilityOracle> = self.abilities.map(|abilities| abilities as _);
        let zones: Option<&'a dyn ZoneOracle> = self.zones.map(|zones| zones as _);
        Env::new(grid, abilities, zones)
    }
}
