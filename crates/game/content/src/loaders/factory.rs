//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use tactics_core::{
    AbilityCatalog, AbilityEffect, GridSnapshot, MatchConfig, ZoneCatalog, ZoneOracle,
};
use tracing::debug;

use crate::loaders::{AbilityLoader, ConfigLoader, GridLoader, LoadResult, ZoneLoader};

/// Everything a host needs to run one match: rules plus read-only oracles.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub config: MatchConfig,
    pub grid: GridSnapshot,
    pub abilities: AbilityCatalog,
    pub zones: ZoneCatalog,
}

/// Content factory that loads all match content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── abilities.ron
/// ├── zones.ron
/// └── grids/
///     ├── skirmish.ron
///     └── crossroads.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load match configuration from `config.toml`, or defaults when the
    /// file is absent.
    pub fn load_config(&self) -> LoadResult<MatchConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(MatchConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<AbilityCatalog> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load the zone type catalog from `zones.ron`.
    pub fn load_zones(&self) -> LoadResult<ZoneCatalog> {
        ZoneLoader::load(&self.data_dir.join("zones.ron"))
    }

    /// Load a grid layout from `grids/{grid_name}.ron`.
    pub fn load_grid(&self, grid_name: &str) -> LoadResult<GridSnapshot> {
        let path = self.data_dir.join("grids").join(format!("{}.ron", grid_name));
        GridLoader::load(&path)
    }

    /// Load config, catalogs and the named grid in one go.
    ///
    /// Ability effects that create zones must reference a zone type present
    /// in the zone catalog, and no zone radius may exceed the grid.
    pub fn load_bundle(&self, grid_name: &str) -> LoadResult<ContentBundle> {
        let config = self.load_config()?;
        let abilities = self.load_abilities()?;
        let zones = self.load_zones()?;
        let grid = self.load_grid(grid_name)?;

        for definition in abilities.iter() {
            if let AbilityEffect::CreateZone(zone_type) = definition.effect
                && zones.zone_type(zone_type).is_none()
            {
                anyhow::bail!(
                    "Ability '{}' creates unknown zone type {}",
                    definition.name,
                    zone_type.0
                );
            }
        }

        let span = grid.dimensions.columns.max(grid.dimensions.rows);
        if let Some(spec) = zones.iter().find(|spec| spec.radius > span) {
            anyhow::bail!(
                "Zone '{}' radius {} is larger than grid '{}' ({}x{})",
                spec.name,
                spec.radius,
                grid_name,
                grid.dimensions.columns,
                grid.dimensions.rows
            );
        }

        debug!(
            abilities = abilities.len(),
            zones = zones.len(),
            grid = grid_name,
            "content bundle loaded"
        );
        Ok(ContentBundle {
            config,
            grid,
            abilities,
            zones,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
