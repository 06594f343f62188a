//! Match configuration loader.

use std::path::Path;

use tactics_core::{MatchConfig, ZoneSpec};

use crate::loaders::{LoadResult, read_file};

/// Loader for match configuration from TOML files.
///
/// Missing keys fall back to [`MatchConfig::default`] values.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<MatchConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MatchConfig> {
        let config: MatchConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_zones_per_tile == 0 {
            anyhow::bail!("max_zones_per_tile must be at least 1");
        }
        if config.volatile_zone_radius > ZoneSpec::MAX_RADIUS {
            anyhow::bail!(
                "volatile_zone_radius {} exceeds the maximum of {}",
                config.volatile_zone_radius,
                ZoneSpec::MAX_RADIUS
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            max_zones_per_tile = 3
            overload_multiplier_percent = 200
            "#,
        )
        .unwrap();

        assert_eq!(config.max_zones_per_tile, 3);
        assert_eq!(config.overload_multiplier_percent, 200);
        assert_eq!(config.void_duration, MatchConfig::DEFAULT_VOID_DURATION);
        assert_eq!(config.total_move_threshold, MatchConfig::DEFAULT_TOTAL_MOVE_THRESHOLD);
    }

    #[test]
    fn empty_file_is_default_config() {
        assert_eq!(ConfigLoader::parse("").unwrap(), MatchConfig::default());
    }

    #[test]
    fn zero_zone_capacity_is_rejected() {
        assert!(ConfigLoader::parse("max_zones_per_tile = 0").is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = ConfigLoader::parse("void_duration = \"two\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config TOML"));
    }

    #[test]
    fn oversized_volatile_radius_is_rejected() {
        assert!(ConfigLoader::parse("volatile_zone_radius = 100000").is_err());
    }
}
