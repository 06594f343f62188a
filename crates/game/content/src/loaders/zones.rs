//! Zone type catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{ZoneCatalog, ZoneSpec, ZoneTypeId};

use crate::loaders::{LoadResult, read_file};

/// Zone catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ZoneCatalogRon {
    zones: Vec<ZoneSpec>,
}

/// Loader for zone type catalogs from RON files.
pub struct ZoneLoader;

impl ZoneLoader {
    /// Load a zone catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ZoneCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a zone catalog.
    ///
    /// Rejects duplicate ids, the id reserved for volatile zones, stack
    /// caps of zero, radii above [`ZoneSpec::MAX_RADIUS`], and durations
    /// below [`ZoneSpec::PERMANENT`].
    pub fn parse(content: &str) -> LoadResult<ZoneCatalog> {
        let data: ZoneCatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse zone catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for spec in &data.zones {
            if spec.id == ZoneTypeId::VOLATILE {
                anyhow::bail!("Zone '{}' uses the reserved volatile id", spec.name);
            }
            if !seen.insert(spec.id) {
                anyhow::bail!("Duplicate zone type id {}", spec.id.0);
            }
            if spec.max_stacks == 0 {
                anyhow::bail!("Zone '{}' has max_stacks 0", spec.name);
            }
            if spec.radius > ZoneSpec::MAX_RADIUS {
                anyhow::bail!(
                    "Zone '{}' radius {} exceeds the maximum of {}",
                    spec.name,
                    spec.radius,
                    ZoneSpec::MAX_RADIUS
                );
            }
            if spec.duration < ZoneSpec::PERMANENT {
                anyhow::bail!(
                    "Zone '{}' has duration {} (use -1 for permanent)",
                    spec.name,
                    spec.duration
                );
            }
        }
        Ok(data.zones.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{ZoneEffect, ZoneOracle};

    #[test]
    fn parses_merge_and_resonance_rules() {
        let content = r#"
            (
                zones: [
                    (
                        id: ZoneTypeId(10),
                        name: "Cinders",
                        radius: 1,
                        duration: 2,
                        effect: DamageOverTime(potency: 4, duration: 2),
                        tags: ["fire"],
                        merges_with: [ZoneTypeId(10), ZoneTypeId(11)],
                        max_stacks: 3,
                        resonance_tags: ["fire"],
                        resonance_multiplier_percent: 125,
                    ),
                    (
                        id: ZoneTypeId(20),
                        name: "Sanctum",
                        radius: 0,
                        duration: -1,
                        effect: Heal(5),
                    ),
                ],
            )
        "#;
        let catalog = ZoneLoader::parse(content).unwrap();

        let cinders = catalog.zone_type(ZoneTypeId(10)).unwrap();
        assert_eq!(cinders.max_stacks, 3);
        assert!(cinders.accepts_merge(ZoneTypeId(11)));
        assert_eq!(cinders.resonance_multiplier_percent, 125);

        let sanctum = catalog.zone_type(ZoneTypeId(20)).unwrap();
        assert!(sanctum.is_permanent());
        assert_eq!(sanctum.effect, ZoneEffect::Heal(5));
        assert_eq!(sanctum.max_stacks, 1);
        assert_eq!(sanctum.resonance_multiplier_percent, 100);
        assert!(sanctum.tags.is_empty());
    }

    #[test]
    fn reserved_volatile_id_is_rejected() {
        let content = format!(
            r#"(zones: [(id: ZoneTypeId({}), name: "x", radius: 0, duration: 1, effect: Damage(1))])"#,
            u32::MAX
        );
        assert!(ZoneLoader::parse(&content).is_err());
    }

    #[test]
    fn oversized_radius_is_rejected() {
        let content =
            r#"(zones: [(id: ZoneTypeId(1), name: "Sky", radius: 2147483648, duration: 1, effect: Damage(1))])"#;
        let err = ZoneLoader::parse(content).unwrap_err();
        assert!(err.to_string().contains("radius 2147483648"));
    }

    #[test]
    fn duration_below_permanent_is_rejected() {
        let content =
            r#"(zones: [(id: ZoneTypeId(1), name: "Rot", radius: 0, duration: -5, effect: Damage(1))])"#;
        let err = ZoneLoader::parse(content).unwrap_err();
        assert!(err.to_string().contains("duration -5"));
    }
}
