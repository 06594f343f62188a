//! Ability catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{AbilityCatalog, AbilityDefinition};

use crate::loaders::{LoadResult, read_file};

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AbilityCatalogRon {
    abilities: Vec<AbilityDefinition>,
}

/// Loader for ability catalogs from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load an ability catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse an ability catalog. Duplicate ids are an error.
    pub fn parse(content: &str) -> LoadResult<AbilityCatalog> {
        let data: AbilityCatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for definition in &data.abilities {
            if !seen.insert(definition.id) {
                anyhow::bail!("Duplicate ability id {}", definition.id.0);
            }
        }
        Ok(data.abilities.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{AbilityEffect, AbilityId, AbilityOracle, StatusEffectKind, ZoneTypeId};

    const CATALOG: &str = r#"
        (
            abilities: [
                (
                    id: AbilityId(1),
                    name: "Cinder Field",
                    range: 3,
                    resource_cost: 2,
                    cooldown: 1,
                    charge: 5,
                    effect: CreateZone(ZoneTypeId(10)),
                ),
                (
                    id: AbilityId(2),
                    name: "Hush",
                    range: 2,
                    resource_cost: 1,
                    cooldown: 2,
                    overload_threshold: 6,
                    effect: ApplyStatus(kind: Silenced, duration: 1, potency: 0),
                ),
            ],
        )
    "#;

    #[test]
    fn parses_definitions_with_defaults() {
        let catalog = AbilityLoader::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let field = catalog.ability(AbilityId(1)).unwrap();
        assert_eq!(field.effect, AbilityEffect::CreateZone(ZoneTypeId(10)));
        assert_eq!(field.overload_threshold, 0);
        assert!(!field.can_overload());

        let hush = catalog.ability(AbilityId(2)).unwrap();
        assert_eq!(hush.charge, 0);
        assert!(matches!(
            hush.effect,
            AbilityEffect::ApplyStatus {
                kind: StatusEffectKind::Silenced,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let content = r#"
            (
                abilities: [
                    (id: AbilityId(4), name: "a", range: 1, resource_cost: 0, cooldown: 0, effect: Damage(1)),
                    (id: AbilityId(4), name: "b", range: 1, resource_cost: 0, cooldown: 0, effect: Heal(1)),
                ],
            )
        "#;
        let err = AbilityLoader::parse(content).unwrap_err();
        assert!(err.to_string().contains("Duplicate ability id 4"));
    }
}
