//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Match configuration (TOML)
//! - Ability catalogs (RON)
//! - Zone type catalogs (RON)
//! - Grid layouts (RON)
//!
//! Content is consumed by runtime oracles and never appears in match state.
//! All loaders use tactics-core types directly with serde for deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ConfigLoader, ContentBundle, ContentFactory, GridLoader, LoadResult,
    ZoneLoader,
};
