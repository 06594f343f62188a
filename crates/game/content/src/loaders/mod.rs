//! Content loaders for reading match data from files.
//!
//! Each loader exposes `load(path)` for files and `parse(str)` for inline
//! content, and converts the data straight into tactics-core types.

pub mod abilities;
pub mod config;
pub mod factory;
pub mod grid;
pub mod zones;

pub use abilities::AbilityLoader;
pub use config::ConfigLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use grid::GridLoader;
pub use zones::ZoneLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
