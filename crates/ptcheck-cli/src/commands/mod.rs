//! CLI command implementations

pub mod check;
pub mod completions;
pub mod config;
pub mod list;

use std::path::Path;
use std::sync::Arc;

use ptcheck_storage::MemorySource;

/// Load an OSM JSON file into a shared source
pub async fn load_source(path: &Path) -> anyhow::Result<Arc<MemorySource>> {
    let dataset = ptcheck_storage::load_file(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?;
    tracing::info!("Loaded {} primitives from {}", dataset.len(), path.display());
    Ok(Arc::new(MemorySource::from_dataset(dataset)))
}
