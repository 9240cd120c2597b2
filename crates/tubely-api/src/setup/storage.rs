//! Asset storage setup

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{LocalStorage, Storage};

/// Open the asset root, creating it if needed.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = LocalStorage::new(&config.assets_root)
        .await
        .with_context(|| {
            format!(
                "Failed to initialize asset root {}",
                config.assets_root.display()
            )
        })?;

    storage
        .health_check()
        .await
        .context("Asset root is not writable")?;

    tracing::info!(
        assets_root = %storage.base_path().display(),
        assets_url = %config.assets_base_url(),
        "Asset storage initialized"
    );

    Ok(Arc::new(storage))
}
