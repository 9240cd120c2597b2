//! Configuration validation
//!
//! Runs the config's own checks and adds the ones that only matter for a serving process.

use anyhow::Result;
use tubely_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.max_memory_bytes > config.max_upload_bytes {
        tracing::warn!(
            max_memory_bytes = config.max_memory_bytes,
            max_upload_bytes = config.max_upload_bytes,
            "MAX_MEMORY_BYTES exceeds MAX_UPLOAD_BYTES; uploads will never spill to disk"
        );
    }

    if config.is_production() && config.public_base_url.starts_with("http://localhost") {
        tracing::warn!(
            public_base_url = %config.public_base_url,
            "PUBLIC_BASE_URL points at localhost in production; thumbnail URLs will not resolve for clients"
        );
    }

    Ok(())
}
