// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_storage_config(&config.storage)?;
    validate_log_config(&config.log)?;
    validate_generator_config(&config.generator)?;
    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<()> {
    if config.parquet_row_group_size == 0 {
        bail!("storage.parquet_row_group_size must be greater than 0");
    }

    match config.backend {
        StorageBackend::Fs => {
            let fs = config
                .fs
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("fs storage backend requires 'fs' configuration"))?;

            if fs.path.is_empty() {
                bail!("storage.fs.path must not be empty");
            }
        }
        StorageBackend::S3 => {
            let s3 = config
                .s3
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("s3 storage backend requires 's3' configuration"))?;

            if s3.region.is_empty() {
                bail!("storage.s3.region is required for S3 backend");
            }

            // Credentials may come from an instance role, so only warn here.
            // Bucket creation reports the missing pair explicitly.
            if s3.access_key_id.is_some() != s3.secret_access_key.is_some() {
                warn!("storage.s3 has only one of access_key_id / secret_access_key set");
            }
        }
        StorageBackend::Memory => {}
    }

    Ok(())
}

fn validate_log_config(config: &LogConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("log.level must not be empty");
    }
    Ok(())
}

fn validate_generator_config(config: &GeneratorConfig) -> Result<()> {
    if config.dataset_key.trim().is_empty() {
        bail!("generator.dataset_key must not be empty");
    }

    if config.dataset_key.starts_with('/') {
        bail!("generator.dataset_key must be relative to the bucket");
    }

    if config.default_rows > MAX_GENERATED_ROWS {
        bail!(
            "generator.default_rows must be at most {}, got {}",
            MAX_GENERATED_ROWS,
            config.default_rows
        );
    }

    Ok(())
}
