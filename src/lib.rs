//! anniversary - synthetic employee fixtures and tenure filtering
//!
//! The binary wires configuration, tracing and storage together and hands the
//! storage client to the request handlers. The pieces live in workspace crates:
//!
//! - `anniversary-config`: layered runtime configuration
//! - `anniversary-core`: schema, generator, tenure filter, Parquet/CSV codecs
//! - `anniversary-writer`: object storage access through OpenDAL
//! - `anniversary-handlers`: request validation, pipelines and envelopes

use anniversary_config::{LogConfig, LogFormat, RuntimeConfig, StorageBackend};
use anniversary_writer::StorageClient;
use anyhow::{Context, Result};
use std::path::Path;

pub use anniversary_handlers::{
    generate_fixtures, handle_tenure_request, FixtureRequest, FixtureSummary, TenureResponse,
};

/// Initialize tracing subscriber from the log configuration
pub fn init_tracing(log: &LogConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_new(&log.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr; stdout carries command output.
    // Try to set the global subscriber; ignore error if already set (idempotent)
    let _ = match log.format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_writer(std::io::stderr)),
        ),
        LogFormat::Text => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().with_writer(std::io::stderr)),
        ),
    };
}

/// Build the storage client once at startup.
///
/// The filesystem root is created up front so the first write does not fail
/// on a missing directory.
pub fn init_storage(config: &RuntimeConfig) -> Result<StorageClient> {
    if config.storage.backend == StorageBackend::Fs {
        let fs = config
            .storage
            .fs
            .as_ref()
            .context("filesystem backend requires storage.fs configuration")?;
        let root = Path::new(&fs.path);
        if !root.exists() {
            std::fs::create_dir_all(root)
                .with_context(|| format!("Failed to create storage directory: {}", fs.path))?;
        }
    }

    let storage = StorageClient::from_config(&config.storage)
        .context("Failed to initialize storage client")?;

    tracing::info!(
        backend = %storage.backend_kind(),
        row_group_size = config.storage.parquet_row_group_size,
        "Storage initialized"
    );

    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anniversary_config::{FsConfig, Platform};

    #[test]
    fn test_init_tracing_is_idempotent() {
        let log = LogConfig::default();
        init_tracing(&log);
        init_tracing(&log);
    }

    #[test]
    fn test_init_storage_creates_fs_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("data");

        let mut config = RuntimeConfig::from_platform_defaults(Platform::Local);
        config.storage.fs = Some(FsConfig {
            path: root.to_string_lossy().to_string(),
        });

        let storage = init_storage(&config).unwrap();
        assert_eq!(storage.backend_kind(), StorageBackend::Fs);
        assert!(root.is_dir());
    }

    #[test]
    fn test_init_storage_memory() {
        let mut config = RuntimeConfig::from_platform_defaults(Platform::Local);
        config.storage.backend = StorageBackend::Memory;
        config.storage.fs = None;

        let storage = init_storage(&config).unwrap();
        assert_eq!(storage.backend_kind(), StorageBackend::Memory);
    }
}
