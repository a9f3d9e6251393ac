// anniversary-config - Unified configuration for the CLI and Lambda runtimes
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from ANNIVERSARY_CONFIG env var
// 3. Config file contents from ANNIVERSARY_CONFIG_CONTENT env var
// 4. Default config file locations (./anniversary.toml, ./.anniversary.toml)
// 5. Platform-specific defaults (lowest priority)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod env_overrides;
mod platform;
mod sources;
mod validation;

pub use env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};
pub use platform::Platform;

/// Hard ceiling on generated dataset size.
pub const MAX_GENERATED_ROWS: usize = 1_000_000;

/// Main runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub storage: StorageConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default = "default_parquet_row_group_size")]
    pub parquet_row_group_size: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs: Option<FsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Config>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Fs,
    S3,
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Fs => write!(f, "fs"),
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

fn default_parquet_row_group_size() -> usize {
    32 * 1024
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fs" | "filesystem" => Ok(StorageBackend::Fs),
            "s3" | "aws" | "minio" => Ok(StorageBackend::S3),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            _ => anyhow::bail!(
                "Unsupported storage backend: {}. Supported: fs, s3, memory",
                s
            ),
        }
    }
}

/// Local filesystem storage. Each bucket is a directory under `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsConfig {
    pub path: String,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            path: "./data".to_string(),
        }
    }
}

/// S3 or S3-compatible storage (MinIO, LocalStack).
///
/// Buckets are chosen per request, so only connection settings live here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Fixture generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Object key the generated dataset is written to inside the bucket
    pub dataset_key: String,
    /// Row count used when the caller does not ask for one
    pub default_rows: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dataset_key: "sample.parquet".to_string(),
            default_rows: 100_000,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        let platform = Platform::detect();
        sources::load_config(platform)
    }

    /// Load configuration starting from an explicit file (CLI `--config`)
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Build the lowest-priority configuration for a platform
    pub fn from_platform_defaults(platform: Platform) -> Self {
        let defaults = platform.defaults();
        let backend = defaults.storage_backend;

        Self {
            storage: StorageConfig {
                backend,
                parquet_row_group_size: default_parquet_row_group_size(),
                fs: (backend == StorageBackend::Fs).then(FsConfig::default),
                s3: (backend == StorageBackend::S3).then(S3Config::default),
            },
            log: LogConfig {
                level: "info".to_string(),
                format: defaults.log_format,
            },
            generator: GeneratorConfig::default(),
        }
    }

    /// Overlay values from a parsed config file. File values win over defaults.
    pub fn merge(&mut self, other: RuntimeConfig) {
        self.storage.backend = other.storage.backend;
        self.storage.parquet_row_group_size = other.storage.parquet_row_group_size;
        if other.storage.fs.is_some() {
            self.storage.fs = other.storage.fs;
        }
        if other.storage.s3.is_some() {
            self.storage.s3 = other.storage.s3;
        }
        self.log = other.log;
        self.generator = other.generator;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
