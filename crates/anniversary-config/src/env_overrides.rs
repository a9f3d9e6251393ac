use super::{FsConfig, LogFormat, RuntimeConfig, S3Config, StorageBackend};
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "ANNIVERSARY_";

/// Abstraction over environment-variable lookups so tests can supply
/// their own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the ANNIVERSARY_ prefix
    /// Used for AWS standard variables (AWS_ACCESS_KEY_ID, etc.)
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.log.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }

    // Storage backend
    if let Some(backend) = get_env_string(env, "STORAGE_BACKEND") {
        config.storage.backend = backend
            .parse::<StorageBackend>()
            .context("Invalid ANNIVERSARY_STORAGE_BACKEND value")?;
    }
    if let Some(row_group_size) = get_env_usize(env, "PARQUET_ROW_GROUP_SIZE")? {
        config.storage.parquet_row_group_size = row_group_size;
    }

    // Filesystem storage
    if let Some(path) = get_env_string(env, "STORAGE_PATH") {
        config.storage.fs.get_or_insert_with(FsConfig::default).path = path;
    }

    // S3 storage
    if let Some(region) = get_env_string(env, "S3_REGION").or_else(|| env.get_raw("AWS_REGION"))
    {
        ensure_s3(config).region = region;
    }
    if let Some(endpoint) =
        get_env_string(env, "S3_ENDPOINT").or_else(|| env.get_raw("AWS_ENDPOINT_URL"))
    {
        ensure_s3(config).endpoint = Some(endpoint);
    }
    // AWS standard credentials (without ANNIVERSARY_ prefix for compatibility)
    if let Some(access_key_id) = env.get_raw("AWS_ACCESS_KEY_ID") {
        ensure_s3(config).access_key_id = Some(access_key_id);
    }
    if let Some(secret_access_key) = env.get_raw("AWS_SECRET_ACCESS_KEY") {
        ensure_s3(config).secret_access_key = Some(secret_access_key);
    }

    // Generator
    if let Some(key) = get_env_string(env, "DATASET_KEY") {
        config.generator.dataset_key = key;
    }
    if let Some(rows) = get_env_usize(env, "DEFAULT_ROWS")? {
        config.generator.default_rows = rows;
    }

    Ok(())
}

fn ensure_s3(config: &mut RuntimeConfig) -> &mut S3Config {
    config.storage.s3.get_or_insert_with(S3Config::default)
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key).filter(|v| !v.trim().is_empty())
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    match get_env_string(env, key) {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| anyhow!("{}{} must be a positive integer: {}", ENV_PREFIX, key, e)),
        None => Ok(None),
    }
}
