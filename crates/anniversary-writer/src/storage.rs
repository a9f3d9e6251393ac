//! Storage client construction and object I/O
//!
//! A [`StorageClient`] is built once at startup from [`StorageConfig`] and
//! handed to whatever needs it. Nothing here is global, so tests can swap in
//! the in-memory backend.

use crate::error::{Result, StorageError};
use crate::location::Location;
use anniversary_config::{S3Config, StorageBackend, StorageConfig};
use anniversary_core::{decode_parquet, encode_csv, encode_parquet, writer_properties};
use arrow::array::RecordBatch;
use bytes::Bytes;
use opendal::Operator;
use std::fmt;

#[derive(Clone)]
enum Backend {
    /// One operator for everything; buckets are top-level directories
    Rooted {
        kind: StorageBackend,
        operator: Operator,
    },
    /// One operator per bucket, built on demand
    S3(S3Config),
}

/// Handle to the object store used by the generator and the filter handler
#[derive(Clone)]
pub struct StorageClient {
    backend: Backend,
    row_group_size: usize,
}

impl fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageClient")
            .field("backend", &self.backend_kind())
            .field("row_group_size", &self.row_group_size)
            .finish()
    }
}

impl StorageClient {
    /// Build a client from the storage section of the runtime config
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let client = match config.backend {
            StorageBackend::Fs => {
                let fs = config.fs.as_ref().ok_or_else(|| {
                    StorageError::invalid_config("fs config required for filesystem backend")
                })?;
                tracing::info!("Using filesystem storage at: {}", fs.path);
                Self::fs(&fs.path)?
            }
            StorageBackend::S3 => {
                let s3 = config.s3.clone().ok_or_else(|| {
                    StorageError::invalid_config("s3 config required for S3 backend")
                })?;
                tracing::info!(
                    region = %s3.region,
                    endpoint = s3.endpoint.as_deref().unwrap_or("aws"),
                    "Using S3 storage"
                );
                Self::s3(s3)
            }
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage; nothing will persist");
                Self::memory()?
            }
        };

        Ok(client.with_row_group_size(config.parquet_row_group_size))
    }

    /// Local filesystem rooted at `root`
    pub fn fs(root: &str) -> Result<Self> {
        let builder = opendal::services::Fs::default().root(root);
        let operator = Operator::new(builder)
            .map_err(|e| StorageError::unavailable(root, e))?
            .finish();
        Ok(Self::rooted(StorageBackend::Fs, operator))
    }

    /// Process-local store, contents vanish with the client
    pub fn memory() -> Result<Self> {
        let operator = Operator::new(opendal::services::Memory::default())
            .map_err(|e| StorageError::unavailable("memory", e))?
            .finish();
        Ok(Self::rooted(StorageBackend::Memory, operator))
    }

    /// S3 or any S3-compatible endpoint
    pub fn s3(config: S3Config) -> Self {
        Self {
            backend: Backend::S3(config),
            row_group_size: default_row_group_size(),
        }
    }

    fn rooted(kind: StorageBackend, operator: Operator) -> Self {
        Self {
            backend: Backend::Rooted { kind, operator },
            row_group_size: default_row_group_size(),
        }
    }

    pub fn with_row_group_size(mut self, row_group_size: usize) -> Self {
        if row_group_size > 0 {
            self.row_group_size = row_group_size;
        }
        self
    }

    pub fn backend_kind(&self) -> StorageBackend {
        match &self.backend {
            Backend::Rooted { kind, .. } => *kind,
            Backend::S3(_) => StorageBackend::S3,
        }
    }

    pub(crate) fn s3_config(&self) -> Option<&S3Config> {
        match &self.backend {
            Backend::S3(config) => Some(config),
            Backend::Rooted { .. } => None,
        }
    }

    /// Operator for the bucket's root, used for directory-style bucket creation
    pub(crate) fn rooted_operator(&self) -> Option<&Operator> {
        match &self.backend {
            Backend::Rooted { operator, .. } => Some(operator),
            Backend::S3(_) => None,
        }
    }

    /// Map a location to an operator and the path inside it
    fn resolve(&self, location: &Location) -> Result<(Operator, String)> {
        location.validate()?;

        match &self.backend {
            Backend::Rooted { operator, .. } => Ok((
                operator.clone(),
                format!("{}/{}", location.bucket, location.key),
            )),
            Backend::S3(s3) => {
                let mut builder = opendal::services::S3::default()
                    .bucket(&location.bucket)
                    .region(&s3.region);

                if let Some(endpoint) = &s3.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                if let Some(key) = &s3.access_key_id {
                    builder = builder.access_key_id(key);
                }
                if let Some(secret) = &s3.secret_access_key {
                    builder = builder.secret_access_key(secret);
                }

                let operator = Operator::new(builder)
                    .map_err(|e| StorageError::unavailable(location.to_string(), e))?
                    .finish();
                Ok((operator, location.key.clone()))
            }
        }
    }

    /// Read a whole object into memory
    pub async fn read_bytes(&self, location: &Location) -> Result<Bytes> {
        let (operator, path) = self.resolve(location)?;
        let buffer = operator
            .read(&path)
            .await
            .map_err(|e| StorageError::from_opendal(&location.to_string(), e))?;
        Ok(buffer.to_bytes())
    }

    /// Write a whole object, replacing any existing one
    pub async fn write_bytes(&self, location: &Location, data: Vec<u8>) -> Result<()> {
        let (operator, path) = self.resolve(location)?;
        operator
            .write(&path, data)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::from_opendal(&location.to_string(), e))
    }

    /// Load a Parquet dataset as a single record batch
    pub async fn read_dataset(&self, location: &Location) -> Result<RecordBatch> {
        let bytes = self.read_bytes(location).await?;
        let size = bytes.len();
        let batch = decode_parquet(bytes)
            .map_err(|e| StorageError::read_failure(location.to_string(), e))?;

        tracing::debug!(
            location = %location,
            bytes = size,
            rows = batch.num_rows(),
            "Loaded dataset"
        );
        Ok(batch)
    }

    /// Persist a record batch as Parquet. Returns the number of bytes written.
    pub async fn write_dataset(&self, location: &Location, batch: &RecordBatch) -> Result<usize> {
        let bytes = encode_parquet(batch, writer_properties(self.row_group_size))
            .map_err(|e| StorageError::write_failure(location.to_string(), e))?;
        let size = bytes.len();
        self.write_bytes(location, bytes).await?;

        tracing::debug!(location = %location, bytes = size, rows = batch.num_rows(), "Wrote Parquet");
        Ok(size)
    }

    /// Persist a record batch as CSV. Returns the number of bytes written.
    pub async fn write_csv(&self, location: &Location, batch: &RecordBatch) -> Result<usize> {
        let bytes =
            encode_csv(batch).map_err(|e| StorageError::write_failure(location.to_string(), e))?;
        let size = bytes.len();
        self.write_bytes(location, bytes).await?;

        tracing::debug!(location = %location, bytes = size, rows = batch.num_rows(), "Wrote CSV");
        Ok(size)
    }
}

fn default_row_group_size() -> usize {
    32 * 1024
}
