//! Bucket/key addressing

use crate::error::{Result, StorageError};
use std::fmt;

const S3_SCHEME: &str = "s3://";

/// An object address: bucket plus key inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub bucket: String,
    pub key: String,
}

impl Location {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Build a location after checking both parts
    pub fn try_new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let location = Self::new(bucket, key);
        location.validate()?;
        Ok(location)
    }

    /// Parse `s3://bucket/key` or `bucket/key`.
    ///
    /// The key may contain further slashes. Slashes directly after the
    /// bucket are dropped.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let rest = trimmed.strip_prefix(S3_SCHEME).unwrap_or(trimmed);

        if rest.contains("://") {
            return Err(StorageError::invalid_location(
                input,
                "only s3:// locations are supported",
            ));
        }

        let (bucket, key) = rest.split_once('/').ok_or_else(|| {
            StorageError::invalid_location(input, "expected <bucket>/<key>")
        })?;
        let key = key.trim_start_matches('/');

        Self::try_new(bucket, key).map_err(|e| match e {
            StorageError::InvalidLocation { reason, .. } => {
                StorageError::invalid_location(input, reason)
            }
            other => other,
        })
    }

    /// Reject anything that would address outside the bucket on a
    /// directory-backed store
    pub fn validate(&self) -> Result<()> {
        validate_bucket_name(&self.bucket)?;

        let key = &self.key;
        if key.is_empty() || key.ends_with('/') {
            return Err(StorageError::invalid_location(
                self.to_string(),
                "key must name an object",
            ));
        }
        if key.starts_with('/') || key.split('/').any(is_relative_segment) {
            return Err(StorageError::invalid_location(
                self.to_string(),
                "key must not contain '.' or '..' segments or start with '/'",
            ));
        }
        Ok(())
    }
}

/// Bucket names are a single path segment
pub fn validate_bucket_name(bucket: &str) -> Result<()> {
    if bucket.trim().is_empty() {
        return Err(StorageError::invalid_location(bucket, "bucket name is empty"));
    }
    if bucket.contains('/') || bucket.contains('\\') {
        return Err(StorageError::invalid_location(
            bucket,
            "bucket name must not contain a path separator",
        ));
    }
    if is_relative_segment(bucket) {
        return Err(StorageError::invalid_location(
            bucket,
            "bucket name must not be '.' or '..'",
        ));
    }
    Ok(())
}

fn is_relative_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", S3_SCHEME, self.bucket, self.key)
    }
}
