//! Object storage for anniversary datasets
//!
//! Wraps OpenDAL (filesystem, S3, in-memory) behind a single
//! [`StorageClient`] that reads Parquet datasets and writes Parquet or CSV
//! output addressed by bucket and key.

// Rich diagnostic messages are more valuable than smaller error sizes
#![allow(clippy::result_large_err)]

mod bucket;
mod error;
mod location;
mod storage;

pub use error::{ErrorCode, Result, StorageError};
pub use location::{validate_bucket_name, Location};
pub use storage::StorageClient;
