//! Fixture generation pipeline: create bucket, generate rows, write Parquet

use crate::error::HandlerError;
use anniversary_core::{generate_records, records_to_batch, MAX_ROWS};
use anniversary_writer::{Location, StorageClient};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRequest {
    pub bucket: String,
    pub key: String,
    pub num_rows: usize,
    /// Fixed seed for a reproducible dataset; random when `None`
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSummary {
    pub location: Location,
    pub row_count: usize,
    pub bytes_written: usize,
    /// Whether bucket creation reported success. Writing is attempted either way.
    pub bucket_created: bool,
}

/// Generate `num_rows` synthetic employees and store them at `bucket/key`.
///
/// The row limit is checked before anything touches storage.
pub async fn generate_fixtures(
    storage: &StorageClient,
    request: &FixtureRequest,
) -> Result<FixtureSummary, HandlerError> {
    if request.num_rows > MAX_ROWS {
        return Err(HandlerError::invalid_argument(format!(
            "Row number too large, try at most {} rows (requested {})",
            MAX_ROWS, request.num_rows
        )));
    }

    let location = Location::new(request.bucket.as_str(), request.key.as_str());
    let bucket_created = storage.create_bucket(&request.bucket).await;

    let records = match request.seed {
        Some(seed) => generate_records(request.num_rows, &mut StdRng::seed_from_u64(seed))?,
        None => generate_records(request.num_rows, &mut rand::thread_rng())?,
    };
    let batch = records_to_batch(&records)?;
    let bytes_written = storage.write_dataset(&location, &batch).await?;

    tracing::info!(
        location = %location,
        rows = batch.num_rows(),
        bytes = bytes_written,
        "Wrote fixture dataset"
    );

    Ok(FixtureSummary {
        location,
        row_count: batch.num_rows(),
        bytes_written,
        bucket_created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(num_rows: usize) -> FixtureRequest {
        FixtureRequest {
            bucket: "fixtures".to_string(),
            key: "sample.parquet".to_string(),
            num_rows,
            seed: Some(5),
        }
    }

    #[tokio::test]
    async fn test_generate_fixtures_writes_dataset() {
        let storage = StorageClient::memory().unwrap();
        let summary = generate_fixtures(&storage, &request(500)).await.unwrap();

        assert!(summary.bucket_created);
        assert_eq!(summary.row_count, 500);
        assert_eq!(summary.location, Location::new("fixtures", "sample.parquet"));

        let dataset = storage.read_dataset(&summary.location).await.unwrap();
        assert_eq!(dataset.num_rows(), 500);
    }

    #[tokio::test]
    async fn test_generate_fixtures_rejects_too_many_rows() {
        let storage = StorageClient::memory().unwrap();
        let err = generate_fixtures(&storage, &request(MAX_ROWS + 1))
            .await
            .unwrap_err();

        assert_eq!(err.error_type(), "InvalidArgument");
        assert!(storage
            .read_bytes(&Location::new("fixtures", "sample.parquet"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_seeded_fixtures_are_identical() {
        let storage = StorageClient::memory().unwrap();
        let first = generate_fixtures(&storage, &request(100)).await.unwrap();
        let a = storage.read_bytes(&first.location).await.unwrap();

        generate_fixtures(&storage, &request(100)).await.unwrap();
        let b = storage.read_bytes(&first.location).await.unwrap();
        assert_eq!(a, b);
    }
}
