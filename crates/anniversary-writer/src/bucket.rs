//! Best-effort bucket creation
//!
//! Setup is allowed to degrade: [`StorageClient::create_bucket`] logs the
//! failure and returns `false` instead of erroring. Callers that want the
//! reason use [`StorageClient::try_create_bucket`].

use crate::error::{Result, StorageError};
use crate::location::validate_bucket_name;
use crate::storage::StorageClient;
use anniversary_config::S3Config;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};

/// Region where S3 rejects an explicit location constraint
const DEFAULT_REGION: &str = "us-east-1";

impl StorageClient {
    /// Create `bucket` if it does not exist. Returns `true` on success,
    /// including when the bucket was already there.
    pub async fn create_bucket(&self, bucket: &str) -> bool {
        match self.try_create_bucket(bucket).await {
            Ok(()) => {
                tracing::info!(bucket, "Bucket ready");
                true
            }
            Err(err @ StorageError::MissingCredentials { .. }) => {
                tracing::error!(bucket, "Key not found: {}", err);
                false
            }
            Err(err) => {
                tracing::error!(bucket, "Failed to create bucket: {}", err);
                false
            }
        }
    }

    /// Create `bucket`, reporting why it failed
    pub async fn try_create_bucket(&self, bucket: &str) -> Result<()> {
        validate_bucket_name(bucket)?;

        if let Some(s3) = self.s3_config() {
            return create_s3_bucket(s3, bucket).await;
        }

        match self.rooted_operator() {
            Some(operator) => operator
                .create_dir(&format!("{}/", bucket))
                .await
                .map_err(|e| StorageError::from_opendal(bucket, e)),
            None => Err(StorageError::invalid_config(
                "storage backend has neither an S3 config nor a root operator",
            )),
        }
    }
}

async fn create_s3_bucket(s3: &S3Config, bucket: &str) -> Result<()> {
    // Bucket creation needs explicit keys; instance roles are not consulted here
    let access_key_id = s3
        .access_key_id
        .clone()
        .ok_or_else(|| StorageError::missing_credentials("AWS_ACCESS_KEY_ID"))?;
    let secret_access_key = s3
        .secret_access_key
        .clone()
        .ok_or_else(|| StorageError::missing_credentials("AWS_SECRET_ACCESS_KEY"))?;

    let credentials = aws_credential_types::Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "anniversary",
    );

    let mut config = aws_sdk_s3::config::Builder::new()
        .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new(s3.region.clone()))
        .credentials_provider(credentials)
        .force_path_style(true);

    if let Some(endpoint) = &s3.endpoint {
        config = config.endpoint_url(endpoint);
    }

    let client = aws_sdk_s3::Client::from_conf(config.build());
    let mut request = client.create_bucket().bucket(bucket);

    if s3.region != DEFAULT_REGION {
        request = request.create_bucket_configuration(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(s3.region.as_str()))
                .build(),
        );
    }

    match request.send().await {
        Ok(_) => Ok(()),
        Err(err) => {
            if err
                .as_service_error()
                .is_some_and(|e| e.is_bucket_already_owned_by_you())
            {
                tracing::debug!(bucket, "Bucket already exists");
                return Ok(());
            }
            Err(StorageError::unavailable(
                format!("s3://{}", bucket),
                DisplayErrorContext(&err),
            ))
        }
    }
}
