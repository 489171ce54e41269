use crate::errors::{Error, Result};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

static BUCKET_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9.-]*[a-z0-9]$").expect("valid regex"));

/// Rejects bucket names that S3 would refuse or that could smuggle path
/// segments into the object URL.
pub fn validate_bucket_name(bucket: &str) -> Result<()> {
    if !BUCKET_NAME_RE.is_match(bucket) {
        return Err(Error::InvalidBucket(
            bucket.to_string(),
            "must contain only lowercase letters, numbers, dots, and hyphens",
        ));
    }
    if bucket.len() < 3 || bucket.len() > 63 {
        return Err(Error::InvalidBucket(
            bucket.to_string(),
            "must be between 3 and 63 characters",
        ));
    }
    Ok(())
}

pub struct Uploader {
    client: Client,
    bucket: String,
}

impl Uploader {
    /// Builds an S3 client from the default credential and region chain.
    pub async fn from_env(bucket: String) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
            bucket,
        }
    }

    pub async fn upload_file(&self, local_file: &Path, key: &str) -> Result<()> {
        let body = tokio::fs::read(local_file).await?;
        debug!("Uploading {} bytes to s3://{}/{}", body.len(), self.bucket, key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("text/csv")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| Error::Upload {
                file: local_file.display().to_string(),
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
