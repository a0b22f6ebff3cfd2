// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! S3-compatible object storage sink (Tigris by default).
//!
//! The SDK configuration is resolved on first use and cached. A failed
//! resolution is reported as a sink error and retried on the next file.

use super::{Sink, SinkError};
use crate::models::FileBlob;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Region, RequestChecksumCalculation};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::sync::OnceCell;

/// Stores each file in `bucket` under its file name.
pub struct ObjectStorageSink {
    bucket: String,
    endpoint: String,
    region: String,
    client: OnceCell<Client>,
}

impl ObjectStorageSink {
    pub fn new(bucket: &str, endpoint: &str, region: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            endpoint: endpoint.to_string(),
            region: region.to_string(),
            client: OnceCell::new(),
        }
    }

    /// Use an already configured client (tests, custom credentials).
    pub fn with_client(bucket: &str, client: Client) -> Self {
        Self {
            bucket: bucket.to_string(),
            endpoint: String::new(),
            region: String::new(),
            client: OnceCell::new_with(Some(client)),
        }
    }

    async fn client(&self) -> Result<&Client, SinkError> {
        self.client
            .get_or_try_init(|| async {
                let sdk_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(self.region.clone()))
                    .load()
                    .await;

                if sdk_config.credentials_provider().is_none() {
                    return Err(SinkError::Config(
                        "no credentials provider available".to_string(),
                    ));
                }

                let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                    .endpoint_url(&self.endpoint)
                    .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
                    .build();

                tracing::info!(endpoint = %self.endpoint, region = %self.region, "Object storage client ready");
                Ok(Client::from_conf(s3_config))
            })
            .await
    }
}

#[async_trait]
impl Sink for ObjectStorageSink {
    fn name(&self) -> &'static str {
        "object_storage"
    }

    async fn deliver(&self, blob: &FileBlob) -> Result<(), SinkError> {
        if self.bucket.is_empty() {
            return Err(SinkError::Config("bucket name is empty".to_string()));
        }

        let client = self.client().await?;

        client
            .put_object()
            .bucket(&self.bucket)
            .key(&blob.file_name)
            .content_type("application/octet-stream")
            .body(ByteStream::from(blob.bytes.clone()))
            .send()
            .await
            .map_err(|e| SinkError::PutObject(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(bucket = %self.bucket, key = %blob.file_name, "Uploaded FIT file");
        Ok(())
    }
}
