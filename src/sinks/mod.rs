// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Downstream destinations for fetched FIT files.
//!
//! Every configured sink gets its own copy of the file. Sinks run
//! concurrently, each under its own deadline, and a failing sink is logged
//! and recorded without affecting the others or the webhook response.

pub mod forwarder;
pub mod object_storage;

pub use forwarder::ExternalForwarderSink;
pub use object_storage::ObjectStorageSink;

use crate::config::Config;
use crate::models::FileBlob;
use async_trait::async_trait;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;

/// Per-sink failure. Never converted into an HTTP error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("sink configuration error: {0}")]
    Config(String),

    #[error("put object failed: {0}")]
    PutObject(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// A destination that accepts a copy of a FIT file.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Stable name used in logs and results.
    fn name(&self) -> &'static str;

    async fn deliver(&self, blob: &FileBlob) -> Result<(), SinkError>;
}

/// Outcome of one sink for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkResult {
    pub sink_name: &'static str,
    pub success: bool,
    pub error: Option<SinkError>,
}

/// Fans a file out to every configured sink.
#[derive(Clone)]
pub struct SinkDispatcher {
    sinks: Vec<Arc<dyn Sink>>,
    deadline: Duration,
}

impl SinkDispatcher {
    pub fn new(sinks: Vec<Arc<dyn Sink>>, deadline: Duration) -> Self {
        Self { sinks, deadline }
    }

    /// Build the sinks enabled by `config`.
    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        let mut sinks: Vec<Arc<dyn Sink>> = Vec::new();

        match config.object_storage_bucket() {
            Some(bucket) => {
                tracing::info!(
                    bucket,
                    endpoint = %config.storage_endpoint,
                    "Object storage sink enabled"
                );
                sinks.push(Arc::new(ObjectStorageSink::new(
                    bucket,
                    &config.storage_endpoint,
                    &config.storage_region,
                )));
            }
            None => tracing::info!("Object storage sink disabled"),
        }

        match &config.fitfile_service_url {
            Some(url) => {
                tracing::info!(url = %url, "External forwarder sink enabled");
                sinks.push(Arc::new(ExternalForwarderSink::new(http, url.clone())));
            }
            None => tracing::info!(
                "No external service URL configured; FIT files will not be forwarded"
            ),
        }

        Self::new(sinks, config.upstream_timeout)
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Deliver `blob` to every sink. Results come back in sink order.
    pub async fn dispatch(&self, blob: &FileBlob) -> Vec<SinkResult> {
        let deliveries = self.sinks.iter().map(|sink| async move {
            let outcome = match tokio::time::timeout(self.deadline, sink.deliver(blob)).await {
                Ok(result) => result,
                Err(_) => Err(SinkError::Timeout(self.deadline)),
            };

            match outcome {
                Ok(()) => {
                    tracing::info!(
                        sink = sink.name(),
                        file_name = %blob.file_name,
                        "FIT file delivered"
                    );
                    SinkResult {
                        sink_name: sink.name(),
                        success: true,
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::error!(
                        sink = sink.name(),
                        file_name = %blob.file_name,
                        error = %e,
                        "FIT file delivery failed"
                    );
                    SinkResult {
                        sink_name: sink.name(),
                        success: false,
                        error: Some(e),
                    }
                }
            }
        });

        join_all(deliveries).await
    }
}
