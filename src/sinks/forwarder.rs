// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Forwards FIT files to an external HTTP service as a multipart upload.

use super::{Sink, SinkError};
use crate::models::FileBlob;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

/// POSTs each file to `url` as the multipart field `file`.
pub struct ExternalForwarderSink {
    http: reqwest::Client,
    url: String,
}

impl ExternalForwarderSink {
    pub fn new(http: reqwest::Client, url: String) -> Self {
        Self { http, url }
    }
}

#[async_trait]
impl Sink for ExternalForwarderSink {
    fn name(&self) -> &'static str {
        "external_forwarder"
    }

    async fn deliver(&self, blob: &FileBlob) -> Result<(), SinkError> {
        let part = Part::bytes(blob.bytes.to_vec())
            .file_name(blob.file_name.clone())
            .mime_str("application/octet-stream")
            .map_err(|e| SinkError::Config(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = %status, url = %self.url, "External service accepted FIT file");
        Ok(())
    }
}
