// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Download of workout FIT files referenced by webhook events.

use crate::error::AppError;
use crate::models::FileBlob;
use bytes::BytesMut;

/// Downloads a file into memory, refusing anything over `max_bytes`.
#[derive(Clone)]
pub struct FileFetcher {
    http: reqwest::Client,
    max_bytes: usize,
}

impl FileFetcher {
    pub fn new(http: reqwest::Client, max_bytes: usize) -> Self {
        Self { http, max_bytes }
    }

    /// GET `url` once and buffer the body as `file_name`.
    pub async fn fetch(&self, url: &str, file_name: &str) -> Result<FileBlob, AppError> {
        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Download(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Download(format!(
                "file host returned HTTP {}",
                status
            )));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes as u64 {
                return Err(AppError::Download(format!(
                    "file is {} bytes, limit is {}",
                    len, self.max_bytes
                )));
            }
        }

        // Content-Length is advisory; enforce the cap while reading too.
        let mut buf = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AppError::Download(format!("reading body failed: {}", e)))?
        {
            if buf.len() + chunk.len() > self.max_bytes {
                return Err(AppError::Download(format!(
                    "file exceeds limit of {} bytes",
                    self.max_bytes
                )));
            }
            buf.extend_from_slice(&chunk);
        }

        let blob = FileBlob::new(file_name, buf.freeze());
        if blob.is_empty() {
            tracing::warn!(file_name, "Downloaded FIT file is empty");
        } else {
            tracing::info!(file_name, bytes = blob.len(), "FIT file downloaded");
        }
        Ok(blob)
    }
}
