// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook processing service.
//!
//! Handles the workflow behind `POST /callback`:
//! 1. Decode and validate the event
//! 2. Download the workout FIT file
//! 3. Hand the file to every configured sink

use crate::config::AckMode;
use crate::error::AppError;
use crate::models::{FileBlob, WebhookEvent};
use crate::services::file_fetcher::FileFetcher;
use crate::services::webhook_validator;
use crate::sinks::{SinkDispatcher, SinkResult};

/// Processes validated webhook events into archived FIT files.
#[derive(Clone)]
pub struct WebhookProcessor {
    fetcher: FileFetcher,
    dispatcher: SinkDispatcher,
    ack_mode: AckMode,
}

impl WebhookProcessor {
    pub fn new(fetcher: FileFetcher, dispatcher: SinkDispatcher, ack_mode: AckMode) -> Self {
        Self {
            fetcher,
            dispatcher,
            ack_mode,
        }
    }

    pub fn ack_mode(&self) -> AckMode {
        self.ack_mode
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.dispatcher.sink_names()
    }

    /// Validate a raw webhook body.
    pub fn accept(&self, raw: &[u8]) -> Result<WebhookEvent, AppError> {
        match webhook_validator::validate(raw) {
            Ok(event) => {
                tracing::info!(
                    event_type = %event.event_type,
                    user_id = event.user.id,
                    workout_id = event.workout_summary.workout.id,
                    "Webhook event accepted"
                );
                Ok(event)
            }
            Err(e) => {
                tracing::error!(error = %e, "Webhook event rejected");
                Err(e)
            }
        }
    }

    /// Download the FIT file referenced by `event`.
    pub async fn fetch(&self, event: &WebhookEvent) -> Result<FileBlob, AppError> {
        let url = event.file_url();
        let file_name = event.fit_file_name();

        self.fetcher.fetch(url, &file_name).await.inspect_err(|e| {
            tracing::error!(
                file_name = %file_name,
                url = %url,
                error = %e,
                "Failed to download FIT file"
            );
        })
    }

    /// Deliver a downloaded file to every sink.
    pub async fn dispatch(&self, blob: &FileBlob) -> Vec<SinkResult> {
        let results = self.dispatcher.dispatch(blob).await;
        let failed = results.iter().filter(|r| !r.success).count();
        tracing::info!(
            file_name = %blob.file_name,
            bytes = blob.len(),
            sinks = results.len(),
            failed,
            "FIT file dispatch complete"
        );
        results
    }

    /// Fetch then dispatch. Used after the sender has been acknowledged.
    pub async fn archive(&self, event: &WebhookEvent) -> Result<Vec<SinkResult>, AppError> {
        let blob = self.fetch(event).await?;
        Ok(self.dispatch(&blob).await)
    }
}
