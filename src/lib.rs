// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wahoo-Relay: archive Wahoo workout files as they are recorded
//!
//! This crate provides a small HTTP service that completes the Wahoo
//! OAuth authorization-code flow and receives workout webhooks, copying
//! each workout's FIT file to object storage and/or an external service.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod sinks;

use config::Config;
use services::{OAuthExchanger, WebhookProcessor};
use std::time::Duration;
use tokio_util::task::TaskTracker;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub oauth: OAuthExchanger,
    pub webhook_processor: WebhookProcessor,
    /// Archive work that outlives the webhook response.
    pub background_tasks: TaskTracker,
}

impl AppState {
    /// Wire up all services from `config`, sharing one HTTP client.
    pub fn new(config: Config, http: reqwest::Client) -> Self {
        let dispatcher = sinks::SinkDispatcher::from_config(&config, http.clone());
        Self::with_dispatcher(config, http, dispatcher)
    }

    /// Like [`AppState::new`] but with an explicit set of sinks.
    pub fn with_dispatcher(
        config: Config,
        http: reqwest::Client,
        dispatcher: sinks::SinkDispatcher,
    ) -> Self {
        let oauth = OAuthExchanger::new(&config, http.clone());
        let fetcher = services::FileFetcher::new(http, config.max_file_bytes);
        let webhook_processor = WebhookProcessor::new(fetcher, dispatcher, config.ack_mode);

        Self {
            config,
            oauth,
            webhook_processor,
            background_tasks: TaskTracker::new(),
        }
    }

    /// Close the task tracker and wait up to `grace` for tracked archive
    /// work to finish. Returns `false` if some was still running.
    pub async fn drain_background_tasks(&self, grace: Duration) -> bool {
        self.background_tasks.close();

        let pending = self.background_tasks.len();
        if pending > 0 {
            tracing::info!(pending, "Waiting for background archive tasks");
        }

        match tokio::time::timeout(grace, self.background_tasks.wait()).await {
            Ok(()) => true,
            Err(_) => {
                tracing::error!(
                    pending = self.background_tasks.len(),
                    "Shutdown grace period expired, abandoning archive tasks"
                );
                false
            }
        }
    }
}
