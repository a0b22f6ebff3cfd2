// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use wahoo_relay::config::Config;
use wahoo_relay::models::FileBlob;
use wahoo_relay::routes::create_router;
use wahoo_relay::sinks::{Sink, SinkDispatcher, SinkError};
use wahoo_relay::AppState;

/// Webhook payload captured from a real Wahoo delivery.
#[allow(dead_code)]
pub const SAMPLE_EVENT: &str = r#"{"event_type":"workout_summary","webhook_token":"b50faa0a-a399-40a7-9c5b-321e9af299df","user":{"id":1120489},"workout_summary":{"id":252869305,"ascent_accum":"179.0","cadence_avg":"67.0","calories_accum":"438.0","distance_accum":"24323.54","duration_active_accum":"3557.0","duration_paused_accum":"121.0","duration_total_accum":"3678.0","heart_rate_avg":"153.0","power_bike_np_last":"154.0","power_bike_tss_last":"45.0","power_avg":"122.0","speed_avg":"6.84","work_accum":"435276.0","created_at":"2024-04-12T18:36:11.000Z","updated_at":"2024-04-12T18:36:11.000Z","file":{"url":"https://cdn.wahooligan.com/wahoo-cloud/production/uploads/workout_file/file/A8dm1z2TPq-mXCZ_5KrKtg/2024-04-12-173445-ELEMNT_BOLT_A6D5-177-0.fit"},"workout":{"id":281788767,"starts":"2024-04-12T17:34:45.000Z","minutes":61,"name":"Cycling","created_at":"2024-04-12T18:36:11.000Z","updated_at":"2024-04-12T18:36:11.000Z","plan_id":null,"workout_token":"ELEMNT BOLT A6D5:177","workout_type_id":0}}}"#;

/// `SAMPLE_EVENT` with the file URL pointing at `file_url`.
#[allow(dead_code)]
pub fn sample_event_with_file(file_url: &str) -> Vec<u8> {
    let mut value: serde_json::Value = serde_json::from_str(SAMPLE_EVENT).unwrap();
    value["workout_summary"]["file"]["url"] = serde_json::Value::from(file_url);
    serde_json::to_vec(&value).unwrap()
}

/// Create a test app with the given config and sinks.
#[allow(dead_code)]
pub fn create_test_app(config: Config, sinks: Vec<Arc<dyn Sink>>) -> axum::Router {
    create_test_app_with_state(config, sinks).0
}

/// Create a test app and return the shared state alongside the router.
#[allow(dead_code)]
pub fn create_test_app_with_state(
    config: Config,
    sinks: Vec<Arc<dyn Sink>>,
) -> (axum::Router, Arc<AppState>) {
    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .unwrap();
    let dispatcher = SinkDispatcher::new(sinks, Duration::from_secs(2));
    let state = Arc::new(AppState::with_dispatcher(config, http, dispatcher));
    (create_router(state.clone()), state)
}

/// Sink that forwards every delivered file to a channel.
#[allow(dead_code)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<FileBlob>,
}

#[allow(dead_code)]
impl ChannelSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<FileBlob>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait]
impl Sink for ChannelSink {
    fn name(&self) -> &'static str {
        "channel"
    }

    async fn deliver(&self, blob: &FileBlob) -> Result<(), SinkError> {
        self.tx
            .send(blob.clone())
            .map_err(|e| SinkError::Transport(e.to_string()))
    }
}

/// Sink that always fails.
#[allow(dead_code)]
pub struct FailingSink;

#[async_trait]
impl Sink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn deliver(&self, _blob: &FileBlob) -> Result<(), SinkError> {
        Err(SinkError::PutObject("bucket unavailable".to_string()))
    }
}
