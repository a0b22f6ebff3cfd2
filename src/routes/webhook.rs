// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for Wahoo workout events.

use crate::config::AckMode;
use crate::error::Result;
use crate::models::WebhookEvent;
use crate::routes::auth::auth_callback;
use crate::AppState;
use axum::{body::Bytes, extract::State, routing::get, Json, Router};
use std::sync::Arc;

/// Webhook routes.
///
/// Wahoo posts events to the same `/callback` path used for the OAuth
/// redirect, so both methods are registered here.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/callback", get(auth_callback).post(handle_event))
}

/// Handle incoming webhook events (POST).
///
/// The validated event is echoed back as the acknowledgement. Archiving the
/// FIT file happens on a tracked background task that shutdown waits for;
/// its outcome never changes the response.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<WebhookEvent>> {
    let processor = state.webhook_processor.clone();
    let event = processor.accept(&body)?;

    match processor.ack_mode() {
        AckMode::Immediate => {
            let background = event.clone();
            state.background_tasks.spawn(async move {
                // Failures are logged by the processor.
                let _ = processor.archive(&background).await;
            });
        }
        AckMode::AfterFetch => {
            let blob = processor.fetch(&event).await?;
            state.background_tasks.spawn(async move {
                processor.dispatch(&blob).await;
            });
        }
    }

    tracing::info!(
        workout_id = event.workout_summary.workout.id,
        "Webhook event acknowledged"
    );
    Ok(Json(event))
}
