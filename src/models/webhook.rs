// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wahoo Cloud "workout summary" webhook payload.
//!
//! Missing keys and `null`s decode to zero values so that a structurally
//! empty payload still parses; the required-field rules live in
//! [`WebhookEvent`]'s `Validate` impl.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// Webhook event sent by Wahoo when a workout summary is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WebhookEvent {
    /// e.g. "workout_summary"
    #[serde(deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub event_type: String,
    #[serde(deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub webhook_token: String,
    #[serde(deserialize_with = "null_as_default")]
    #[validate(custom(function = "require_user"))]
    pub user: WahooUser,
    #[serde(deserialize_with = "null_as_default")]
    #[validate(custom(function = "require_workout_summary"))]
    pub workout_summary: WorkoutSummary,
}

impl WebhookEvent {
    /// Required top-level fields, in the order they are reported.
    pub const REQUIRED_FIELDS: [&'static str; 4] =
        ["event_type", "webhook_token", "user", "workout_summary"];

    /// Name under which the workout's FIT file is stored downstream.
    pub fn fit_file_name(&self) -> String {
        format!("{}.fit", self.workout_summary.workout.id)
    }

    /// URL of the FIT file referenced by this event.
    pub fn file_url(&self) -> &str {
        &self.workout_summary.file.url
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WahooUser {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutFile {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// Aggregated workout metrics. Wahoo sends the numbers as strings and
/// leaves out the ones a device did not record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascent_accum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence_avg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_accum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_accum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_active_accum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_paused_accum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_total_accum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate_avg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_bike_np_last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_bike_tss_last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_avg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_avg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_accum: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: DateTime<Utc>,
    #[serde(deserialize_with = "null_as_default")]
    pub file: WorkoutFile,
    #[serde(deserialize_with = "null_as_default")]
    pub workout: Workout,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workout {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub starts: DateTime<Utc>,
    #[serde(deserialize_with = "null_as_default")]
    pub minutes: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: DateTime<Utc>,
    /// Training plan, `null` for free rides
    pub plan_id: Option<serde_json::Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub workout_token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub workout_type_id: i64,
}

/// `null` decodes to the zero value, same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn require_user(user: &WahooUser) -> Result<(), ValidationError> {
    if *user == WahooUser::default() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn require_workout_summary(summary: &WorkoutSummary) -> Result<(), ValidationError> {
    if *summary == WorkoutSummary::default() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}
