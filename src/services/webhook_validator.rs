// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Structural validation of inbound Wahoo webhook payloads.

use crate::error::AppError;
use crate::models::WebhookEvent;
use validator::Validate;

/// Decode and validate a raw webhook body.
///
/// Only the four top-level fields are required; the contents of
/// `workout_summary` are accepted as sent.
pub fn validate(raw: &[u8]) -> Result<WebhookEvent, AppError> {
    let event: WebhookEvent =
        serde_json::from_slice(raw).map_err(|e| AppError::Decode(e.to_string()))?;

    if let Err(errors) = event.validate() {
        let failed = errors.field_errors();
        let field = WebhookEvent::REQUIRED_FIELDS
            .iter()
            .find(|name| failed.contains_key(**name))
            .copied()
            .unwrap_or("unknown");
        return Err(AppError::SchemaValidation {
            field: field.to_string(),
        });
    }

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};

    const SAMPLE_EVENT: &str = r#"{"event_type":"workout_summary","webhook_token":"b50faa0a-a399-40a7-9c5b-321e9af299df","user":{"id":1120489},"workout_summary":{"id":252869305,"ascent_accum":"179.0","cadence_avg":"67.0","calories_accum":"438.0","distance_accum":"24323.54","duration_active_accum":"3557.0","duration_paused_accum":"121.0","duration_total_accum":"3678.0","heart_rate_avg":"153.0","power_bike_np_last":"154.0","power_bike_tss_last":"45.0","power_avg":"122.0","speed_avg":"6.84","work_accum":"435276.0","created_at":"2024-04-12T18:36:11.000Z","updated_at":"2024-04-12T18:36:11.000Z","file":{"url":"https://cdn.wahooligan.com/wahoo-cloud/production/uploads/workout_file/file/A8dm1z2TPq-mXCZ_5KrKtg/2024-04-12-173445-ELEMNT_BOLT_A6D5-177-0.fit"},"workout":{"id":281788767,"starts":"2024-04-12T17:34:45.000Z","minutes":61,"name":"Cycling","created_at":"2024-04-12T18:36:11.000Z","updated_at":"2024-04-12T18:36:11.000Z","plan_id":null,"workout_token":"ELEMNT BOLT A6D5:177","workout_type_id":0}}}"#;

    #[test]
    fn test_valid_event() {
        let event = validate(SAMPLE_EVENT.as_bytes()).unwrap();

        assert_eq!(event.event_type, "workout_summary");
        assert_eq!(event.user.id, 1120489);
        assert_eq!(event.workout_summary.workout.id, 281788767);
        assert_eq!(event.workout_summary.workout.plan_id, None);
        assert_eq!(event.fit_file_name(), "281788767.fit");
        assert!(event.file_url().ends_with("ELEMNT_BOLT_A6D5-177-0.fit"));
    }

    #[test]
    fn test_roundtrip_is_structurally_equal() {
        let event = validate(SAMPLE_EVENT.as_bytes()).unwrap();
        let encoded = serde_json::to_vec(&event).unwrap();

        // Timestamps may be re-rendered, so compare the decoded forms.
        let again = validate(&encoded).unwrap();
        assert_eq!(event, again);

        let original: Value = serde_json::from_str(SAMPLE_EVENT).unwrap();
        let echoed: Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(original["webhook_token"], echoed["webhook_token"]);
        assert_eq!(
            original["workout_summary"]["speed_avg"],
            echoed["workout_summary"]["speed_avg"]
        );
        assert_eq!(
            original["workout_summary"]["workout"]["plan_id"],
            echoed["workout_summary"]["workout"]["plan_id"]
        );
        assert_eq!(
            original["workout_summary"]["file"]["url"],
            echoed["workout_summary"]["file"]["url"]
        );
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let result = validate(b"{id\":0}}}");
        assert!(matches!(result, Err(AppError::Decode(_))));
    }

    #[test]
    fn test_wrong_shape_is_decode_error() {
        let result = validate(br#"{"event_type": 42}"#);
        assert!(matches!(result, Err(AppError::Decode(_))));
    }

    #[test]
    fn test_unrelated_keys_decode_to_zero_event() {
        let raw = br#"{"my_key":"my_value"}"#;

        let decoded: WebhookEvent = serde_json::from_slice(raw).unwrap();
        assert_eq!(decoded, WebhookEvent::default());

        match validate(raw) {
            Err(AppError::SchemaValidation { field }) => assert_eq!(field, "event_type"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_each_required_field_is_enforced() {
        for field in WebhookEvent::REQUIRED_FIELDS {
            let mut value: Value = serde_json::from_str(SAMPLE_EVENT).unwrap();
            value.as_object_mut().unwrap().remove(field);
            let raw = serde_json::to_vec(&value).unwrap();

            match validate(&raw) {
                Err(AppError::SchemaValidation { field: reported }) => {
                    assert_eq!(reported, field)
                }
                other => panic!("expected {} to be required, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_zero_valued_user_is_missing() {
        let mut value: Value = serde_json::from_str(SAMPLE_EVENT).unwrap();
        value["user"] = json!({});
        let raw = serde_json::to_vec(&value).unwrap();

        assert!(matches!(
            validate(&raw),
            Err(AppError::SchemaValidation { field }) if field == "user"
        ));
    }

    #[test]
    fn test_nested_nulls_decode_to_zero_values() {
        let raw = br#"{"event_type":"workout_summary","webhook_token":"t","user":{"id":1},"workout_summary":{"id":2,"created_at":null,"file":{"url":null},"workout":{"id":3,"name":null,"starts":null,"workout_token":null,"minutes":null}}}"#;

        let event = validate(raw).unwrap();

        let workout = &event.workout_summary.workout;
        assert_eq!(workout.id, 3);
        assert_eq!(workout.name, "");
        assert_eq!(workout.workout_token, "");
        assert_eq!(workout.minutes, 0);
        assert_eq!(workout.starts, DateTime::<Utc>::default());
        assert_eq!(event.workout_summary.created_at, DateTime::<Utc>::default());
        assert_eq!(event.file_url(), "");
        assert_eq!(event.fit_file_name(), "3.fit");
    }

    #[test]
    fn test_null_required_field_is_schema_error() {
        let mut value: Value = serde_json::from_str(SAMPLE_EVENT).unwrap();
        value["webhook_token"] = Value::Null;
        let raw = serde_json::to_vec(&value).unwrap();

        assert!(matches!(
            validate(&raw),
            Err(AppError::SchemaValidation { field }) if field == "webhook_token"
        ));
    }

    #[test]
    fn test_missing_metrics_stay_missing_on_echo() {
        let mut value: Value = serde_json::from_str(SAMPLE_EVENT).unwrap();
        let summary = value["workout_summary"].as_object_mut().unwrap();
        summary.remove("heart_rate_avg");
        summary.insert("power_avg".to_string(), Value::Null);
        let raw = serde_json::to_vec(&value).unwrap();

        let event = validate(&raw).unwrap();
        let echoed = serde_json::to_value(&event).unwrap();

        assert_eq!(event.workout_summary.heart_rate_avg, None);
        assert!(echoed["workout_summary"].get("heart_rate_avg").is_none());
        assert!(echoed["workout_summary"].get("power_avg").is_none());
        assert_eq!(echoed["workout_summary"]["speed_avg"], "6.84");
    }

    #[test]
    fn test_nested_fields_not_required() {
        let raw = json!({
            "event_type": "workout_summary",
            "webhook_token": "token",
            "user": {"id": 1},
            "workout_summary": {"id": 2}
        });
        let event = validate(&serde_json::to_vec(&raw).unwrap()).unwrap();
        assert_eq!(event.file_url(), "");
        assert_eq!(event.fit_file_name(), "0.fit");
    }
}
