// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Authorization code missing")]
    MissingCode,

    /// The provider rejected the exchange (`status` set) or could not be
    /// reached at all (`status` is `None`).
    #[error("Token exchange failed (status {status:?}): {body}")]
    UpstreamExchange { status: Option<u16>, body: String },

    #[error("Malformed token response: {0}")]
    MalformedTokenResponse(String),

    #[error("Invalid webhook payload: {0}")]
    Decode(String),

    #[error("Webhook payload missing required field: {field}")]
    SchemaValidation { field: String },

    #[error("File download failed: {0}")]
    Download(String),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Only reachable when the ack waits for the fetch; tells the
            // sender to try again later.
            AppError::Download(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error, details) = match &self {
            AppError::MalformedInput(msg) => {
                tracing::error!(error = %msg, "Malformed OAuth input");
                ("malformed_input", None)
            }
            AppError::MissingCode => ("missing_code", None),
            AppError::UpstreamExchange {
                status: Some(_),
                body,
            } if !body.is_empty() => {
                // Echo the provider's own error body verbatim.
                return (
                    status,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    body.clone(),
                )
                    .into_response();
            }
            AppError::UpstreamExchange { .. } => ("upstream_error", None),
            AppError::MalformedTokenResponse(_) => ("malformed_token_response", None),
            AppError::Decode(msg) => ("invalid_json", Some(msg.clone())),
            AppError::SchemaValidation { field } => ("missing_field", Some(field.clone())),
            AppError::Download(_) => ("download_failed", None),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
