// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wahoo OAuth token response.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Token exchange response from Wahoo.
///
/// Every field is required; a zero or empty value is treated the same as
/// a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TokenResponse {
    #[validate(length(min = 1))]
    pub access_token: String,
    #[validate(length(min = 1))]
    pub token_type: String,
    /// Lifetime of the access token in seconds
    #[validate(range(min = 1))]
    pub expires_in: i64,
    #[validate(length(min = 1))]
    pub refresh_token: String,
    /// Space separated scopes granted by the user
    #[validate(length(min = 1))]
    pub scope: String,
    /// Unix timestamp of token creation
    #[validate(range(min = 1))]
    pub created_at: i64,
}

impl TokenResponse {
    /// Decode and validate a raw token response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, String> {
        let token: TokenResponse =
            serde_json::from_slice(body).map_err(|e| format!("JSON parse error: {}", e))?;
        token
            .validate()
            .map_err(|e| format!("validation failed: {}", e))?;
        Ok(token)
    }
}
