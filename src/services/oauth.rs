// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wahoo OAuth authorization-code exchange.
//!
//! The flow moves through `AwaitingCode → Exchanging → Authorized | Failed`.
//! A callback without a code stays in `AwaitingCode` and sends the user back
//! to the authorize URL; anything else makes exactly one token request.
//! Tokens are returned to the caller and never stored.

use crate::config::Config;
use crate::error::AppError;
use crate::models::TokenResponse;
use crate::services::wahoo_urls::{build_authorize_url, build_token_exchange_url};
use reqwest::header;
use url::Url;

/// Where a single OAuth flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    AwaitingCode,
    Exchanging,
    Authorized,
    Failed,
}

impl ExchangeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeState::AwaitingCode => "awaiting_code",
            ExchangeState::Exchanging => "exchanging",
            ExchangeState::Authorized => "authorized",
            ExchangeState::Failed => "failed",
        }
    }
}

/// Result of handling the provider's callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// No code was supplied; the caller should redirect here and start over.
    NeedsRedirect(Url),
    /// Code exchanged successfully.
    Authorized(TokenResponse),
}

/// OAuth client for a single registered Wahoo application.
#[derive(Clone)]
pub struct OAuthExchanger {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_base_url: String,
    token_base_url: String,
}

impl OAuthExchanger {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            client_id: config.wahoo_client_id.clone(),
            client_secret: config.wahoo_client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            auth_base_url: config.auth_base_url.clone(),
            token_base_url: config.token_base_url.clone(),
        }
    }

    /// Authorize URL the user is sent to at the start of the flow.
    pub fn authorize(&self) -> Result<Url, AppError> {
        let url = build_authorize_url(&self.auth_base_url, &self.client_id, &self.redirect_uri)?;
        tracing::info!(
            client_id = %self.client_id,
            state = ExchangeState::AwaitingCode.as_str(),
            "Starting OAuth flow, redirecting to Wahoo"
        );
        Ok(url)
    }

    /// Handle the provider callback.
    pub async fn handle_callback(&self, code: Option<&str>) -> Result<CallbackOutcome, AppError> {
        let code = match code {
            Some(c) if !c.is_empty() => c,
            _ => {
                tracing::info!(
                    state = ExchangeState::AwaitingCode.as_str(),
                    "No code in OAuth callback, restarting authorization"
                );
                return Ok(CallbackOutcome::NeedsRedirect(self.authorize()?));
            }
        };

        tracing::info!(
            state = ExchangeState::Exchanging.as_str(),
            "Exchanging authorization code for tokens"
        );

        match self.exchange_code(code).await {
            Ok(token) => {
                tracing::info!(
                    state = ExchangeState::Authorized.as_str(),
                    scope = %token.scope,
                    expires_in = token.expires_in,
                    "OAuth exchange successful"
                );
                Ok(CallbackOutcome::Authorized(token))
            }
            Err(e) => {
                tracing::error!(
                    state = ExchangeState::Failed.as_str(),
                    error = %e,
                    "OAuth exchange failed"
                );
                Err(e)
            }
        }
    }

    /// Exchange authorization code for tokens (single attempt).
    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AppError> {
        let url = build_token_exchange_url(
            &self.token_base_url,
            &self.client_id,
            &self.client_secret,
            code,
            &self.redirect_uri,
        )?;

        // Wahoo reads everything from the query string; the body stays empty.
        let response = self
            .http
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| AppError::UpstreamExchange {
                status: None,
                body: format!("Token exchange request failed: {}", e),
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::UpstreamExchange {
                status: Some(status.as_u16()),
                body: format!("Failed to read token response: {}", e),
            })?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            tracing::error!(status = %status, body = %body, "Wahoo token exchange failed");
            return Err(AppError::UpstreamExchange {
                status: Some(status.as_u16()),
                body,
            });
        }

        TokenResponse::from_slice(&body).map_err(AppError::MalformedTokenResponse)
    }
}
