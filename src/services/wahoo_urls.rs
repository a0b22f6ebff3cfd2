// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wahoo OAuth URL construction.
//!
//! Values are inserted into the query string exactly as configured. Wahoo
//! expects the redirect URI to match the registered one character for
//! character, so nothing is re-encoded here: characters the URL parser would
//! escape are rejected instead, and the returned URL serializes to exactly
//! the composed string.

use crate::error::AppError;
use url::Url;

/// Scopes requested from Wahoo, already percent-encoded.
pub const WAHOO_SCOPES: &str = "user_read%20workouts_read%20offline_data";

/// Build the provider authorize URL the user is redirected to.
pub fn build_authorize_url(
    auth_base_url: &str,
    client_id: &str,
    redirect_uri: &str,
) -> Result<Url, AppError> {
    check_query_value("client_id", client_id)?;
    check_redirect_uri(redirect_uri)?;

    let raw = format!(
        "{}?client_id={}&redirect_uri={}&scope={}&response_type=code",
        auth_base_url, client_id, redirect_uri, WAHOO_SCOPES
    );
    parse_composed(&raw)
}

/// Build the token endpoint URL used to trade `code` for tokens.
pub fn build_token_exchange_url(
    token_base_url: &str,
    client_id: &str,
    client_secret: &str,
    code: &str,
    redirect_uri: &str,
) -> Result<Url, AppError> {
    if code.is_empty() {
        return Err(AppError::MissingCode);
    }
    check_query_value("client_id", client_id)?;
    check_query_value("client_secret", client_secret)?;
    check_query_value("code", code)?;
    check_redirect_uri(redirect_uri)?;

    let raw = format!(
        "{}?client_id={}&client_secret={}&code={}&grant_type=authorization_code&redirect_uri={}",
        token_base_url, client_id, client_secret, code, redirect_uri
    );
    parse_composed(&raw)
}

/// Reject characters the URL parser would percent-encode in a query, plus
/// `#`, which would end the query.
fn check_query_value(name: &str, value: &str) -> Result<(), AppError> {
    if let Some(c) = value.chars().find(|c| {
        !c.is_ascii() || c.is_ascii_control() || c.is_whitespace() || "\"#'<>".contains(*c)
    }) {
        return Err(AppError::MalformedInput(format!(
            "{} contains invalid character {:?}",
            name, c
        )));
    }
    Ok(())
}

/// Reject redirect URIs the provider would refuse once it percent-decodes them.
fn check_redirect_uri(redirect_uri: &str) -> Result<(), AppError> {
    check_query_value("redirect_uri", redirect_uri)?;

    let bytes = redirect_uri.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'%' {
            continue;
        }
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
            return Err(AppError::MalformedInput(format!(
                "redirect_uri has a broken percent escape at offset {}",
                i
            )));
        }
    }

    let decoded = urlencoding::decode(redirect_uri).map_err(|e| {
        AppError::MalformedInput(format!("redirect_uri does not decode to UTF-8: {}", e))
    })?;
    if decoded.chars().any(char::is_control) {
        return Err(AppError::MalformedInput(
            "redirect_uri decodes to control characters".to_string(),
        ));
    }

    Ok(())
}

fn parse_composed(raw: &str) -> Result<Url, AppError> {
    Url::parse(raw).map_err(|e| AppError::MalformedInput(format!("invalid URL {}: {}", raw, e)))
}
