// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wahoo OAuth authentication routes.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

use crate::error::Result;
use crate::services::CallbackOutcome;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    // The webhook shares `/callback` with the OAuth callback (POST vs GET);
    // see `webhook::routes`.
    Router::new()
        .route("/", get(auth_callback))
        .route("/authorize", get(authorize))
}

/// Query parameters on the provider callback.
#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
}

/// Permanent redirect, as Wahoo's registered flow expects.
fn moved_permanently(location: &Url) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.as_str().to_string())],
    )
        .into_response()
}

/// Start OAuth flow - redirect to Wahoo authorization.
async fn authorize(State(state): State<Arc<AppState>>) -> Result<Response> {
    let url = state.oauth.authorize()?;
    Ok(moved_permanently(&url))
}

/// OAuth callback - exchange the code for tokens and return them.
pub(crate) async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    match state.oauth.handle_callback(params.code.as_deref()).await? {
        CallbackOutcome::NeedsRedirect(url) => Ok(moved_permanently(&url)),
        CallbackOutcome::Authorized(token) => Ok(Json(token).into_response()),
    }
}
