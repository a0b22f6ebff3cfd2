// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod file_fetcher;
pub mod oauth;
pub mod wahoo_urls;
pub mod webhook;
pub mod webhook_validator;

pub use file_fetcher::FileFetcher;
pub use oauth::{CallbackOutcome, ExchangeState, OAuthExchanger};
pub use webhook::WebhookProcessor;
