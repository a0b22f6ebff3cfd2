// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod file;
pub mod token;
pub mod webhook;

pub use file::FileBlob;
pub use token::TokenResponse;
pub use webhook::{WahooUser, WebhookEvent, Workout, WorkoutFile, WorkoutSummary};
