// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup and handed to the services by
//! reference; request handlers never touch the process environment.

use std::env;
use std::time::Duration;

/// Default Wahoo OAuth authorize endpoint.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://api.wahooligan.com/oauth/authorize";
/// Default Wahoo OAuth token endpoint.
pub const DEFAULT_TOKEN_BASE_URL: &str = "https://api.wahooligan.com/oauth/token";
/// Default S3-compatible endpoint (Tigris on Fly.io).
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://fly.storage.tigris.dev";
/// Largest FIT file we are willing to buffer (32 MiB).
pub const DEFAULT_MAX_FILE_BYTES: usize = 32 * 1024 * 1024;

/// When the webhook acknowledgement is sent relative to the file fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckMode {
    /// Acknowledge as soon as the event validates; fetch and dispatch afterwards.
    #[default]
    Immediate,
    /// Fetch the file before acknowledging so fetch failures can be retried
    /// by the sender. Sinks still run after the acknowledgement.
    AfterFetch,
}

impl AckMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "immediate" => Ok(AckMode::Immediate),
            "after_fetch" | "after-fetch" => Ok(AckMode::AfterFetch),
            _ => Err(ConfigError::Invalid {
                name: "WEBHOOK_ACK_MODE",
                value: value.to_string(),
            }),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- OAuth ---
    /// Wahoo OAuth client ID
    pub wahoo_client_id: String,
    /// Wahoo OAuth client secret
    pub wahoo_client_secret: String,
    /// Redirect URI registered with Wahoo
    pub redirect_uri: String,
    /// Provider authorize endpoint
    pub auth_base_url: String,
    /// Provider token endpoint
    pub token_base_url: String,

    // --- Server ---
    pub port: u16,
    /// Deadline applied to every outbound HTTP call
    pub upstream_timeout: Duration,
    pub ack_mode: AckMode,
    /// How long shutdown waits for in-flight archive work
    pub shutdown_grace: Duration,

    // --- File handling / sinks ---
    pub max_file_bytes: usize,
    /// Feature flag for the object storage sink
    pub tigris_enabled: bool,
    pub bucket_name: Option<String>,
    pub storage_endpoint: String,
    pub storage_region: String,
    /// Where FIT files are forwarded as multipart uploads
    pub fitfile_service_url: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            wahoo_client_id: "client123".to_string(),
            wahoo_client_secret: "client_secret".to_string(),
            redirect_uri: "https://example.com/callback".to_string(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            token_base_url: DEFAULT_TOKEN_BASE_URL.to_string(),
            port: 8080,
            upstream_timeout: Duration::from_secs(5),
            ack_mode: AckMode::Immediate,
            shutdown_grace: Duration::from_secs(5),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            tigris_enabled: false,
            bucket_name: None,
            storage_endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
            storage_region: "auto".to_string(),
            fitfile_service_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let tigris_raw = env::var("TIGRIS_ENABLED").unwrap_or_default();
        let tigris_enabled = parse_flag(&tigris_raw).unwrap_or_else(|| {
            if !tigris_raw.is_empty() {
                tracing::warn!(
                    value = %tigris_raw,
                    "Could not parse TIGRIS_ENABLED, object storage disabled"
                );
            }
            false
        });

        Ok(Self {
            wahoo_client_id: required("WAHOO_CLIENT_ID")?,
            wahoo_client_secret: required("WAHOO_CLIENT_SECRET")?,
            redirect_uri: required("REDIRECT_URI")?,
            auth_base_url: env::var("WAHOO_AUTH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_AUTH_BASE_URL.to_string()),
            token_base_url: env::var("WAHOO_TOKEN_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_TOKEN_BASE_URL.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            upstream_timeout: Duration::from_secs(parsed_or("UPSTREAM_TIMEOUT_SECS", 30)?),
            ack_mode: AckMode::parse(&env::var("WEBHOOK_ACK_MODE").unwrap_or_default())?,
            shutdown_grace: Duration::from_secs(parsed_or("SHUTDOWN_GRACE_SECS", 60)?),
            max_file_bytes: parsed_or("MAX_FIT_FILE_BYTES", DEFAULT_MAX_FILE_BYTES)?,
            tigris_enabled,
            bucket_name: optional("BUCKET_NAME"),
            storage_endpoint: env::var("STORAGE_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_STORAGE_ENDPOINT.to_string()),
            storage_region: env::var("STORAGE_REGION").unwrap_or_else(|_| "auto".to_string()),
            fitfile_service_url: optional("FITFILE_SERVICE_URL"),
        })
    }

    /// Object storage runs only when the flag is on and a bucket is named.
    pub fn object_storage_bucket(&self) -> Option<&str> {
        if !self.tigris_enabled {
            return None;
        }
        self.bucket_name.as_deref()
    }
}

/// Parse a boolean flag the way operators tend to write them.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
