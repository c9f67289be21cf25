//! Configuration module.
//!
//! Loads configuration from environment variables. Only the MongoDB
//! settings are required; everything else defaults to the hosted
//! endpoints and the shipped policy.

use std::env;
use std::time::Duration;

use crate::classify::{ClassifyPolicy, FailurePolicy};
use crate::error::{Error, Result};

/// Default arcade API endpoint.
pub const DEFAULT_ARCADE_API_URL: &str = "https://api.sc2arcade.com";

/// Default profanity-check endpoint.
pub const DEFAULT_CLASSIFIER_URL: &str = "https://uapis.cn/api/v1/text/profanitycheck";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,

    /// Base URL of the arcade lobby/profile API.
    pub arcade_api_url: String,

    /// URL of the text-classification endpoint.
    pub classifier_url: String,

    /// Outbound HTTP proxy, applied to both API clients when set.
    pub proxy_url: Option<String>,

    /// Whether binds verify profile existence upstream by default.
    pub verify_handles: bool,

    /// Whether player names are screened at all. When off, every name is
    /// treated as clean without any classifier or store traffic.
    pub name_screening: bool,

    /// How long stored verdicts stay authoritative. `None` keeps them
    /// forever.
    pub verdict_ttl: Option<Duration>,

    /// What classifier outages degrade to.
    pub classifier_failure: FailurePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if required environment variables are not set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let verdict_ttl = env::var("VERDICT_TTL_DAYS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|days| *days > 0)
            .map(|days| Duration::from_secs(days * 86_400));

        // Fail-closed unless explicitly opened: unclassifiable names stay
        // hidden rather than slipping through.
        let classifier_failure = match env::var("CLASSIFIER_FAILURE").as_deref() {
            Ok("open") => FailurePolicy::FailOpen,
            _ => FailurePolicy::FailClosed,
        };

        Self {
            mongodb_uri: env::var("MONGODB_URI").expect("MONGODB_URI must be set"),
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "lobbyist".to_string()),
            arcade_api_url: env::var("ARCADE_API_URL")
                .unwrap_or_else(|_| DEFAULT_ARCADE_API_URL.to_string()),
            classifier_url: env::var("CLASSIFIER_URL")
                .unwrap_or_else(|_| DEFAULT_CLASSIFIER_URL.to_string()),
            proxy_url: env::var("PROXY_URL").ok().filter(|s| !s.is_empty()),
            verify_handles: env_flag("VERIFY_HANDLES", true),
            name_screening: env_flag("NAME_SCREENING", true),
            verdict_ttl,
            classifier_failure,
        }
    }

    /// The classification policy this configuration describes.
    pub fn classify_policy(&self) -> ClassifyPolicy {
        ClassifyPolicy {
            ttl: self.verdict_ttl,
            on_failure: self.classifier_failure,
        }
    }

    /// Build the shared HTTP client, routing through the configured
    /// proxy when one is set.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();

        if let Some(proxy) = &self.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy).map_err(Error::upstream)?);
        }

        builder.build().map_err(Error::upstream)
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(value.trim(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
