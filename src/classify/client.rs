//! External profanity classifier client.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Text-in, verdict-out classifier boundary.
///
/// Implementations may fail; the classification cache decides what a
/// failure means. They must never panic on odd input.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify raw text. `Ok(true)` means sensitive.
    async fn classify(&self, text: &str) -> Result<bool>;
}

/// Client for the hosted profanity-check endpoint.
pub struct ProfanityApiClient {
    http: reqwest::Client,
    url: String,
}

impl ProfanityApiClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }
}

#[async_trait]
impl Classifier for ProfanityApiClient {
    async fn classify(&self, text: &str) -> Result<bool> {
        let body: Value = self
            .http
            .post(&self.url)
            .json(&json!({ "text": text }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_verdict(&body).ok_or_else(|| anyhow!("unrecognized classifier response: {body}"))
    }
}

/// Normalize the endpoint's verdict to a boolean.
///
/// The service has shipped two shapes: a string status (`"forbidden"`
/// marks sensitive text) and a numeric flag (nonzero marks sensitive).
fn parse_verdict(body: &Value) -> Option<bool> {
    match body.get("status")? {
        Value::String(status) => Some(status == "forbidden"),
        Value::Number(flag) => flag.as_i64().map(|n| n != 0),
        _ => None,
    }
}
