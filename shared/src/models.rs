//! Shared data models.
//!
//! Upstream payloads are deserialized permissively and then validated into
//! trusted types before any handler logic touches them.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribution attached to every advice payload.
pub const ADVICE_SOURCE: &str = "Advice Slip API";

/// Breed label reported when no breed was requested.
pub const RANDOM_BREED: &str = "random";

/// Current UTC time as RFC 3339 with millisecond precision, e.g. `2025-10-02T15:30:00.000Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Query accepted by the advice endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdviceQuery {
    pub id: Option<String>,
}

/// Query accepted by the dog endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DogQuery {
    pub breed: Option<String>,
}

/// Advice payload returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceData {
    pub id: i64,
    pub advice: String,
    pub source: String,
    pub timestamp: String,
}

/// Dog image payload returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DogImageData {
    pub image_url: String,
    pub breed: String,
    pub timestamp: String,
}

/// A slip that carries both an id and non-blank advice text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceSlip {
    pub id: i64,
    pub advice: String,
}

impl AdviceSlip {
    /// Pull a usable slip out of an Advice Slip API body.
    ///
    /// The service answers 200 with a `message` object instead of a `slip`
    /// when an id is unknown, and nothing else about the body is trusted:
    /// any missing or mistyped field yields `None`.
    pub fn from_upstream(body: &Value) -> Option<Self> {
        let slip = body.get("slip")?;
        let id = slip.get("id")?.as_i64()?;
        let advice = slip
            .get("advice")?
            .as_str()
            .filter(|a| !a.trim().is_empty())?;

        Some(Self {
            id,
            advice: advice.to_string(),
        })
    }
}

/// Dog CEO API body.
#[derive(Debug, Deserialize)]
pub struct UpstreamDogResponse {
    pub message: DogMessage,
    pub status: String,
}

/// `message` is a single URL for the random endpoints but a list elsewhere.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DogMessage {
    One(String),
    Many(Vec<String>),
}

impl UpstreamDogResponse {
    /// Extract the image URL, rejecting replies that break the success contract.
    pub fn into_image_url(self) -> Result<String, String> {
        if self.status != "success" {
            return Err(format!("dog api returned status '{}'", self.status));
        }

        let url = match self.message {
            DogMessage::One(url) => Some(url),
            DogMessage::Many(urls) => urls.into_iter().next(),
        };

        url.filter(|u| !u.trim().is_empty())
            .ok_or_else(|| "dog api returned no image url".to_string())
    }
}
