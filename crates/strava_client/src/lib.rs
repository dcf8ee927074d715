//! `StravaClient` trait, wire types and a reqwest-based implementation for the
//! Strava v3 REST API.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub mod auth;
pub mod config;
pub mod http_client;
pub mod retry;
pub mod token_store;

pub use auth::TokenSet;

#[derive(Debug, Error)]
pub enum StravaError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decoding error: {0}")]
    Decode(String),
}

impl StravaError {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => StravaError::Auth(body),
            404 => StravaError::NotFound(body),
            429 => StravaError::RateLimited(body),
            _ => StravaError::Status { status, body },
        }
    }

    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            StravaError::Http(e) => e.is_timeout() || e.is_connect(),
            StravaError::RateLimited(_) => true,
            StravaError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// One activity as listed by `GET /athlete/activities`.
///
/// Only the fields used for shoe statistics are kept. Numeric fields that are
/// absent or `null` read as `0`, `name` reads as the empty string.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Activity {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub sport_type: Option<String>,
    /// Meters.
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub distance: f64,
    /// Seconds.
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub moving_time: f64,
    /// Meters.
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub total_elevation_gain: f64,
    #[serde(default)]
    pub gear_id: Option<String>,
    /// `1` marks a race for runs.
    #[serde(default)]
    pub workout_type: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Athlete {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl Athlete {
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.firstname.as_deref().unwrap_or_default(),
            self.lastname.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Gear {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    pub name: Option<String>,
}

fn deserialize_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[async_trait]
pub trait StravaClient: Send + Sync + 'static {
    /// Authenticated athlete.
    async fn get_athlete(&self) -> Result<Athlete, StravaError>;

    /// One page of the athlete's activities. `after`/`before` are epoch seconds.
    async fn get_activities(
        &self,
        after: Option<i64>,
        before: Option<i64>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, StravaError>;

    /// Every activity started after `since`, following pagination.
    async fn get_all_activities_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<Activity>, StravaError>;

    async fn get_gear(&self, gear_id: &str) -> Result<Gear, StravaError>;

    async fn get_activity_by_id(&self, activity_id: &str)
    -> Result<serde_json::Value, StravaError>;
}
