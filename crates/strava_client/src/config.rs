use crate::StravaError;
use crate::token_store::EnvFile;
use secrecy::SecretString;
use std::path::Path;

pub const DEFAULT_API_BASE_URL: &str = "https://www.strava.com/api/v3";
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://www.strava.com/oauth";

pub const CLIENT_ID_KEY: &str = "STRAVA_CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "STRAVA_CLIENT_SECRET";
pub const API_BASE_URL_KEY: &str = "STRAVA_API_BASE_URL";
pub const OAUTH_BASE_URL_KEY: &str = "STRAVA_OAUTH_BASE_URL";

/// Application credentials and endpoints.
#[derive(Clone, Debug)]
pub struct Config {
    pub client_id: String,
    pub client_secret: SecretString,
    pub api_base_url: String,
    pub oauth_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, StravaError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Read values from a `.env`-style file; process environment variables
    /// take precedence over the file.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, StravaError> {
        let entries = EnvFile::new(path.as_ref()).read_entries()?;
        Self::from_env_with(|k| {
            std::env::var(k).ok().or_else(|| entries.get(k).cloned())
        })
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, StravaError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let client_id = get(CLIENT_ID_KEY)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StravaError::Config(format!("{CLIENT_ID_KEY} missing")))?;
        let client_secret = get(CLIENT_SECRET_KEY)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StravaError::Config(format!("{CLIENT_SECRET_KEY} missing")))?;
        let api_base_url =
            get(API_BASE_URL_KEY).unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let oauth_base_url =
            get(OAUTH_BASE_URL_KEY).unwrap_or_else(|| DEFAULT_OAUTH_BASE_URL.into());
        Ok(Self {
            client_id,
            client_secret: SecretString::new(client_secret.into()),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            oauth_base_url: oauth_base_url.trim_end_matches('/').to_string(),
        })
    }
}
