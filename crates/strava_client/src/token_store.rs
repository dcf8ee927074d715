//! `.env` file persistence for OAuth tokens.
//!
//! Reading goes through `dotenvy`. A key that appears more than once keeps
//! its first position and its last value. Comments are dropped on rewrite.

use crate::{StravaError, TokenSet};
use indexmap::IndexMap;
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};

pub const ACCESS_TOKEN_KEY: &str = "STRAVA_ACCESS_TOKEN";
pub const REFRESH_TOKEN_KEY: &str = "STRAVA_REFRESH_TOKEN";
pub const EXPIRES_AT_KEY: &str = "STRAVA_TOKEN_EXPIRES_AT";

/// Entries of a `.env` file in file order.
pub type EnvEntries = IndexMap<String, String>;

fn env_error(path: &Path, e: dotenvy::Error) -> StravaError {
    StravaError::Config(format!("reading {}: {e}", path.display()))
}

#[derive(Clone, Debug)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries in file order. A missing file reads as empty.
    pub fn read_entries(&self) -> Result<EnvEntries, StravaError> {
        let iter = match dotenvy::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => return Ok(EnvEntries::new()),
            Err(e) => return Err(env_error(&self.path, e)),
        };
        let mut entries = EnvEntries::new();
        for item in iter {
            let (key, value) = item.map_err(|e| env_error(&self.path, e))?;
            entries.insert(key, value);
        }
        Ok(entries)
    }

    /// Stored tokens, if both the access and refresh token are present.
    pub fn load_tokens(&self) -> Result<Option<TokenSet>, StravaError> {
        let mut entries = self.read_entries()?;
        let expires_at = entries
            .get(EXPIRES_AT_KEY)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        Ok(
            match (
                entries.swap_remove(ACCESS_TOKEN_KEY),
                entries.swap_remove(REFRESH_TOKEN_KEY),
            ) {
                (Some(access), Some(refresh)) => Some(TokenSet {
                    access_token: SecretString::new(access.into()),
                    refresh_token: SecretString::new(refresh.into()),
                    expires_at,
                }),
                _ => None,
            },
        )
    }

    /// Write the three token keys, keeping every other entry.
    pub fn save_tokens(&self, tokens: &TokenSet) -> Result<(), StravaError> {
        let mut entries = self.read_entries()?;
        entries.insert(
            ACCESS_TOKEN_KEY.to_string(),
            tokens.access_token.expose_secret().to_string(),
        );
        entries.insert(
            REFRESH_TOKEN_KEY.to_string(),
            tokens.refresh_token.expose_secret().to_string(),
        );
        entries.insert(EXPIRES_AT_KEY.to_string(), tokens.expires_at.to_string());

        let contents: String = entries
            .iter()
            .map(|(k, v)| format!("{k}={v}\n"))
            .collect();
        std::fs::write(&self.path, contents)?;
        tracing::debug!(path = %self.path.display(), "saved tokens");
        Ok(())
    }
}
