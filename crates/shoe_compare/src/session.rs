//! Obtain a usable access token: stored, refreshed, or freshly authorized.

use secrecy::SecretString;
use strava_client::auth::{OAuthClient, extract_authorization_code};
use strava_client::config::Config;
use strava_client::token_store::EnvFile;

use crate::error::{AppError, AppResult};

pub struct Session {
    oauth: OAuthClient,
    store: EnvFile,
}

impl Session {
    pub fn new(config: &Config, store: EnvFile) -> Self {
        Self {
            oauth: OAuthClient::new(config),
            store,
        }
    }

    /// Return an access token, refreshing or re-authorizing as needed.
    ///
    /// `prompt` receives the authorization URL and returns what the user
    /// pasted back: the full redirect URL or the bare code. It is only called
    /// when no usable token exists.
    pub async fn access_token<P>(&self, now: i64, prompt: P) -> AppResult<SecretString>
    where
        P: FnOnce(&str) -> AppResult<String>,
    {
        if let Some(tokens) = self.store.load_tokens()? {
            if !tokens.needs_refresh(now) {
                tracing::debug!("using stored access token");
                return Ok(tokens.access_token);
            }
            tracing::info!("access token expired or expiring soon, refreshing");
            match self.oauth.refresh(&tokens.refresh_token).await {
                Ok(fresh) => {
                    self.store.save_tokens(&fresh)?;
                    tracing::info!("token refreshed");
                    return Ok(fresh.access_token);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "token refresh failed, re-authenticating");
                }
            }
        }

        tracing::info!("no valid access token, starting authorization");
        let url = self.oauth.authorization_url()?;
        let pasted = prompt(&url)?;
        let code = extract_authorization_code(&pasted);
        if code.is_empty() {
            return Err(AppError::Authorization("no authorization code given".into()));
        }

        let tokens = self
            .oauth
            .exchange_code(&code)
            .await
            .map_err(|e| AppError::Authorization(e.to_string()))?;
        self.store.save_tokens(&tokens)?;
        tracing::info!(path = %self.store.path().display(), "authorization complete, tokens saved");
        Ok(tokens.access_token)
    }
}
