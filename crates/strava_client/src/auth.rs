//! OAuth 2.0 authorization code flow against Strava.

use crate::StravaError;
use crate::config::Config;
use secrecy::{ExposeSecret, SecretString};

pub const REDIRECT_URI: &str = "http://localhost";
pub const SCOPE: &str = "activity:read_all,read";
/// Tokens expiring within this many seconds are refreshed up front.
pub const REFRESH_MARGIN_SECS: i64 = 300;

/// Access/refresh token pair with its expiry in unix seconds.
#[derive(Clone, Debug)]
pub struct TokenSet {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    pub expires_at: i64,
}

impl TokenSet {
    pub fn needs_refresh(&self, now: i64) -> bool {
        self.expires_at - now < REFRESH_MARGIN_SECS
    }
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_at: i64,
}

impl From<TokenResponse> for TokenSet {
    fn from(r: TokenResponse) -> Self {
        Self {
            access_token: SecretString::new(r.access_token.into()),
            refresh_token: SecretString::new(r.refresh_token.into()),
            expires_at: r.expires_at,
        }
    }
}

/// Pull the authorization code out of a pasted redirect URL, or return the
/// input itself when it is already a bare code.
pub fn extract_authorization_code(input: &str) -> String {
    let input = input.trim();
    match input.split_once("code=") {
        Some((_, rest)) => rest.split('&').next().unwrap_or_default().to_string(),
        None => input.to_string(),
    }
}

#[derive(Clone, Debug)]
pub struct OAuthClient {
    client_id: String,
    client_secret: SecretString,
    oauth_base_url: String,
    client: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            oauth_base_url: config.oauth_base_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// URL the user opens in a browser to grant access.
    pub fn authorization_url(&self) -> Result<String, StravaError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/authorize", self.oauth_base_url),
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", REDIRECT_URI),
                ("response_type", "code"),
                ("scope", SCOPE),
            ],
        )
        .map_err(|e| StravaError::Config(format!("invalid authorize url: {e}")))?;
        Ok(url.to_string())
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, StravaError> {
        self.token_request(&[("code", code), ("grant_type", "authorization_code")])
            .await
    }

    pub async fn refresh(&self, refresh_token: &SecretString) -> Result<TokenSet, StravaError> {
        tracing::info!("refreshing strava access token");
        self.token_request(&[
            ("refresh_token", refresh_token.expose_secret()),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    async fn token_request(&self, grant: &[(&str, &str)]) -> Result<TokenSet, StravaError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
        ];
        params.extend_from_slice(grant);

        let url = format!("{}/token", self.oauth_base_url);
        let resp = self.client.post(&url).form(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body_snippet: String = body.chars().take(256).collect();
            // Strava answers a bad code or refresh token with 400.
            return Err(match status.as_u16() {
                400 => StravaError::Auth(body_snippet),
                other => StravaError::from_status(other, body_snippet),
            });
        }
        let token: TokenResponse = resp.json().await?;
        Ok(token.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::from_env_with(|k| match k {
            "STRAVA_CLIENT_ID" => Some("12345".into()),
            "STRAVA_CLIENT_SECRET" => Some("shh".into()),
            _ => None,
        })
        .expect("config")
    }

    #[test]
    fn extract_code_from_redirect_url() {
        let url = "http://localhost/?state=&code=abc123&scope=read,activity:read_all";
        assert_eq!(extract_authorization_code(url), "abc123");
    }

    #[test]
    fn extract_code_at_end_of_url() {
        assert_eq!(
            extract_authorization_code("http://localhost/?code=xyz"),
            "xyz"
        );
    }

    #[test]
    fn extract_code_passes_bare_code_through() {
        assert_eq!(extract_authorization_code("  rawcode \n"), "rawcode");
    }

    #[test]
    fn needs_refresh_inside_margin() {
        let t = TokenSet {
            access_token: SecretString::new("a".into()),
            refresh_token: SecretString::new("r".into()),
            expires_at: 1_000,
        };
        assert!(t.needs_refresh(1_000 - 299));
        assert!(!t.needs_refresh(1_000 - 300));
        assert!(t.needs_refresh(2_000));
    }

    #[test]
    fn authorization_url_carries_client_and_scope() {
        let url = OAuthClient::new(&config())
            .authorization_url()
            .expect("url");
        let parsed = reqwest::Url::parse(&url).expect("parse");
        assert_eq!(parsed.path(), "/oauth/authorize");
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("client_id".into(), "12345".into())));
        assert!(pairs.contains(&("redirect_uri".into(), REDIRECT_URI.into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("scope".into(), SCOPE.into())));
    }
}
