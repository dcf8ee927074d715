//! HTTP client implementation for the Strava v3 API.
//!
//! This module provides a reqwest-based implementation of the [`StravaClient`](crate::StravaClient) trait.

use crate::retry::RetryPolicy;
use crate::{Activity, Athlete, Gear, StravaClient, StravaError};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Largest page size the activities endpoint accepts.
pub const MAX_PER_PAGE: u32 = 200;
/// Pause between consecutive page requests.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// Client for the Strava API using reqwest with bearer token auth.
#[derive(Clone, Debug)]
pub struct ReqwestStravaClient {
    base_url: String,
    access_token: SecretString,
    client: reqwest::Client,
    page_delay: Duration,
    retry: RetryPolicy,
}

impl ReqwestStravaClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The API root (e.g., "https://www.strava.com/api/v3")
    /// * `access_token` - A valid OAuth access token
    pub fn new(base_url: &str, access_token: SecretString) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            client: reqwest::Client::new(),
            page_delay: DEFAULT_PAGE_DELAY,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StravaError> {
        let resp = request.send().await?;
        self.handle_response(resp).await
    }

    /// Handle a response, converting status codes to appropriate errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, StravaError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        // Read body as text first so a shape mismatch reports what came back.
        let text = resp.text().await?;
        serde_json::from_str::<T>(&text).map_err(|e| {
            let body_snippet: String = text.chars().take(512).collect();
            StravaError::Decode(format!("{e} - body: {body_snippet}"))
        })
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> StravaError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        StravaError::from_status(status, body_snippet)
    }
}

#[async_trait]
impl StravaClient for ReqwestStravaClient {
    async fn get_athlete(&self) -> Result<Athlete, StravaError> {
        let url = format!("{}/athlete", self.base_url);
        self.execute_json(self.get_request(&url)).await
    }

    async fn get_activities(
        &self,
        after: Option<i64>,
        before: Option<i64>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, StravaError> {
        let url = format!("{}/athlete/activities", self.base_url);
        let mut pairs: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(after) = after {
            pairs.push(("after", after.to_string()));
        }
        if let Some(before) = before {
            pairs.push(("before", before.to_string()));
        }
        let qp: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();

        self.retry
            .retry_async(StravaError::is_transient, || {
                self.execute_json(self.get_request(&url).query(&qp))
            })
            .await
    }

    async fn get_all_activities_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<Activity>, StravaError> {
        let after = since.timestamp();
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            tracing::info!(page, "fetching activities page");
            let activities = self
                .get_activities(Some(after), None, page, MAX_PER_PAGE)
                .await?;
            let fetched = activities.len();
            all.extend(activities);

            // A short page is the last one.
            if fetched < MAX_PER_PAGE as usize {
                break;
            }
            page += 1;
            tokio::time::sleep(self.page_delay).await;
        }

        tracing::debug!(pages = page, total = all.len(), "activity fetch complete");
        Ok(all)
    }

    async fn get_gear(&self, gear_id: &str) -> Result<Gear, StravaError> {
        let url = format!("{}/gear/{}", self.base_url, gear_id);
        self.execute_json(self.get_request(&url)).await
    }

    async fn get_activity_by_id(
        &self,
        activity_id: &str,
    ) -> Result<serde_json::Value, StravaError> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);
        self.execute_json(self.get_request(&url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let client = ReqwestStravaClient::new(
            "https://www.strava.com/api/v3/",
            SecretString::new("tok".into()),
        );
        assert_eq!(client.base_url, "https://www.strava.com/api/v3");
        assert_eq!(client.page_delay, DEFAULT_PAGE_DELAY);
    }
}
