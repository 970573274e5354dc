use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;
use uuid::Uuid;

use super::http::{send_with_retry, RetryPolicy};
use super::types::ApiError;

/// Default request timeout in seconds
pub(super) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client name reported to the server
const CLIENT_NAME: &str = "landing";

const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

fn build_user_agent() -> String {
    std::env::var("LANDING_USER_AGENT")
        .unwrap_or_else(|_| format!("{}/{}", CLIENT_NAME, DEFAULT_VERSION))
}

fn device_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "terminal".to_string())
}

/// HTTP client for the media server API.
pub struct ApiClient {
    pub(super) client: Client,
    pub(super) user_agent: String,
    pub(super) device_id: String,
    pub(super) retry: RetryPolicy,
}

impl ApiClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            user_agent: build_user_agent(),
            device_id: Uuid::new_v4().simple().to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub(super) fn build_url(base_url: &str, endpoint: &str) -> Result<Url> {
        // Keep any path prefix on the base (reverse-proxied servers)
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base = Url::parse(&base).with_context(|| format!("Invalid server URL: {}", base_url))?;
        base.join(endpoint)
            .with_context(|| format!("Failed to build URL for endpoint: {}", endpoint))
    }

    /// `Authorization` header value in the media server's scheme.
    pub(super) fn authorization(&self, access_token: Option<&str>) -> String {
        let mut value = format!(
            r#"MediaBrowser Client="{}", Device="{}", DeviceId="{}", Version="{}""#,
            CLIENT_NAME,
            device_name(),
            self.device_id,
            DEFAULT_VERSION
        );
        if let Some(token) = access_token {
            value.push_str(&format!(r#", Token="{}""#, token));
        }
        value
    }

    /// GET a JSON endpoint on `base_url`.
    pub async fn get_json<R>(
        &self,
        base_url: &str,
        endpoint: &str,
        access_token: Option<&str>,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = Self::build_url(base_url, endpoint)?;
        let authorization = self.authorization(access_token);

        debug!("GET {}", url);

        let response = send_with_retry(self.retry, || {
            self.client
                .get(url.clone())
                .header("Accept", "application/json")
                .header("User-Agent", &self.user_agent)
                .header("Authorization", &authorization)
        })
        .await
        .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        debug!("Status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let api_error = ApiError::from_http_response(status.as_u16(), body);

            if api_error.requires_relogin() {
                error!("{}", api_error);
                error!("   Run 'landing login' to sign in again");
            } else {
                error!("API request failed: {}", api_error);
            }

            anyhow::bail!(api_error);
        }

        let text = response
            .text()
            .await
            .context("Failed to read response body")?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse response from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_keeps_prefix() {
        let url = ApiClient::build_url("https://media.example.com/jellyfin", "Users/Me").unwrap();
        assert_eq!(url.as_str(), "https://media.example.com/jellyfin/Users/Me");

        let url = ApiClient::build_url("http://10.0.0.2:8096/", "System/Info/Public").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.2:8096/System/Info/Public");
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        assert!(ApiClient::build_url("not a url", "Users/Me").is_err());
    }

    #[test]
    fn test_authorization_header() {
        let client = ApiClient::new().unwrap();

        let anonymous = client.authorization(None);
        assert!(anonymous.starts_with("MediaBrowser Client=\"landing\""));
        assert!(!anonymous.contains("Token="));

        let authed = client.authorization(Some("secret"));
        assert!(authed.ends_with(r#"Token="secret""#));
        assert!(authed.contains(&client.device_id));
    }

    #[test]
    fn test_with_retry_replaces_default_policy() {
        let client = ApiClient::new().unwrap();
        assert_eq!(client.retry.max_retries, RetryPolicy::default().max_retries);

        let client = client.with_retry(RetryPolicy::none());
        assert_eq!(client.retry.max_retries, 0);
        assert_eq!(client.retry.base_delay, Duration::ZERO);
    }
}
