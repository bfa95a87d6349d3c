//! SiteCheck API client
//!
//! Provides a typed HTTP client for the quality control backend.
//! Handles the bearer token, the client-level timeout, endpoint
//! construction, status mapping and JSON decoding.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sitecheck_api::{client::ApiClient, photos};
//! use sitecheck_core::domain::PageRequest;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = ApiClient::new("https://qc.example.com/api/v1", Duration::from_secs(30))?
//!     .with_token("access-token-here");
//! let page = photos::list_photos(&client, &PageRequest::first(), None).await?;
//! println!("{} photos", page.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use sitecheck_core::config::ApiConfig;

use crate::ApiError;

/// Timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// ApiClient
// ============================================================================

/// HTTP client for SiteCheck API calls
///
/// Wraps `reqwest::Client` with the bearer token and base URL. The timeout
/// is applied to every request by the underlying client; the engine itself
/// enforces none.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests, without trailing slash
    base_url: String,
    /// Bearer token, if any
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client for the given base URL
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://qc.example.com/api/v1`
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    /// Returns `NetworkError` if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Creates a client with the default timeout (useful for testing)
    ///
    /// # Errors
    /// Returns `NetworkError` if the HTTP client cannot be built
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client from the `api` configuration section
    ///
    /// The bearer token is read from the environment variable named by
    /// `token_env`. A missing variable is not an error: the backend answers
    /// 401 and the caller reports it.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        match std::env::var(&config.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(client.with_token(token.trim())),
            _ => {
                warn!(
                    token_env = %config.token_env,
                    "No API token in environment, requests will be unauthenticated"
                );
                Ok(client)
            }
        }
    }

    /// Sets the bearer token sent with every request
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Creates an authenticated request builder for the given method and path
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to base URL (e.g., "/photos")
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, &url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request once and maps non-success statuses to [`ApiError`]
    pub(crate) async fn execute(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "API request could not be sent");
            ApiError::NetworkError(e)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(endpoint, status = status.as_u16(), "API request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status, &body);
        warn!(endpoint, status = status.as_u16(), error = %error, "API request failed");
        Err(error)
    }

    /// `GET path?query` decoded as `T`
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path).query(query);
        let response = self.execute(request, path).await?;
        decode(response, path).await
    }

    /// `POST path` with a JSON body, response decoded as `T`
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::POST, path).json(body);
        let response = self.execute(request, path).await?;
        decode(response, path).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::InvalidResponse(format!("{endpoint}: {e}")))
}
