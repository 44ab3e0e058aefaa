//! Chicken One REST API client.
//!
//! # Architecture
//!
//! - The API is the source of truth for accounts, carts, branches and
//!   delivery areas. Nothing is stored locally beyond the session.
//! - JSON over HTTP with `reqwest` 0.13, bearer-token auth per call.
//! - In-memory caching via `moka` for the branch list (5 minute TTL).
//!
//! # Example
//!
//! ```rust,ignore
//! use chicken_one_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! let session = client.login("guest@chickenone.app", "Crispy#Wings1").await?;
//! let items = client.cart_items(&session.token).await?;
//! ```

mod account;
mod auth;
mod cart;
mod delivery_fees;
pub mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{RequestBuilder, Response, StatusCode, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;

/// Placeholder shown for menu items without an image.
pub const FALLBACK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1626645738196-c2a7c87a8f58?w=400&h=300&fit=crop";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const BRANCH_CACHE_KEY: &str = "branches";

/// Errors that can occur when talking to the Chicken One API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The bearer token was missing, expired or rejected.
    #[error("Unauthorized")]
    Unauthorized,

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// The API's own explanation, when it sent one.
    ///
    /// Only `Api` errors with a non-empty message qualify; transport and
    /// parse failures never leak to users.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Client for the Chicken One REST API.
///
/// Cheap to clone. Branches are cached for 5 minutes.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    branches: Cache<&'static str, Vec<Branch>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let branches = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                branches,
            }),
        })
    }

    /// The configured API origin.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve a menu image path against the API origin.
    ///
    /// Absolute URLs pass through; missing or blank paths get the stock
    /// placeholder.
    #[must_use]
    pub fn image_url(&self, path: Option<&str>) -> String {
        let Some(path) = path.map(str::trim).filter(|p| !p.is_empty()) else {
            return FALLBACK_IMAGE_URL.to_string();
        };

        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_or_else(|_| FALLBACK_IMAGE_URL.to_string(), String::from)
    }

    /// Whether the API host answers at all. Any HTTP status counts.
    pub async fn ping(&self) -> bool {
        self.inner
            .client
            .get(self.inner.base_url.clone())
            .send()
            .await
            .is_ok()
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::Parse(format!("Invalid endpoint {path}: {e}")))
    }

    fn get(&self, path: &str, token: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.get(self.endpoint(path)?).bearer_auth(token))
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.post(self.endpoint(path)?))
    }

    fn put(&self, path: &str, token: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.put(self.endpoint(path)?).bearer_auth(token))
    }

    fn delete(&self, path: &str, token: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self
            .inner
            .client
            .delete(self.endpoint(path)?)
            .bearer_auth(token))
    }

    /// Send a request and decode a JSON body.
    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(request).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    /// Send a request whose response body is not needed.
    async fn send_empty(request: RequestBuilder) -> Result<(), ApiError> {
        Self::send(request).await.map(drop)
    }

    /// Send a request and turn non-success statuses into errors.
    ///
    /// A 401 on a bearer-authed call means the token is dead. Anonymous
    /// calls (login, reset, confirm) keep the API's message instead.
    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let (client, request) = request.build_split();
        let request = request?;
        let bearer = request.headers().contains_key(AUTHORIZATION);

        let response = client.execute(request).await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }
        if bearer && status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Chicken One API returned non-success status"
        );

        Err(ApiError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// Pull the `message` field out of an error body, if there is one.
fn error_message(body: &str) -> String {
    serde_json::from_str::<MessageResponse>(body)
        .ok()
        .and_then(|r| r.message)
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: Url::parse("https://api.chickenone.app/").unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_error_message_reads_message_field() {
        assert_eq!(
            error_message(r#"{"message":"Area already exists"}"#),
            "Area already exists"
        );
        assert_eq!(error_message("<html>oops</html>"), "");
        assert_eq!(error_message(r#"{"title":"Bad Request"}"#), "");
    }

    #[test]
    fn test_user_message_only_for_api_errors() {
        let err = ApiError::Api {
            status: 400,
            message: "Invalid code".to_string(),
        };
        assert_eq!(err.user_message(), Some("Invalid code"));

        let blank = ApiError::Api {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(blank.user_message(), None);
        assert_eq!(ApiError::Unauthorized.user_message(), None);
    }

    #[test]
    fn test_image_url_resolution() {
        let client = client();
        assert_eq!(
            client.image_url(Some("images/menu/wings.jpg")),
            "https://api.chickenone.app/images/menu/wings.jpg"
        );
        assert_eq!(
            client.image_url(Some("/images/menu/wings.jpg")),
            "https://api.chickenone.app/images/menu/wings.jpg"
        );
        assert_eq!(
            client.image_url(Some("https://cdn.example.org/a.png")),
            "https://cdn.example.org/a.png"
        );
        assert_eq!(client.image_url(None), FALLBACK_IMAGE_URL);
        assert_eq!(client.image_url(Some("  ")), FALLBACK_IMAGE_URL);
    }

    #[test]
    fn test_endpoint_joins_relative_path() {
        let client = client();
        assert_eq!(
            client.endpoint("api/CartItems/GetAll").unwrap().as_str(),
            "https://api.chickenone.app/api/CartItems/GetAll"
        );
    }
}
