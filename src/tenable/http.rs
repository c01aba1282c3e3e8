//! HTTP client for the Tenable REST API

use crate::config::Config;
use crate::error::{InventoryError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, ACCEPT};
use reqwest::{Client, Method};
use serde_json::Value;

/// Name used in API error messages
pub const API_NAME: &str = "Tenable";

/// Header carrying both API keys
pub const API_KEYS_HEADER: &str = "X-ApiKeys";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate a response body and strip control characters for logging
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Value of the `X-ApiKeys` header
pub fn api_keys_header(config: &Config) -> String {
    format!(
        "accessKey={};secretKey={};",
        config.access_key, config.secret_key
    )
}

/// HTTP client wrapper for Tenable API calls
#[derive(Clone)]
pub struct TenableHttpClient {
    client: Client,
    config: Config,
}

impl TenableHttpClient {
    /// Create a new HTTP client for the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tenable-inventory/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_client(config: Config, client: Client) -> Self {
        Self { client, config }
    }

    /// Endpoint and path joined by a single slash, without normalization
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_endpoint, path)
    }

    /// Default headers with `custom` merged on top; custom keys win.
    pub fn headers(&self, custom: &HeaderMap) -> std::result::Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-apikeys"),
            HeaderValue::from_str(&api_keys_header(&self.config))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.extend(custom.clone());
        Ok(headers)
    }

    /// Make a GET request to the Tenable API
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path).await
    }

    /// Make a request with the default headers
    pub async fn request(&self, method: Method, path: &str) -> Result<Value> {
        self.request_with_headers(method, path, &HeaderMap::new())
            .await
    }

    /// Make a request and decode the body as JSON.
    ///
    /// Connection failures and 4xx/5xx statuses become
    /// [`InventoryError::Transport`]; a body that is not JSON becomes
    /// [`InventoryError::Decode`]. Nothing is retried.
    pub async fn request_with_headers(
        &self,
        method: Method,
        path: &str,
        custom: &HeaderMap,
    ) -> Result<Value> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let transport_error = |error: String| InventoryError::Transport {
            name: API_NAME,
            method: method.to_string(),
            path: path.to_string(),
            error,
        };

        let headers = self
            .headers(custom)
            .map_err(|e| transport_error(e.to_string()))?;

        let response = self
            .client
            .request(method.clone(), &url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| transport_error(e.to_string()))?;

        let status = response.status();
        let status_error = response.error_for_status_ref().err();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e.to_string()))?;

        if let Some(error) = status_error {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(transport_error(error.to_string()));
        }

        serde_json::from_str(&body).map_err(|e| InventoryError::Decode {
            name: API_NAME,
            method: method.to_string(),
            path: path.to_string(),
            error: e.to_string(),
        })
    }
}
