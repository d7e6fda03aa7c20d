//! HTTP client for the management controller.
//!
//! Every request carries basic-auth credentials and its own timeout. Only a
//! 2xx response counts; anything else is surfaced as [`BmcError::HttpStatus`]
//! so the calling strategy can move on to its next endpoint.

use serde_json::Value;

use crate::config::BmcConfig;

/// Errors from the controller HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum BmcError {
    /// Missing or malformed connection settings.
    #[error("BMC configuration error: {0}")]
    Config(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The controller returned a non-2xx status code.
    #[error("BMC returned HTTP {0}")]
    HttpStatus(u16),

    /// The body was expected to be JSON but did not decode.
    #[error("Malformed JSON payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Authenticated client for a single controller.
pub struct BmcClient {
    client: reqwest::Client,
    config: BmcConfig,
}

impl BmcClient {
    pub fn new(config: BmcConfig) -> Result<Self, BmcError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(concat!("bmcwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Full URL for a controller path (which includes any query string).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// GET a path and return the body as text.
    pub async fn fetch_text(&self, path: &str) -> Result<String, BmcError> {
        let response = self
            .client
            .get(self.url(path))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(reqwest::header::ACCEPT, "application/json, text/html;q=0.9, */*;q=0.8")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BmcError::HttpStatus(status.as_u16()));
        }
        Ok(response.text().await?)
    }

    /// GET a path and decode the body as JSON.
    pub async fn fetch_json(&self, path: &str) -> Result<Value, BmcError> {
        let body = self.fetch_text(path).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
