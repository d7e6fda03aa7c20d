//! Controller connection settings.

use std::time::Duration;

use crate::client::BmcError;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the management controller.
#[derive(Clone)]
pub struct BmcConfig {
    /// Base URL, e.g. `https://10.0.0.5`. A trailing slash is ignored.
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Applied to every individual request.
    pub request_timeout: Duration,
    /// Controllers ship self-signed certificates, so verification is off
    /// unless explicitly enabled.
    pub accept_invalid_certs: bool,
}

impl std::fmt::Debug for BmcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BmcConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl BmcConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            accept_invalid_certs: true,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable                   | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `BMC_URL`                  | yes      | -       |
    /// | `BMC_USERNAME`             | yes      | -       |
    /// | `BMC_PASSWORD`             | yes      | -       |
    /// | `BMC_REQUEST_TIMEOUT_SECS` | no       | `10`    |
    /// | `BMC_ACCEPT_INVALID_CERTS` | no       | `true`  |
    pub fn from_env() -> Result<Self, BmcError> {
        let required = |name: &str| {
            std::env::var(name).map_err(|_| BmcError::Config(format!("{name} must be set")))
        };

        let mut config = Self::new(
            required("BMC_URL")?,
            required("BMC_USERNAME")?,
            required("BMC_PASSWORD")?,
        );

        if let Ok(raw) = std::env::var("BMC_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                BmcError::Config(format!("BMC_REQUEST_TIMEOUT_SECS must be a valid u64 (got '{raw}')"))
            })?;
            config.request_timeout = Duration::from_secs(secs.max(1));
        }

        if let Ok(raw) = std::env::var("BMC_ACCEPT_INVALID_CERTS") {
            config.accept_invalid_certs = !matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "false" | "0" | "no" | "off"
            );
        }

        Ok(config)
    }
}
