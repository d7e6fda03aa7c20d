//! Process configuration loaded from environment variables.
//!
//! Controller connection settings live in [`bmcwatch_bmc::BmcConfig`] and
//! SMTP settings in [`bmcwatch_events::EmailConfig`]; this module covers the
//! HTTP server and the monitoring policy.

use std::str::FromStr;
use std::time::Duration;

use bmcwatch_core::error::CoreError;
use bmcwatch_core::hardware::calibration::{Calibration, DEFAULT_CALIBRATION_OFFSET};
use bmcwatch_core::hardware::thresholds::{
    Thresholds, DEFAULT_CRITICAL_THRESHOLD, DEFAULT_WARNING_THRESHOLD,
};
use bmcwatch_core::hardware::throttle::{CommitPolicy, ThrottlePolicy};
use bmcwatch_core::history::DEFAULT_HISTORY_CAPACITY;

/// Default scheduler period in minutes.
pub const DEFAULT_CHECK_INTERVAL_MINUTES: u64 = 60;

/// Default per-category cooldown in minutes.
pub const DEFAULT_COOLDOWN_MINUTES: u64 = 30;

/// Upper bound for minute-valued settings (one year).
pub const MAX_MINUTES: u64 = 365 * 24 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is invalid (got '{value}'): {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse `name` from `lookup`, or return `default` when it is unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Parse a minute count in `min..=MAX_MINUTES`.
fn minutes_or(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u64,
    min: u64,
) -> Result<u64, ConfigError> {
    let minutes: u64 = parse_or(lookup, name, default)?;
    if !(min..=MAX_MINUTES).contains(&minutes) {
        return Err(ConfigError::Invalid {
            name,
            value: minutes.to_string(),
            reason: format!("must be between {min} and {MAX_MINUTES}"),
        });
    }
    Ok(minutes)
}

fn flag_or(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "expected true or false".to_string(),
        }),
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds. A fresh temperature query walks the
    /// whole endpoint catalog, so this is well above the controller timeout.
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `5000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5000` |
    /// | `HTTP_REQUEST_TIMEOUT_SECS` | `300`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "PORT", 5000)?,
            cors_origins,
            request_timeout_secs: parse_or(&lookup, "HTTP_REQUEST_TIMEOUT_SECS", 300)?,
        })
    }
}

// ---------------------------------------------------------------------------
// MonitorConfig
// ---------------------------------------------------------------------------

/// Monitoring policy: thresholds, calibration, schedule and throttling.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub thresholds: Thresholds,
    pub calibration: Calibration,
    pub check_interval_minutes: u64,
    pub throttle: ThrottlePolicy,
    pub history_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            calibration: Calibration::default(),
            check_interval_minutes: DEFAULT_CHECK_INTERVAL_MINUTES,
            throttle: ThrottlePolicy::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default       |
    /// |---------------------------|---------------|
    /// | `WARNING_THRESHOLD`       | `27`          |
    /// | `CRITICAL_THRESHOLD`      | `30`          |
    /// | `TEMP_CALIBRATION_OFFSET` | `60`          |
    /// | `CHECK_INTERVAL_MINUTES`  | `60`          |
    /// | `SEND_WARNING_EMAILS`     | `true`        |
    /// | `SEND_CRITICAL_EMAILS`    | `true`        |
    /// | `SEND_REGULAR_REPORTS`    | `true`        |
    /// | `NOTIFY_COOLDOWN_MINUTES` | `30`          |
    /// | `NOTIFY_COMMIT_POLICY`    | `on_decision` |
    /// | `HISTORY_CAPACITY`        | `100`         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let thresholds = Thresholds::new(
            parse_or(&lookup, "WARNING_THRESHOLD", DEFAULT_WARNING_THRESHOLD)?,
            parse_or(&lookup, "CRITICAL_THRESHOLD", DEFAULT_CRITICAL_THRESHOLD)?,
        )?;
        let calibration = Calibration::new(parse_or(
            &lookup,
            "TEMP_CALIBRATION_OFFSET",
            DEFAULT_CALIBRATION_OFFSET,
        )?)?;

        let check_interval_minutes =
            minutes_or(&lookup, "CHECK_INTERVAL_MINUTES", DEFAULT_CHECK_INTERVAL_MINUTES, 1)?;
        let cooldown_minutes =
            minutes_or(&lookup, "NOTIFY_COOLDOWN_MINUTES", DEFAULT_COOLDOWN_MINUTES, 0)?;
        let throttle = ThrottlePolicy {
            send_warning: flag_or(&lookup, "SEND_WARNING_EMAILS", true)?,
            send_critical: flag_or(&lookup, "SEND_CRITICAL_EMAILS", true)?,
            send_regular: flag_or(&lookup, "SEND_REGULAR_REPORTS", true)?,
            cooldown: Duration::from_secs(cooldown_minutes * 60),
            commit: match lookup("NOTIFY_COMMIT_POLICY") {
                Some(raw) => raw.parse::<CommitPolicy>()?,
                None => CommitPolicy::default(),
            },
        };

        Ok(Self {
            thresholds,
            calibration,
            check_interval_minutes,
            throttle,
            history_capacity: parse_or(&lookup, "HISTORY_CAPACITY", DEFAULT_HISTORY_CAPACITY)?,
        })
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_minutes.saturating_mul(60))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
