//! Temperature severity levels and notification categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a calibrated chassis temperature.
///
/// Derived from a reading via [`Thresholds::classify`](crate::hardware::thresholds::Thresholds::classify);
/// never stored independently of the reading it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemperatureStatus {
    /// Below the warning threshold.
    Normal,
    /// At or above the warning threshold but below the critical threshold.
    Warning,
    /// At or above the critical threshold.
    Critical,
}

/// Label reported for the last status before any successful reading.
pub const STATUS_UNKNOWN: &str = "UNKNOWN";

impl TemperatureStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for TemperatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of outbound notification. Each category is throttled independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Warning,
    Critical,
    /// Periodic report sent while the temperature is normal.
    Regular,
    /// Operator-triggered test message; never throttled.
    Test,
}

impl NotificationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Regular => "regular",
            Self::Test => "test",
        }
    }

    /// Pick the single category evaluated after a successful cycle.
    ///
    /// Critical beats warning; a normal reading maps to the regular report
    /// only when regular reports are enabled.
    pub fn for_status(status: TemperatureStatus, regular_enabled: bool) -> Option<Self> {
        match status {
            TemperatureStatus::Critical => Some(Self::Critical),
            TemperatureStatus::Warning => Some(Self::Warning),
            TemperatureStatus::Normal if regular_enabled => Some(Self::Regular),
            TemperatureStatus::Normal => None,
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
