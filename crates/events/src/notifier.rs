//! The notifier contract.

use async_trait::async_trait;
use bmcwatch_core::alert::{NotificationCategory, TemperatureStatus};
use bmcwatch_core::types::{Celsius, Timestamp};

use crate::delivery::email::EmailError;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Email(#[from] EmailError),

    /// No delivery channel is configured.
    #[error("Notification delivery is not configured")]
    NotConfigured,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One notification to deliver.
///
/// Temperature and status are absent only for test messages sent before
/// the first successful reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub category: NotificationCategory,
    pub temperature_c: Option<Celsius>,
    pub status: Option<TemperatureStatus>,
    pub timestamp: Timestamp,
}

impl NotificationMessage {
    pub fn alert(
        category: NotificationCategory,
        temperature_c: Celsius,
        status: TemperatureStatus,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            category,
            temperature_c: Some(temperature_c),
            status: Some(status),
            timestamp,
        }
    }

    /// A test message carrying the latest cached values, if any.
    pub fn test(
        temperature_c: Option<Celsius>,
        status: Option<TemperatureStatus>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            category: NotificationCategory::Test,
            temperature_c,
            status,
            timestamp,
        }
    }

    pub fn is_test(&self) -> bool {
        self.category == NotificationCategory::Test
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Delivers notifications to operators.
///
/// Callers treat an `Err` as a logged, non-fatal outcome.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError>;
}
