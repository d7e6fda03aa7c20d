//! Fallback notifier used when no mail relay is configured.

use async_trait::async_trait;

use crate::notifier::{NotificationMessage, Notifier, NotifyError};

/// Logs each notification and reports it as undelivered.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnlyNotifier;

#[async_trait]
impl Notifier for LogOnlyNotifier {
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        tracing::warn!(
            category = %message.category,
            temperature_c = ?message.temperature_c,
            status = ?message.status,
            "Email delivery not configured, notification dropped"
        );
        Err(NotifyError::NotConfigured)
    }
}
