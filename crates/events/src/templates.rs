//! Subject and body templates, keyed by notification category.

use bmcwatch_core::alert::{NotificationCategory, TemperatureStatus, STATUS_UNKNOWN};
use bmcwatch_core::hardware::thresholds::Thresholds;

use crate::notifier::NotificationMessage;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Static deployment details every message mentions.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub thresholds: Thresholds,
    pub bmc_url: String,
    pub check_interval_minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
}

impl TemplateContext {
    pub fn render(&self, message: &NotificationMessage) -> RenderedMessage {
        RenderedMessage {
            subject: subject(message),
            body: match message.category {
                NotificationCategory::Test => self.test_body(message),
                _ => self.report_body(message),
            },
        }
    }

    fn report_body(&self, message: &NotificationMessage) -> String {
        format!(
            "Temperature Monitoring Report\n\
             =====================================\n\
             \n\
             Timestamp: {timestamp}\n\
             \n\
             Temperature: {temperature}\n\
             Status: {status}\n\
             Alert Type: {alert_type}\n\
             \n\
             Thresholds:\n\
             • Warning: {warning}°C\n\
             • Critical: {critical}°C\n\
             \n\
             Recommended Actions:\n\
             {recommendations}\n\
             \n\
             Monitoring Details:\n\
             • BMC URL: {url}\n\
             • Monitoring Interval: {interval} Minutes\n\
             \n\
             This is an automated notification.",
            timestamp = message.timestamp.format(TIMESTAMP_FORMAT),
            temperature = temperature_label(message),
            status = status_label(message.status),
            alert_type = message.category.as_str().to_ascii_uppercase(),
            warning = self.thresholds.warning,
            critical = self.thresholds.critical,
            recommendations = recommendations(message.category).join("\n"),
            url = self.bmc_url,
            interval = self.check_interval_minutes,
        )
    }

    fn test_body(&self, message: &NotificationMessage) -> String {
        format!(
            "BMC Temperature Monitoring System\n\
             \n\
             This automated report provides an overview of the current temperature of {url}.\n\
             \n\
             Status Overview:\n\
             Latest BMC Temperature: {temperature}\n\
             Latest Status: {status}\n\
             \n\
             Monitoring Details:\n\
             Timestamp: {timestamp}\n\
             BMC URL: {url}\n\
             Monitoring Interval: {interval} Minutes\n\
             \n\
             System is operational.",
            url = self.bmc_url,
            temperature = temperature_label(message),
            status = status_label(message.status),
            timestamp = message.timestamp.format(TIMESTAMP_FORMAT),
            interval = self.check_interval_minutes,
        )
    }
}

fn subject(message: &NotificationMessage) -> String {
    let temperature = temperature_label(message);
    match message.category {
        NotificationCategory::Warning => format!("WARNING: High Temperature Alert - {temperature}"),
        NotificationCategory::Critical => {
            format!("CRITICAL: Immediate Action Required - {temperature}")
        }
        NotificationCategory::Regular => format!("Regular Temperature Report - {temperature}"),
        NotificationCategory::Test => "TEST: BMC Temperature Monitoring System".to_string(),
    }
}

fn recommendations(category: NotificationCategory) -> &'static [&'static str] {
    match category {
        NotificationCategory::Warning => &[
            "• Monitor temperature closely",
            "• Check cooling systems",
            "• Ensure proper ventilation",
        ],
        NotificationCategory::Critical => &[
            "• IMMEDIATE ACTION REQUIRED",
            "• Check server cooling",
            "• Contact IT support",
        ],
        NotificationCategory::Regular | NotificationCategory::Test => &[
            "• System operating normally",
            "• Continue regular monitoring",
        ],
    }
}

fn temperature_label(message: &NotificationMessage) -> String {
    match message.temperature_c {
        Some(t) => format!("{t}°C"),
        None => "N/A".to_string(),
    }
}

fn status_label(status: Option<TemperatureStatus>) -> &'static str {
    status.map_or(STATUS_UNKNOWN, TemperatureStatus::as_str)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
