//! Outbound notifications for temperature events.
//!
//! - [`Notifier`]: the `send` contract the monitor dispatches through.
//! - [`templates`]: category-keyed subject and body rendering.
//! - [`delivery`]: concrete channels (SMTP email, log-only fallback).

pub mod delivery;
pub mod notifier;
pub mod templates;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use delivery::log_only::LogOnlyNotifier;
pub use notifier::{NotificationMessage, Notifier, NotifyError};
pub use templates::{RenderedMessage, TemplateContext};
