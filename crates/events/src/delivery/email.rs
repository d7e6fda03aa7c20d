//! Email notification delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport and renders each
//! message through the category templates. If `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `Ok(None)` and the caller should fall
//! back to [`LogOnlyNotifier`](super::log_only::LogOnlyNotifier).

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::notifier::{NotificationMessage, Notifier, NotifyError};
use crate::templates::TemplateContext;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A sender or recipient address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// SMTP settings are present but incomplete or malformed.
    #[error("Email configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "bmcwatch@localhost";

#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// At least one recipient.
    pub recipients: Vec<String>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("from_address", &self.from_address)
            .field("recipients", &self.recipients)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_password", &self.smtp_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured.
    ///
    /// | Variable        | Required          | Default              |
    /// |-----------------|-------------------|----------------------|
    /// | `SMTP_HOST`     | yes               | -                    |
    /// | `SMTP_PORT`     | no                | `587`                |
    /// | `SMTP_FROM`     | no                | `bmcwatch@localhost` |
    /// | `SMTP_TO`       | when host is set  | -                    |
    /// | `SMTP_USER`     | no                | -                    |
    /// | `SMTP_PASSWORD` | no                | -                    |
    pub fn from_env() -> Result<Option<Self>, EmailError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>, EmailError> {
        let Some(smtp_host) = lookup("SMTP_HOST").filter(|h| !h.trim().is_empty()) else {
            return Ok(None);
        };

        let smtp_port = match lookup("SMTP_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                EmailError::Config(format!("SMTP_PORT must be a valid port number (got '{raw}')"))
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        let recipients = parse_recipients(&lookup("SMTP_TO").unwrap_or_default());
        if recipients.is_empty() {
            return Err(EmailError::Config(
                "SMTP_TO must list at least one recipient when SMTP_HOST is set".to_string(),
            ));
        }

        Ok(Some(Self {
            smtp_host: smtp_host.trim().to_string(),
            smtp_port,
            from_address: lookup("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            recipients,
            smtp_user: lookup("SMTP_USER"),
            smtp_password: lookup("SMTP_PASSWORD"),
        }))
    }
}

fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends rendered temperature notifications via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
    templates: TemplateContext,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig, templates: TemplateContext) -> Self {
        Self { config, templates }
    }

    fn build_message(&self, message: &NotificationMessage) -> Result<Message, EmailError> {
        let rendered = self.templates.render(message);

        let mut builder = Message::builder()
            .from(self.config.from_address.parse()?)
            .subject(rendered.subject)
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.config.recipients {
            builder = builder.to(recipient.parse()?);
        }

        builder
            .body(rendered.body)
            .map_err(|e| EmailError::Build(e.to_string()))
    }

    async fn deliver(&self, message: &NotificationMessage) -> Result<(), EmailError> {
        let email = self.build_message(message)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(
            category = %message.category,
            temperature_c = ?message.temperature_c,
            recipients = self.config.recipients.len(),
            "Notification email sent"
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailDelivery {
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        self.deliver(message).await.map_err(|e| {
            tracing::error!(category = %message.category, error = %e, "Email sending failed");
            NotifyError::from(e)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
