//! SMTP email provider using lettre

use super::{EmailProvider, SendResult};
use crate::models::Email;
use async_trait::async_trait;
use core_config::smtp::SmtpConfig;
use eyre::{Result, WrapErr};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

/// SMTP email provider
pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: Arc<SmtpConfig>,
}

impl SmtpProvider {
    /// Create a new SMTP provider
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let transport = if config.use_tls {
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .wrap_err("Failed to create SMTP relay")?
                .credentials(creds)
                .port(config.port)
                .build()
        } else if !config.username.is_empty() {
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .credentials(creds)
                .port(config.port)
                .build()
        } else {
            // No auth (for Mailpit/Mailhog)
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .build()
        };

        Ok(Self {
            transport,
            config: Arc::new(config),
        })
    }

    fn from_mailbox(&self, email: &Email) -> Result<Mailbox> {
        let from = email
            .from
            .clone()
            .unwrap_or_else(|| format!("{} <{}>", self.config.from_name, self.config.from_email));
        from.parse().wrap_err("Invalid from address")
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &Email) -> Result<SendResult> {
        let to: Mailbox = email.to.parse().wrap_err("Invalid recipient address")?;

        let builder = Message::builder()
            .from(self.from_mailbox(email)?)
            .to(to)
            .subject(&email.subject);

        let message = match (&email.body_html, &email.body_text) {
            (Some(html), _) => builder
                .header(ContentType::TEXT_HTML)
                .body(html.clone())
                .wrap_err("Failed to build HTML email")?,
            (None, Some(text)) => builder
                .header(ContentType::TEXT_PLAIN)
                .body(text.clone())
                .wrap_err("Failed to build text email")?,
            (None, None) => eyre::bail!("Email has no body"),
        };

        let response = self
            .transport
            .send(message)
            .await
            .wrap_err("SMTP send failed")?;

        tracing::debug!(to = %email.to, "Email sent via SMTP");

        Ok(SendResult {
            message_id: response
                .message()
                .collect::<Vec<_>>()
                .join(" "),
        })
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
