//! Outbound mail
//!
//! [`Mailer`] is the seam the domain crates send through. Two transports:
//! an HTTP relay (JSON `POST` with a bearer key) and a log-only transport
//! used when no relay is configured.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl MailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail relay unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mail relay rejected the message with status {0}")]
    Rejected(u16),
}

#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Relay settings
#[derive(Clone)]
pub struct RelayConfig {
    pub url: String,
    pub api_key: String,
    pub from: String,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    config: RelayConfig,
}

impl HttpMailer {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let payload = RelayPayload {
            from: &self.config.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected(status.as_u16()));
        }

        tracing::debug!(to = %message.to, subject = %message.subject, "Mail relayed");
        Ok(())
    }
}

/// Writes the message to the log instead of sending it
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.html,
            "Mail not sent (no relay configured)"
        );
        Ok(())
    }
}

/// Transport picked at startup
#[derive(Debug, Clone)]
pub enum MailTransport {
    Http(HttpMailer),
    Log(LogMailer),
}

impl MailTransport {
    /// HTTP relay when configured, log-only otherwise
    pub fn from_config(relay: Option<RelayConfig>) -> Self {
        match relay {
            Some(config) => MailTransport::Http(HttpMailer::new(config)),
            None => MailTransport::Log(LogMailer),
        }
    }
}

impl Mailer for MailTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        match self {
            MailTransport::Http(m) => Mailer::send(m, message).await,
            MailTransport::Log(m) => Mailer::send(m, message).await,
        }
    }
}
