//! Outgoing mail.
//!
//! `SmtpMailer` delivers over SMTP with lettre; `InMemoryMailer` records
//! messages instead and is used in tests and when no SMTP account is set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MessageBuilder};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::SmtpConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// The transport refused to take the message.
    #[error("Mail transport unavailable: {0}")]
    Unavailable(String),
}

/// A rendered HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: Vec<String>,
    /// Hidden recipients. Newsletters go out as a single message with every
    /// subscriber here.
    pub bcc: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl Mail {
    pub fn to(recipient: impl Into<String>, subject: impl Into<String>, html: String) -> Self {
        Self {
            to: vec![recipient.into()],
            bcc: Vec::new(),
            subject: subject.into(),
            html,
        }
    }

    pub fn bcc(recipients: Vec<String>, subject: impl Into<String>, html: String) -> Self {
        Self {
            to: Vec::new(),
            bcc: recipients,
            subject: subject.into(),
            html,
        }
    }

    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.bcc.len()
    }
}

/// Delivers rendered mail.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> Result<(), MailError>;
}

/// SMTP delivery over STARTTLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport from configuration. No connection is opened
    /// until the first message is sent.
    ///
    /// # Errors
    ///
    /// Returns error if the relay host or the sender address is invalid.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let address: Address = config
            .from_address
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.from_address.clone()))?;

        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from: Mailbox::new(Some(config.from_name.clone()), address),
        })
    }

    fn build(&self, mail: &Mail) -> Result<Message, MailError> {
        let mut builder: MessageBuilder = Message::builder()
            .from(self.from.clone())
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML);

        for to in &mail.to {
            builder = builder.to(parse_mailbox(to)?);
        }
        for bcc in &mail.bcc {
            builder = builder.bcc(parse_mailbox(bcc)?);
        }

        Ok(builder.body(mail.html.clone())?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(skip(self, mail), fields(subject = %mail.subject, recipients = mail.recipient_count()))]
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        let message = self.build(&mail)?;
        self.transport.send(message).await?;

        tracing::info!("email sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

/// Records mail instead of delivering it.
///
/// Can be told to fail, in which case nothing is recorded.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMailer {
    sent: Arc<Mutex<Vec<Mail>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following send fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Mail> {
        self.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Mail>> {
        self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Unavailable("mailer set to fail".to_string()));
        }

        tracing::debug!(subject = %mail.subject, recipients = mail.recipient_count(), "email recorded");
        self.lock().push(mail);
        Ok(())
    }
}
