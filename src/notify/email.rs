//! Bulk channel: one HTML document over SMTP.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

use crate::config::MailConfig;
use crate::error::NotifyError;

const SMTP_RELAY: &str = "smtp.gmail.com";

/// SMTP transport plus the fixed recipient list.
///
/// Built once at startup; construction fails when the account or the
/// recipient list is missing, which leaves the bulk channel disabled for
/// the lifetime of the process.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    recipients: Vec<Mailbox>,
}

impl Mailer {
    pub fn new(config: &MailConfig) -> Result<Self, NotifyError> {
        let username = config
            .username
            .clone()
            .ok_or(NotifyError::Setup("mail account"))?;
        let password = config
            .password
            .clone()
            .ok_or(NotifyError::Setup("mail app password"))?;
        if config.recipients.is_empty() {
            return Err(NotifyError::Setup("mail recipients"));
        }

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(SMTP_RELAY)?
            .credentials(Credentials::new(username.clone(), password))
            .build();

        let from = username.parse::<Mailbox>()?;
        let recipients = config
            .recipients
            .iter()
            .map(|recipient| recipient.parse::<Mailbox>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            transport,
            from,
            recipients,
        })
    }

    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    /// Send one HTML document to every configured recipient.
    #[instrument(level = "info", skip(self, html))]
    pub async fn send(&self, subject: &str, html: String) -> Result<(), NotifyError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject);
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }
        let message = builder.header(ContentType::TEXT_HTML).body(html)?;

        self.transport.send(message).await?;
        info!(recipients = self.recipients.len(), "Offer email dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config(
        username: Option<&str>,
        password: Option<&str>,
        recipients: &[&str],
    ) -> MailConfig {
        MailConfig {
            username: username.map(String::from),
            password: password.map(String::from),
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
            enabled: true,
        }
    }

    #[test]
    fn test_setup_requires_account() {
        let config = mail_config(None, Some("secret"), &["to@example.com"]);
        assert!(matches!(
            Mailer::new(&config),
            Err(NotifyError::Setup("mail account"))
        ));
    }

    #[test]
    fn test_setup_requires_recipients() {
        let config = mail_config(Some("from@example.com"), Some("secret"), &[]);
        assert!(matches!(
            Mailer::new(&config),
            Err(NotifyError::Setup("mail recipients"))
        ));
    }

    #[tokio::test]
    async fn test_setup_rejects_invalid_recipient() {
        let config = mail_config(Some("from@example.com"), Some("secret"), &["not-an-address"]);
        assert!(matches!(
            Mailer::new(&config),
            Err(NotifyError::Address(_))
        ));
    }

    #[tokio::test]
    async fn test_setup_with_full_config() {
        let config = mail_config(
            Some("from@example.com"),
            Some("secret"),
            &["a@example.com", "b@example.com"],
        );
        let mailer = Mailer::new(&config).unwrap();
        assert_eq!(mailer.recipient_count(), 2);
    }
}
