//! Notification dispatch over two independently toggleable channels.
//!
//! - **Bulk channel** ([`email`]): every selected product in one HTML
//!   document to a fixed recipient list
//! - **Per-item channel** ([`messenger`]): one short message per product
//!   to a single destination, staggered in time
//!
//! Channel setup happens once at startup. A channel that fails setup
//! (missing credentials, bad addresses) stays disabled for the lifetime
//! of the process; a channel disabled by its flag reports success without
//! sending. Send failures are logged and surfaced as a boolean, never
//! raised past the orchestrator.

pub mod email;
pub mod messenger;
pub mod render;

use chrono::Local;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::models::Product;
use email::Mailer;
use messenger::Messenger;

/// Both channels behind one dispatch surface.
pub struct Notifier {
    mailer: Option<Mailer>,
    messenger: Option<Messenger>,
    email_enabled: bool,
    messenger_enabled: bool,
}

impl Notifier {
    /// Set up whichever channels the configuration supports.
    pub fn new(config: &Config) -> Self {
        let mailer = if config.mail.enabled {
            match Mailer::new(&config.mail) {
                Ok(mailer) => {
                    info!(recipients = mailer.recipient_count(), "Email channel ready");
                    Some(mailer)
                }
                Err(e) => {
                    warn!(error = %e, "Email channel disabled for this process");
                    None
                }
            }
        } else {
            None
        };

        let messenger = if config.messenger.enabled {
            match Messenger::new(&config.messenger, config.schedule.message_stagger) {
                Ok(messenger) => {
                    info!("Message channel ready");
                    Some(messenger)
                }
                Err(e) => {
                    warn!(error = %e, "Message channel disabled for this process");
                    None
                }
            }
        } else {
            None
        };

        Self {
            mailer,
            messenger,
            email_enabled: config.mail.enabled,
            messenger_enabled: config.messenger.enabled,
        }
    }

    /// Whether the bulk channel will actually dispatch when asked.
    pub fn email_ready(&self) -> bool {
        self.email_enabled && self.mailer.is_some()
    }

    /// Whether the per-item channel will actually dispatch when asked.
    pub fn messenger_ready(&self) -> bool {
        self.messenger_enabled && self.messenger.is_some()
    }

    /// Dispatch the bulk channel: all products, one document.
    ///
    /// Disabled channel and empty input are quiet successes; a channel
    /// that never finished setup is a failure.
    pub async fn send_email(&self, products: &[Product]) -> bool {
        if !self.email_enabled {
            debug!("Email channel disabled by flag");
            return true;
        }
        if products.is_empty() {
            debug!("Nothing to email");
            return true;
        }
        let Some(mailer) = &self.mailer else {
            warn!("Email channel unavailable (setup failed)");
            return false;
        };

        let now = Local::now();
        let subject = render::email_subject(products.len(), now);
        let html = render::email_html(products, now);
        match mailer.send(&subject, html).await {
            Ok(()) => {
                info!(count = products.len(), "Email sent");
                true
            }
            Err(e) => {
                error!(error = %e, "Email send failed");
                false
            }
        }
    }

    /// Dispatch the per-item channel: one staggered message per product.
    pub async fn send_messages(&self, products: &[Product]) -> bool {
        if !self.messenger_enabled {
            debug!("Message channel disabled by flag");
            return true;
        }
        if products.is_empty() {
            debug!("Nothing to message");
            return true;
        }
        let Some(messenger) = &self.messenger else {
            warn!("Message channel unavailable (setup failed)");
            return false;
        };

        match messenger.send_all(products).await {
            Ok(()) => {
                info!(count = products.len(), "Messages dispatched");
                true
            }
            Err(e) => {
                error!(error = %e, "Message dispatch failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MailConfig, MessengerConfig};

    fn config_with(mail: MailConfig, messenger: MessengerConfig) -> Config {
        let mut config = base_config();
        config.mail = mail;
        config.messenger = messenger;
        config
    }

    fn base_config() -> Config {
        Config {
            marketplace: Default::default(),
            mail: Default::default(),
            messenger: Default::default(),
            affiliate_id: String::new(),
            search: Default::default(),
            schedule: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_disabled_channels_report_success() {
        let notifier = Notifier::new(&config_with(
            MailConfig {
                enabled: false,
                ..Default::default()
            },
            MessengerConfig {
                enabled: false,
                ..Default::default()
            },
        ));

        assert!(!notifier.email_ready());
        assert!(!notifier.messenger_ready());
        assert!(notifier.send_email(&[]).await);
        assert!(notifier.send_messages(&[]).await);
    }

    #[tokio::test]
    async fn test_enabled_but_unconfigured_channels_are_not_ready() {
        // Flags on, credentials missing: setup fails, channels stay off.
        let notifier = Notifier::new(&config_with(
            MailConfig {
                enabled: true,
                ..Default::default()
            },
            MessengerConfig {
                enabled: true,
                ..Default::default()
            },
        ));

        assert!(!notifier.email_ready());
        assert!(!notifier.messenger_ready());
        // Empty input is still a quiet success.
        assert!(notifier.send_email(&[]).await);
        assert!(notifier.send_messages(&[]).await);
    }

    #[tokio::test]
    async fn test_fully_configured_channels_are_ready() {
        let notifier = Notifier::new(&config_with(
            MailConfig {
                username: Some("from@example.com".to_string()),
                password: Some("secret".to_string()),
                recipients: vec!["to@example.com".to_string()],
                enabled: true,
            },
            MessengerConfig {
                phone: Some("+5511999999999".to_string()),
                api_url: Some("https://gateway.local/send".to_string()),
                enabled: true,
            },
        ));

        assert!(notifier.email_ready());
        assert!(notifier.messenger_ready());
    }
}
