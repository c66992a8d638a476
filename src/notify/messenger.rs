//! Per-item channel: one short message per product through an HTTP
//! message gateway.
//!
//! The gateway's automation rules dislike bursts, so successive messages
//! are staggered: message `i` goes out `i * stagger` after the batch
//! starts, as explicit sleeps relative to batch start rather than
//! wall-clock minute arithmetic.

use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::{info, instrument};

use crate::config::MessengerConfig;
use crate::error::NotifyError;
use crate::models::Product;
use crate::notify::render;

/// Posts per-product messages to the configured gateway.
pub struct Messenger {
    client: Client,
    api_url: String,
    phone: String,
    stagger: Duration,
}

impl Messenger {
    pub fn new(config: &MessengerConfig, stagger: Duration) -> Result<Self, NotifyError> {
        let api_url = config
            .api_url
            .clone()
            .ok_or(NotifyError::Setup("messenger gateway url"))?;
        let phone = config
            .phone
            .clone()
            .ok_or(NotifyError::Setup("messenger destination"))?;

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_url,
            phone: normalize_phone(&phone),
            stagger,
        })
    }

    /// Send one message per product, staggered.
    ///
    /// A failed send aborts the remainder of the batch; the products
    /// already dispatched stay dispatched (at-most-once, no retries).
    #[instrument(level = "info", skip_all, fields(count = products.len()))]
    pub async fn send_all(&self, products: &[Product]) -> Result<(), NotifyError> {
        let start = Instant::now();
        for (i, product) in products.iter().enumerate() {
            sleep_until(start + self.stagger * i as u32).await;
            self.send_one(product).await?;
        }
        Ok(())
    }

    async fn send_one(&self, product: &Product) -> Result<(), NotifyError> {
        let payload = json!({
            "phone": self.phone,
            "message": render::message_text(product),
        });

        let response = self.client.post(&self.api_url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::GatewayStatus(response.status()));
        }

        info!(
            title = %truncate(&product.title, 50),
            "Message dispatched"
        );
        Ok(())
    }
}

/// Strip the `+` and spaces the gateway rejects.
fn normalize_phone(phone: &str) -> String {
    phone.replace(['+', ' '], "")
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messenger_config(phone: Option<&str>, api_url: Option<&str>) -> MessengerConfig {
        MessengerConfig {
            phone: phone.map(String::from),
            api_url: api_url.map(String::from),
            enabled: true,
        }
    }

    #[test]
    fn test_setup_requires_destination() {
        let config = messenger_config(None, Some("https://gateway.local/send"));
        assert!(matches!(
            Messenger::new(&config, Duration::from_secs(1)),
            Err(NotifyError::Setup("messenger destination"))
        ));
    }

    #[test]
    fn test_setup_requires_gateway_url() {
        let config = messenger_config(Some("+55 11 99999-9999"), None);
        assert!(matches!(
            Messenger::new(&config, Duration::from_secs(1)),
            Err(NotifyError::Setup("messenger gateway url"))
        ));
    }

    #[test]
    fn test_phone_normalization() {
        assert_eq!(normalize_phone("+55 11 99999-9999"), "551199999-9999");
        assert_eq!(normalize_phone("5511999999999"), "5511999999999");
    }

    #[test]
    fn test_setup_normalizes_destination() {
        let config = messenger_config(Some("+55 11 98888 7777"), Some("https://gateway.local/send"));
        let messenger = Messenger::new(&config, Duration::from_secs(120)).unwrap();
        assert_eq!(messenger.phone, "5511988887777");
        assert_eq!(messenger.stagger, Duration::from_secs(120));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 50), "short");
        assert_eq!(truncate("Fone de ouvido sem fio", 4), "Fone");
        // Multi-byte characters stay whole.
        assert_eq!(truncate("tênis", 2), "tê");
    }
}
