//! Runtime configuration loaded from environment variables.
//!
//! Settings are grouped per concern and read once at startup with
//! [`Config::from_env`]; the resulting value is passed by reference to
//! each component constructor. Nothing reads the environment after that.
//!
//! Credentials are optional: a missing marketplace login means
//! searches run unauthenticated, and missing channel credentials leave
//! that channel disabled for the lifetime of the process.

use std::env;
use std::time::Duration;

use crate::session::Credentials;

/// Marketplace account used for the login flow.
#[derive(Debug, Clone, Default)]
pub struct MarketplaceConfig {
    /// Environment variable: `MERCADOLIVRE_EMAIL`
    pub email: Option<String>,
    /// Environment variable: `MERCADOLIVRE_PASSWORD`
    pub password: Option<String>,
}

impl MarketplaceConfig {
    fn from_env() -> Self {
        Self {
            email: env::var("MERCADOLIVRE_EMAIL").ok(),
            password: env::var("MERCADOLIVRE_PASSWORD").ok(),
        }
    }

    /// Both halves of the login, when both are present.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some(Credentials {
                email: email.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}

/// Bulk channel settings: SMTP account and recipient list.
#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    /// Environment variable: `GMAIL_EMAIL`
    pub username: Option<String>,
    /// App password, not the account password.
    ///
    /// Environment variable: `GMAIL_PASSWORD`
    pub password: Option<String>,
    /// Environment variable: `EMAIL_RECIPIENTS` (comma-separated)
    pub recipients: Vec<String>,
    /// Environment variable: `ENABLE_EMAIL` (default true)
    pub enabled: bool,
}

impl MailConfig {
    fn from_env() -> Self {
        Self {
            username: env::var("GMAIL_EMAIL").ok(),
            password: env::var("GMAIL_PASSWORD").ok(),
            recipients: env::var("EMAIL_RECIPIENTS")
                .map(|v| split_csv(&v))
                .unwrap_or_default(),
            enabled: env_flag("ENABLE_EMAIL", true),
        }
    }
}

/// Per-item channel settings: message gateway endpoint and destination.
#[derive(Debug, Clone, Default)]
pub struct MessengerConfig {
    /// Destination phone number, `+55...` style.
    ///
    /// Environment variable: `WHATSAPP_PHONE`
    pub phone: Option<String>,
    /// Message gateway endpoint messages are POSTed to.
    ///
    /// Environment variable: `MESSENGER_API_URL`
    pub api_url: Option<String>,
    /// Environment variable: `ENABLE_WHATSAPP` (default true)
    pub enabled: bool,
}

impl MessengerConfig {
    fn from_env() -> Self {
        Self {
            phone: env::var("WHATSAPP_PHONE").ok(),
            api_url: env::var("MESSENGER_API_URL").ok(),
            enabled: env_flag("ENABLE_WHATSAPP", true),
        }
    }
}

/// Search caps and pacing. Compiled-in; these track the target site's
/// tolerance rather than user preference.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Result containers parsed per search page.
    pub max_products_per_search: usize,
    /// Products kept after ranking, across all keywords.
    pub max_total: usize,
    /// Politeness pause between search requests.
    pub request_delay: Duration,
    /// Unfiltered queries fetched alongside the category sweeps.
    pub popular_searches: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_products_per_search: 20,
            max_total: 20,
            request_delay: Duration::from_secs(2),
            popular_searches: ["iphone", "notebook", "tênis", "camiseta"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Timer settings for the hourly cycle.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// How often a cycle fires.
    pub send_interval: Duration,
    /// How often the background task checks whether a cycle is due.
    pub poll_interval: Duration,
    /// Gap between successive per-item messages.
    pub message_stagger: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            send_interval: Duration::from_secs(60 * 60),
            poll_interval: Duration::from_secs(60),
            message_stagger: Duration::from_secs(2 * 60),
        }
    }
}

/// Everything the process needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub marketplace: MarketplaceConfig,
    pub mail: MailConfig,
    pub messenger: MessengerConfig,
    /// Tracking token appended to outbound product links.
    ///
    /// Environment variable: `AFFILIATE_ID` (default `ML_DEFAULT`)
    pub affiliate_id: String,
    pub search: SearchConfig,
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Read every section from the environment.
    ///
    /// Call `dotenvy::dotenv()` before this so a `.env` file is honored.
    pub fn from_env() -> Self {
        Self {
            marketplace: MarketplaceConfig::from_env(),
            mail: MailConfig::from_env(),
            messenger: MessengerConfig::from_env(),
            affiliate_id: env::var("AFFILIATE_ID").unwrap_or_else(|_| "ML_DEFAULT".to_string()),
            search: SearchConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

/// `"true"` (any casing) is on; anything else is off; unset uses `default`.
fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => value.to_lowercase() == "true",
        Err(_) => default,
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_csv() {
        assert_eq!(
            split_csv("a@example.com, b@example.com"),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
        assert_eq!(split_csv(""), Vec::<String>::new());
        assert_eq!(split_csv(" , "), Vec::<String>::new());
    }

    #[test]
    fn test_env_flag_parsing() {
        // Unset keys fall back to the default.
        assert!(env_flag("PROMO_RADAR_TEST_UNSET_FLAG", true));
        assert!(!env_flag("PROMO_RADAR_TEST_UNSET_FLAG", false));

        unsafe { env::set_var("PROMO_RADAR_TEST_FLAG_ON", "TRUE") };
        assert!(env_flag("PROMO_RADAR_TEST_FLAG_ON", false));

        unsafe { env::set_var("PROMO_RADAR_TEST_FLAG_OFF", "no") };
        assert!(!env_flag("PROMO_RADAR_TEST_FLAG_OFF", true));
    }

    #[test]
    fn test_credentials_require_both_halves() {
        let mut marketplace = MarketplaceConfig {
            email: Some("user@example.com".to_string()),
            password: None,
        };
        assert!(marketplace.credentials().is_none());

        marketplace.password = Some("secret".to_string());
        let credentials = marketplace.credentials().unwrap();
        assert_eq!(credentials.email, "user@example.com");
    }

    #[test]
    fn test_search_defaults() {
        let search = SearchConfig::default();
        assert_eq!(search.max_products_per_search, 20);
        assert_eq!(search.max_total, 20);
        assert_eq!(search.popular_searches.len(), 4);
    }
}
