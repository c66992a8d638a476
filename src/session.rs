//! Marketplace login as a replaceable capability.
//!
//! Login form markup is site-specific and brittle by nature, so the
//! pipeline only ever sees the narrow [`SessionProvider`] interface:
//! credentials in, session-or-failure out. The default [`FormLogin`]
//! provider drives the site's two-step login form over a cookie-store
//! HTTP client; swapping in a real browser-automation provider means
//! implementing one trait.

use chrono::{DateTime, Local};
use reqwest::Client;
use tracing::{info, instrument};

use crate::error::AuthError;

/// Marketplace account login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// An authenticated browsing session.
///
/// Opaque marker: the cookies live in the client the provider was built
/// around, so holding this value only tells you the login flow completed.
#[derive(Debug)]
pub struct Session {
    pub established_at: DateTime<Local>,
}

/// Something that can turn credentials into a session.
pub trait SessionProvider {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError>;
}

/// Default provider: drives the login form directly over HTTP.
///
/// Three sequential calls, mirroring what the site's form does in a
/// browser: load the form, submit the user id, submit the password. The
/// client must have its cookie store enabled or the session is lost on
/// the way out.
pub struct FormLogin {
    client: Client,
    base_url: String,
}

impl FormLogin {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn login_url(&self) -> String {
        format!("{}/jms/lgz/login", self.base_url)
    }
}

impl SessionProvider for FormLogin {
    #[instrument(level = "info", skip_all)]
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let login_url = self.login_url();

        let response = self.client.get(&login_url).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::Rejected {
                step: "form",
                status: response.status(),
            });
        }

        let response = self
            .client
            .post(&login_url)
            .form(&[("user_id", credentials.email.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::Rejected {
                step: "user_id",
                status: response.status(),
            });
        }

        let response = self
            .client
            .post(&login_url)
            .form(&[
                ("user_id", credentials.email.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::Rejected {
                step: "password",
                status: response.status(),
            });
        }

        info!("Marketplace login completed");
        Ok(Session {
            established_at: Local::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url() {
        let provider = FormLogin::new(Client::new(), "https://www.mercadolivre.com.br");
        assert_eq!(
            provider.login_url(),
            "https://www.mercadolivre.com.br/jms/lgz/login"
        );
    }
}
