//! Failure taxonomy for the scrape-and-notify pipeline.
//!
//! Each stage owns an error kind so callers make an explicit
//! continue-or-abort decision instead of relying on a blanket catch:
//!
//! - [`AuthError`]: login failed; the cycle proceeds without a session
//! - [`SearchError`]: a whole search request failed; that keyword
//!   contributes no products this cycle
//! - [`ItemError`]: one result container could not be extracted; only
//!   that item is skipped
//! - [`NotifyError`]: a notification channel failed to set up or to send
//!
//! None of these abort a cycle. The worst case is fewer results or one
//! fewer channel.

use thiserror::Error;

/// Login against the marketplace failed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A login request could not be completed at the transport level.
    #[error("login request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The login flow answered with a non-success status at one of its steps.
    #[error("login rejected at step {step}: status {status}")]
    Rejected {
        step: &'static str,
        status: reqwest::StatusCode,
    },
}

/// A search request failed before any parsing could happen.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search returned status {0}")]
    Status(reqwest::StatusCode),
}

/// One result container could not be turned into a product.
#[derive(Debug, Error)]
pub enum ItemError {
    /// A field the record cannot exist without was absent from the markup.
    #[error("missing {0}")]
    MissingField(&'static str),
    /// A price string did not normalize to a number.
    #[error("unparseable price {0:?}")]
    Price(String),
}

/// A notification channel failed to set up or to send.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The channel is missing configuration and stays disabled for the
    /// lifetime of the process.
    #[error("channel not configured: {0}")]
    Setup(&'static str),
    #[error("smtp send failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("message build failed: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("gateway send failed: {0}")]
    Gateway(#[from] reqwest::Error),
    #[error("gateway returned status {0}")]
    GatewayStatus(reqwest::StatusCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_error_display() {
        let e = ItemError::MissingField("title");
        assert_eq!(e.to_string(), "missing title");

        let e = ItemError::Price("abc".to_string());
        assert_eq!(e.to_string(), "unparseable price \"abc\"");
    }

    #[test]
    fn test_setup_error_display() {
        let e = NotifyError::Setup("mail credentials");
        assert_eq!(e.to_string(), "channel not configured: mail credentials");
    }
}
