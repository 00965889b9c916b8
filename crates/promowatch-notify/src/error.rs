//! Error type for webhook delivery.

use thiserror::Error;

/// Errors produced when announcing a code to Discord.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport-level failure: connect, timeout, TLS.
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook endpoint answered outside the 2xx range.
    #[error("webhook returned unexpected status {status}")]
    UnexpectedStatus { status: u16 },
}
