use std::path::PathBuf;

use promowatch_core::Platform;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("webdriver command failed ({error}): {message}")]
    WebDriver { error: String, message: String },

    #[error("element \"{selector}\" not found after {waited_secs}s")]
    ElementNotFound { selector: String, waited_secs: u64 },

    #[error("login is not supported for {platform}")]
    LoginNotSupported { platform: Platform },

    #[error("login to {platform} failed: {reason}")]
    LoginFailed { platform: Platform, reason: String },

    #[error("no saved session at {}; run with --force-login first", path.display())]
    SessionMissing { path: PathBuf },

    #[error("{platform} session expired or invalid; run with --force-login")]
    SessionExpired { platform: Platform },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
