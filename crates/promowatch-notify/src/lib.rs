//! Discord announcements for newly spotted promocodes.
//!
//! One rich embed per code, posted to a webhook URL. The embed links back
//! to the originating post and shows its image so readers can double-check
//! the code against the source.

pub mod error;
pub mod webhook;

pub use error::NotifyError;
pub use webhook::WebhookClient;
