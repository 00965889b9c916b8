//! Platform scraping for promowatch.
//!
//! Three adapters fetch the most recent post of one configured account
//! each: Twitter and Facebook drive a headless Chrome through the W3C
//! WebDriver protocol ([`webdriver`]), Instagram talks to the web API
//! directly with a file-backed session ([`platforms::instagram`]).
//! [`collect_latest_posts`] runs all three and isolates their failures.

pub mod error;
pub mod media;
pub mod platforms;
pub mod prompt;
pub mod session;
pub mod webdriver;

pub use error::ScrapeError;
pub use platforms::{collect_latest_posts, ScrapeContext};
pub use webdriver::{WebDriverClient, WebDriverSession};
