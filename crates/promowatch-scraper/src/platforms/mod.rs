//! Platform adapters.
//!
//! One adapter per platform, each fetching the single most recent post of
//! the configured account. Adapters degrade to "no post" when the expected
//! page structure is absent; anything harder fails the adapter, and
//! [`collect_latest_posts`] keeps such failures away from the other
//! platforms.

pub mod facebook;
pub mod instagram;
pub mod twitter;

use std::path::Path;

use promowatch_core::{AppConfig, Platform, Post};
use reqwest::Client;

use crate::error::ScrapeError;
use crate::webdriver::WebDriverSession;

/// Everything the adapters need for one pass.
pub struct ScrapeContext<'a> {
    /// Shared HTTP client for media downloads and the Instagram API.
    pub http: &'a Client,
    pub config: &'a AppConfig,
    /// Directory holding the Chrome profile and the Instagram session file.
    pub data_dir: &'a Path,
    /// Prompt for credentials and log in before fetching.
    pub force_login: bool,
}

/// Fetches the latest post from every platform, isolating failures.
///
/// Returns one slot per platform in [`Platform::ALL`] order; a slot is
/// `None` when that platform had no readable post or its adapter failed.
/// Adapter errors are logged here and never abort the other platforms.
///
/// `session` is `None` when the browser could not be started, which
/// downgrades the two browser-driven platforms to "no post" while
/// Instagram (plain HTTP) still runs.
pub async fn collect_latest_posts(
    session: Option<&WebDriverSession>,
    ctx: &ScrapeContext<'_>,
) -> Vec<Option<Post>> {
    let mut posts = Vec::with_capacity(Platform::ALL.len());

    // Twitter/X
    match session {
        Some(session) => posts.push(settle(
            Platform::Twitter,
            twitter::fetch_latest(session, ctx).await,
        )),
        None => {
            tracing::warn!(platform = %Platform::Twitter, "no browser session, skipping");
            posts.push(None);
        }
    }

    // Instagram
    posts.push(settle(
        Platform::Instagram,
        instagram::fetch_latest(ctx).await,
    ));

    // Facebook
    match session {
        Some(session) => posts.push(settle(
            Platform::Facebook,
            facebook::fetch_latest(session, ctx).await,
        )),
        None => {
            tracing::warn!(platform = %Platform::Facebook, "no browser session, skipping");
            posts.push(None);
        }
    }

    posts
}

/// Logs one adapter's outcome and flattens it to the post slot.
fn settle(platform: Platform, result: Result<Option<Post>, ScrapeError>) -> Option<Post> {
    match result {
        Ok(Some(post)) => {
            tracing::info!(platform = %platform, url = %post.url, "fetched latest post");
            Some(post)
        }
        Ok(None) => {
            tracing::info!(platform = %platform, "no post found");
            None
        }
        Err(e @ ScrapeError::LoginNotSupported { .. }) => {
            tracing::error!(platform = %platform, error = %e, "login attempt failed");
            None
        }
        Err(e) => {
            tracing::warn!(platform = %platform, error = %e, "adapter failed");
            None
        }
    }
}
