//! Facebook adapter.
//!
//! Reads the newest card of a public page feed without logging in. There
//! is no automated login for this platform; asking for one is an explicit
//! error rather than a silent no-op.

use std::time::Duration;

use promowatch_core::{Platform, Post};

use crate::error::ScrapeError;
use crate::media::download_image;
use crate::platforms::ScrapeContext;
use crate::webdriver::WebDriverSession;

/// Newest rendered post card. Facebook virtualizes the feed; the card not
/// marked virtualized is the one currently on screen, and the `:has(img)`
/// clause skips the page header block.
const LAST_POST_SELECTOR: &str =
    r#"div[data-virtualized="false"] > div > div > div > div > div:has(img)"#;

/// Facebook login is not implemented.
///
/// # Errors
///
/// Always returns [`ScrapeError::LoginNotSupported`].
pub fn login() -> Result<(), ScrapeError> {
    Err(ScrapeError::LoginNotSupported {
        platform: Platform::Facebook,
    })
}

/// Fetches the most recent post from the configured page.
///
/// `Ok(None)` when the feed never rendered a post card within the element
/// wait, or when the card is missing the expected children.
///
/// # Errors
///
/// Returns [`ScrapeError::LoginNotSupported`] under `force_login`; broken
/// webdriver sessions propagate.
pub async fn fetch_latest(
    session: &WebDriverSession,
    ctx: &ScrapeContext<'_>,
) -> Result<Option<Post>, ScrapeError> {
    if ctx.force_login {
        login()?;
    }

    let wait = Duration::from_secs(ctx.config.element_wait_secs);
    let handle = &ctx.config.facebook_handle;
    session
        .navigate(&format!("https://facebook.com/{handle}"))
        .await?;

    let post = match session.find(LAST_POST_SELECTOR, wait).await {
        Ok(post) => post,
        Err(ScrapeError::ElementNotFound { .. }) => {
            tracing::warn!(handle = %handle, "could not find the last post");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let Some(author_elm) = post.find("strong > span").await? else {
        tracing::warn!(handle = %handle, "post card has no author element");
        return Ok(None);
    };
    let author = author_elm.text().await?;

    let Some(text_elm) = post.find("div > span[dir=auto]").await? else {
        tracing::warn!(handle = %handle, "post card has no text element");
        return Ok(None);
    };
    let text = text_elm.text().await?;

    let Some(link) = post.find("a:has(span > span)").await? else {
        tracing::warn!(handle = %handle, "post card has no permalink");
        return Ok(None);
    };
    let Some(url) = link.attribute("href").await? else {
        tracing::warn!(handle = %handle, "post permalink has no href");
        return Ok(None);
    };

    let mut image = None;
    let mut image_url = None;
    if let Some(image_elm) = post.find("div > img").await? {
        if let Some(src) = image_elm.attribute("src").await? {
            match download_image(ctx.http, &src).await {
                Ok(decoded) => {
                    image = Some(decoded);
                    image_url = Some(src);
                }
                Err(e) => {
                    tracing::warn!(url = %src, error = %e, "failed to download post image");
                }
            }
        }
    }

    Ok(Some(Post {
        platform: Platform::Facebook,
        author,
        text,
        image,
        url,
        image_url,
    }))
}
