//! Twitter/X adapter.
//!
//! Drives the headless browser over `x.com/<handle>` and reads the top
//! `article` card. Login goes through the interactive `i/flow/login` form
//! and is only triggered by `--force-login`; afterwards the Chrome profile
//! under the data directory keeps the session alive across passes.

use std::time::Duration;

use promowatch_core::{Platform, Post};

use crate::error::ScrapeError;
use crate::media::download_image;
use crate::platforms::ScrapeContext;
use crate::prompt::{prompt_credentials, prompt_line, Credentials};
use crate::webdriver::{WebDriverSession, KEY_RETURN};

const LOGIN_URL: &str = "https://x.com/i/flow/login";
const HOME_URL: &str = "https://x.com/home";

/// How long to wait for the optional confirmation-code input to appear.
const CONFIRMATION_WAIT: Duration = Duration::from_secs(5);
/// How long to wait to land on the home timeline after submitting.
const HOME_WAIT: Duration = Duration::from_secs(10);

/// Logs in through the interactive x.com flow.
///
/// Types the username and password, answers the occasional
/// confirmation-code challenge from stdin, and waits for the home
/// timeline to confirm the session.
///
/// # Errors
///
/// - [`ScrapeError::ElementNotFound`] — the login form never appeared.
/// - [`ScrapeError::LoginFailed`] — the home timeline was never reached.
pub async fn login(
    session: &WebDriverSession,
    credentials: &Credentials,
    wait: Duration,
) -> Result<(), ScrapeError> {
    session.navigate(LOGIN_URL).await?;

    session
        .find(r#"input[autocomplete="username"]"#, wait)
        .await?
        .send_keys(&format!("{}{KEY_RETURN}", credentials.username))
        .await?;

    session
        .find(r#"input[autocomplete="current-password"]"#, wait)
        .await?
        .send_keys(&format!("{}{KEY_RETURN}", credentials.password))
        .await?;

    // A confirmation-code challenge sometimes follows the password. Any
    // input field while not yet on the home timeline means we must answer.
    if let Ok(code_input) = session.find("input[autocomplete]", CONFIRMATION_WAIT).await {
        if session.current_url().await? != HOME_URL {
            let code = prompt_line("Enter the confirmation code: ").await?;
            code_input
                .send_keys(&format!("{code}{KEY_RETURN}"))
                .await?;
        }
    }

    if session.wait_for_url(HOME_URL, HOME_WAIT).await? {
        tracing::info!(platform = %Platform::Twitter, "logged in");
        Ok(())
    } else {
        Err(ScrapeError::LoginFailed {
            platform: Platform::Twitter,
            reason: "home timeline never loaded".to_string(),
        })
    }
}

/// Fetches the most recent tweet from the configured profile.
///
/// `Ok(None)` when no tweet card can be located within the element wait —
/// rate limiting and login interstitials both look like that, and both
/// resolve on a later pass.
///
/// # Errors
///
/// Login failures under `force_login` and broken webdriver sessions
/// propagate; everything structural degrades to `Ok(None)`.
pub async fn fetch_latest(
    session: &WebDriverSession,
    ctx: &ScrapeContext<'_>,
) -> Result<Option<Post>, ScrapeError> {
    let wait = Duration::from_secs(ctx.config.element_wait_secs);

    if ctx.force_login {
        let credentials = prompt_credentials("Twitter (email or phone number)").await?;
        login(session, &credentials, wait).await?;
    }

    let handle = &ctx.config.twitter_handle;
    session.navigate(&format!("https://x.com/{handle}")).await?;

    let tweet = match session.find("article", wait).await {
        Ok(tweet) => tweet,
        Err(ScrapeError::ElementNotFound { .. }) => {
            tracing::warn!(handle = %handle, "could not find the last tweet");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let Some(text_elm) = tweet.find(r#"div[data-testid="tweetText"]"#).await? else {
        tracing::warn!(handle = %handle, "tweet card has no text element");
        return Ok(None);
    };
    let text = text_elm.text().await?;

    let Some(author_elm) = tweet.find("a > div > span").await? else {
        tracing::warn!(handle = %handle, "tweet card has no author element");
        return Ok(None);
    };
    // Rendered as "@handle"; drop the sigil.
    let author = author_elm
        .text()
        .await?
        .trim_start_matches('@')
        .to_string();

    let Some(link) = tweet.find("a:has(time)").await? else {
        tracing::warn!(handle = %handle, "tweet card has no permalink");
        return Ok(None);
    };
    let Some(url) = link.attribute("href").await? else {
        tracing::warn!(handle = %handle, "tweet permalink has no href");
        return Ok(None);
    };

    let mut image = None;
    let mut image_url = None;
    if let Some(image_elm) = tweet.find(r#"div[data-testid="tweetPhoto"] > img"#).await? {
        if let Some(src) = image_elm.attribute("src").await? {
            match download_image(ctx.http, &src).await {
                Ok(decoded) => {
                    image = Some(decoded);
                    image_url = Some(src);
                }
                Err(e) => {
                    tracing::warn!(url = %src, error = %e, "failed to download tweet image");
                }
            }
        }
    }

    Ok(Some(Post {
        platform: Platform::Twitter,
        author,
        text,
        image,
        url,
        image_url,
    }))
}
