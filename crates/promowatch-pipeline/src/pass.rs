//! One scrape-and-announce pass.

use std::path::Path;
use std::time::Duration;

use promowatch_core::{AppConfig, Post};
use promowatch_notify::WebhookClient;
use promowatch_ocr::OcrEngine;
use promowatch_scraper::webdriver::{headless_chrome_args, WebDriverClient, WebDriverSession};
use promowatch_scraper::{collect_latest_posts, ScrapeContext, ScrapeError};

use crate::error::PassError;
use crate::filter::filter_candidates;
use crate::ledger::Ledger;

/// Ledger file name inside the data directory.
const LEDGER_FILE: &str = "promocodes.txt";

/// Chrome profile directory inside the data directory. A persistent
/// profile keeps the Twitter login alive between passes.
const CHROME_PROFILE_DIR: &str = "chrome-profile";

/// Outcome counts for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// Posts fetched across all platforms.
    pub posts_found: usize,
    /// Posts that survived filtering with a readable code.
    pub candidates: usize,
    /// Codes announced for the first time.
    pub announced: usize,
}

/// Inputs that vary between passes.
#[derive(Debug, Clone, Copy)]
pub struct PassOptions<'a> {
    /// Directory holding the ledger, the Instagram session file, and the
    /// Chrome profile.
    pub data_dir: &'a Path,
    /// Log in fresh (prompting for credentials) instead of reusing stored
    /// sessions.
    pub force_login: bool,
}

/// Runs one full pass over every platform.
///
/// 1. Build the HTTP client shared by the API adapter and image downloads.
/// 2. Start a browser session for the WebDriver-driven platforms. An
///    unreachable chromedriver skips those platforms rather than failing
///    the pass.
/// 3. Fetch the latest post of each platform ([`collect_latest_posts`]).
/// 4. Close the browser; scraping is done.
/// 5. Filter posts into candidates and announce the codes not yet in the
///    ledger ([`announce_new_codes`]).
///
/// # Errors
///
/// Returns [`PassError`] only for broken local machinery (HTTP client
/// construction, OCR backend, ledger I/O). Scrape and webhook failures
/// are logged and absorbed.
pub async fn run_pass<E: OcrEngine + ?Sized>(
    config: &AppConfig,
    engine: &E,
    webhook: &WebhookClient,
    options: PassOptions<'_>,
) -> Result<PassSummary, PassError> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(&config.user_agent)
        .build()?;

    let session = match start_browser(config, options.data_dir).await {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(
                url = %config.webdriver_url,
                error = %e,
                "webdriver unavailable, skipping browser platforms"
            );
            None
        }
    };

    let ctx = ScrapeContext {
        http: &http,
        config,
        data_dir: options.data_dir,
        force_login: options.force_login,
    };
    let posts = collect_latest_posts(session.as_ref(), &ctx).await;

    // The browser is only needed for scraping; release it before OCR and
    // webhook work, which can take a while.
    if let Some(session) = session {
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "failed to close webdriver session");
        }
    }

    let ledger_path = options.data_dir.join(LEDGER_FILE);
    announce_new_codes(posts, engine, webhook, &ledger_path).await
}

async fn start_browser(
    config: &AppConfig,
    data_dir: &Path,
) -> Result<WebDriverSession, ScrapeError> {
    let client = WebDriverClient::new(&config.webdriver_url, config.request_timeout_secs)?;
    let args = headless_chrome_args(&data_dir.join(CHROME_PROFILE_DIR));
    client.start_session(&args).await
}

/// Filters `posts` and announces every code the ledger has not seen.
///
/// Candidates are processed in input order. Each new code is recorded in
/// the ledger before the webhook call; a delivery failure is logged and
/// the code stays recorded, so it will not be re-announced next pass.
///
/// # Errors
///
/// Returns [`PassError::Ocr`] for extraction failures and
/// [`PassError::Ledger`] when the ledger cannot be read or appended.
pub async fn announce_new_codes<E: OcrEngine + ?Sized>(
    posts: Vec<Option<Post>>,
    engine: &E,
    webhook: &WebhookClient,
    ledger_path: &Path,
) -> Result<PassSummary, PassError> {
    let posts_found = posts.iter().filter(|post| post.is_some()).count();

    let candidates = filter_candidates(posts, engine).await?;
    let mut ledger = Ledger::load(ledger_path).await?;

    let candidate_count = candidates.len();
    let mut announced = 0;
    for candidate in &candidates {
        if ledger.contains(&candidate.code) {
            tracing::debug!(code = %candidate.code, "code already announced, skipping");
            continue;
        }

        ledger.record(&candidate.code).await?;
        if let Err(e) = webhook.announce(&candidate.post, &candidate.code).await {
            tracing::warn!(
                code = %candidate.code,
                error = %e,
                "webhook delivery failed, code stays recorded"
            );
            continue;
        }
        announced += 1;
    }

    if posts_found > 0 {
        tracing::info!(
            posts_found,
            candidates = candidate_count,
            announced,
            "pass complete"
        );
    }

    Ok(PassSummary {
        posts_found,
        candidates: candidate_count,
        announced,
    })
}
