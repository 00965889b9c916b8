//! Minimal W3C WebDriver client, just wide enough for the two browser
//! adapters.
//!
//! Speaks the chromedriver wire protocol over HTTP: session create/delete,
//! navigation, CSS-selector element lookup (with polling), element text,
//! attributes, and key input. Responses arrive as `{"value": ...}`
//! envelopes; command failures as `{"value": {"error", "message"}}` with a
//! non-2xx status.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::error::ScrapeError;

/// How often [`WebDriverSession::find`] re-polls for an element that has
/// not appeared yet.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// W3C key code for Return. Appended to input text to submit a field.
pub const KEY_RETURN: char = '\u{e006}';

/// Error code chromedriver uses when a selector matches nothing. Drives the
/// polling loop instead of surfacing as a failure.
const NO_SUCH_ELEMENT: &str = "no such element";

#[derive(Debug, Deserialize)]
struct WireValue<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct NewSessionValue {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// W3C element identifier: elements come back as a single-key object under
/// this fixed magic key.
#[derive(Debug, Deserialize)]
struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    id: String,
}

/// Chrome arguments for an unattended scrape: headless, fixed viewport,
/// and a persistent profile so Twitter logins survive across passes.
#[must_use]
pub fn headless_chrome_args(profile_dir: &Path) -> Vec<String> {
    vec![
        "--headless".to_string(),
        format!("--user-data-dir={}", profile_dir.display()),
        "--window-size=1920,1080".to_string(),
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-extensions".to_string(),
    ]
}

/// Sends one WebDriver command and unwraps the `{"value": ...}` envelope.
///
/// Non-2xx responses are decoded into [`ScrapeError::WebDriver`] from the
/// protocol's error envelope; bodies that fail to decode keep the raw text
/// as the message.
async fn execute<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    context: &str,
) -> Result<T, ScrapeError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let wire_error = serde_json::from_str::<WireValue<WireError>>(&body).map_or_else(
            |_| WireError {
                error: format!("http {status}"),
                message: body.clone(),
            },
            |w| w.value,
        );
        return Err(ScrapeError::WebDriver {
            error: wire_error.error,
            message: wire_error.message,
        });
    }

    serde_json::from_str::<WireValue<T>>(&body)
        .map(|w| w.value)
        .map_err(|e| ScrapeError::Deserialize {
            context: context.to_string(),
            source: e,
        })
}

/// Connection to a chromedriver server, used to open sessions.
pub struct WebDriverClient {
    http: Client,
    server_url: String,
    poll_interval: Duration,
}

impl WebDriverClient {
    /// Creates a client for the chromedriver at `server_url`.
    ///
    /// `timeout_secs` bounds every individual WebDriver command. It must
    /// comfortably exceed the element poll interval but stay well under the
    /// per-element wait, which is enforced by [`WebDriverSession::find`].
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(server_url: &str, timeout_secs: u64) -> Result<Self, ScrapeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Overrides the element poll interval. Tests use this to avoid
    /// real-time sleeps.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Opens a Chrome session with the given command-line arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::WebDriver`] when chromedriver rejects the
    /// session (browser missing, profile locked) and [`ScrapeError::Http`]
    /// when it cannot be reached at all.
    pub async fn start_session(
        &self,
        chrome_args: &[String],
    ) -> Result<WebDriverSession, ScrapeError> {
        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": chrome_args }
                }
            }
        });
        let url = format!("{}/session", self.server_url);
        let value: NewSessionValue = execute(self.http.post(url).json(&body), "new session").await?;

        tracing::debug!(session_id = %value.session_id, "webdriver session started");

        Ok(WebDriverSession {
            http: self.http.clone(),
            base_url: format!("{}/session/{}", self.server_url, value.session_id),
            session_id: value.session_id,
            poll_interval: self.poll_interval,
        })
    }
}

/// One live browser session. Owned by the pass that created it; callers
/// must [`close`](Self::close) it on every path so the browser is released.
#[derive(Debug)]
pub struct WebDriverSession {
    http: Client,
    base_url: String,
    session_id: String,
    poll_interval: Duration,
}

impl WebDriverSession {
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Navigates the browser to `url` and waits for the document to load.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::WebDriver`] when navigation fails.
    pub async fn navigate(&self, url: &str) -> Result<(), ScrapeError> {
        let _: serde_json::Value = execute(
            self.http
                .post(format!("{}/url", self.base_url))
                .json(&json!({ "url": url })),
            "navigate",
        )
        .await?;
        Ok(())
    }

    /// Returns the URL the browser currently shows.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::WebDriver`] when the command fails.
    pub async fn current_url(&self) -> Result<String, ScrapeError> {
        execute(self.http.get(format!("{}/url", self.base_url)), "current url").await
    }

    /// Finds the first element matching a CSS selector, polling until it
    /// appears or `wait` runs out.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::ElementNotFound`] when the element never
    /// showed up in time; other variants for protocol failures.
    pub async fn find(&self, selector: &str, wait: Duration) -> Result<Element<'_>, ScrapeError> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            if let Some(element) = self.find_now(selector).await? {
                return Ok(element);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScrapeError::ElementNotFound {
                    selector: selector.to_string(),
                    waited_secs: wait.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Polls until the browser shows exactly `url`, or `wait` runs out.
    ///
    /// Returns whether the URL was reached; callers decide what a timeout
    /// means (for the login flow it means the login did not go through).
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::WebDriver`] when the session breaks mid-poll.
    pub async fn wait_for_url(&self, url: &str, wait: Duration) -> Result<bool, ScrapeError> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            if self.current_url().await? == url {
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Single-shot element lookup. `Ok(None)` when no element matches yet.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::WebDriver`] for any protocol failure other
    /// than "no such element".
    pub async fn find_now(&self, selector: &str) -> Result<Option<Element<'_>>, ScrapeError> {
        let body = json!({ "using": "css selector", "value": selector });
        let result: Result<ElementRef, ScrapeError> = execute(
            self.http
                .post(format!("{}/element", self.base_url))
                .json(&body),
            "find element",
        )
        .await;

        match result {
            Ok(element_ref) => Ok(Some(Element {
                session: self,
                id: element_ref.id,
            })),
            Err(ScrapeError::WebDriver { ref error, .. }) if error == NO_SUCH_ELEMENT => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Ends the session. chromedriver closes the browser with it.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::WebDriver`] when the session was already
    /// gone; callers typically log and move on.
    pub async fn close(self) -> Result<(), ScrapeError> {
        let _: serde_json::Value =
            execute(self.http.delete(&self.base_url), "delete session").await?;
        Ok(())
    }
}

/// Handle to a located element, valid for the lifetime of its session.
#[derive(Debug)]
pub struct Element<'a> {
    session: &'a WebDriverSession,
    id: String,
}

impl<'a> Element<'a> {
    fn endpoint(&self, suffix: &str) -> String {
        format!("{}/element/{}/{suffix}", self.session.base_url, self.id)
    }

    /// Visible text of the element and its descendants.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::WebDriver`] when the element has gone stale.
    pub async fn text(&self) -> Result<String, ScrapeError> {
        execute(self.session.http.get(self.endpoint("text")), "element text").await
    }

    /// Value of an attribute, or `None` when the attribute is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::WebDriver`] when the element has gone stale.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>, ScrapeError> {
        execute(
            self.session
                .http
                .get(self.endpoint(&format!("attribute/{name}"))),
            "element attribute",
        )
        .await
    }

    /// Finds a descendant by CSS selector. Single attempt, no polling:
    /// by the time the parent exists, its children are rendered with it.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::WebDriver`] for protocol failures other than
    /// "no such element".
    pub async fn find(&self, selector: &str) -> Result<Option<Element<'a>>, ScrapeError> {
        let body = json!({ "using": "css selector", "value": selector });
        let result: Result<ElementRef, ScrapeError> = execute(
            self.session.http.post(self.endpoint("element")).json(&body),
            "find child element",
        )
        .await;

        match result {
            Ok(element_ref) => Ok(Some(Element {
                session: self.session,
                id: element_ref.id,
            })),
            Err(ScrapeError::WebDriver { ref error, .. }) if error == NO_SUCH_ELEMENT => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Types `text` into the element. Append [`KEY_RETURN`] to submit.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::WebDriver`] when the element does not accept
    /// input.
    pub async fn send_keys(&self, text: &str) -> Result<(), ScrapeError> {
        let _: serde_json::Value = execute(
            self.session
                .http
                .post(self.endpoint("value"))
                .json(&json!({ "text": text })),
            "send keys",
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "webdriver_test.rs"]
mod tests;
