//! Instagram adapter.
//!
//! Talks to the private web API the instagram.com frontend uses, with a
//! file-backed cookie session instead of a browser.
//!
//! ## Observed shape of `web_profile_info`
//!
//! `GET /api/v1/users/web_profile_info/?username=<handle>` with a logged-in
//! `sessionid` cookie and the web app id header returns
//! `{"data": {"user": {...}}}`. The newest posts sit under
//! `edge_owner_to_timeline_media.edges[].node`:
//! - `shortcode` — permalink slug; the post lives at
//!   `https://www.instagram.com/p/<shortcode>/`.
//! - `display_url` — direct CDN URL of the image rendition.
//! - `edge_media_to_caption.edges[].node.text` — caption. The edge list is
//!   empty for caption-less posts, and the whole field can be absent.
//! - `owner.username` — the posting account.
//!
//! A logged-out or expired session gets `data.user: null` with HTTP 200,
//! not an error status — that must not be read as "account has no posts".

use promowatch_core::{Platform, Post};
use reqwest::Client;
use serde::Deserialize;

use crate::error::ScrapeError;
use crate::media::download_image;
use crate::platforms::ScrapeContext;
use crate::prompt::{prompt_credentials, Credentials};
use crate::session::InstagramSession;

const DEFAULT_BASE_URL: &str = "https://www.instagram.com";

/// App id the instagram.com web frontend sends on API calls. Requests
/// without it get HTTP 403.
const WEB_APP_ID: &str = "936619743392459";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    authenticated: bool,
}

#[derive(Debug, Deserialize)]
struct WebProfileResponse {
    data: ProfileData,
}

#[derive(Debug, Deserialize)]
struct ProfileData {
    user: Option<ProfileUser>,
}

#[derive(Debug, Deserialize)]
struct ProfileUser {
    edge_owner_to_timeline_media: TimelineMedia,
}

#[derive(Debug, Deserialize)]
struct TimelineMedia {
    edges: Vec<MediaEdge>,
}

#[derive(Debug, Deserialize)]
struct MediaEdge {
    node: MediaNode,
}

#[derive(Debug, Deserialize)]
struct MediaNode {
    shortcode: String,
    display_url: String,
    #[serde(default)]
    edge_media_to_caption: CaptionEdges,
    owner: MediaOwner,
}

#[derive(Debug, Default, Deserialize)]
struct CaptionEdges {
    #[serde(default)]
    edges: Vec<CaptionEdge>,
}

#[derive(Debug, Deserialize)]
struct CaptionEdge {
    node: CaptionNode,
}

#[derive(Debug, Deserialize)]
struct CaptionNode {
    text: String,
}

#[derive(Debug, Deserialize)]
struct MediaOwner {
    username: String,
}

/// Newest timeline entry, flattened out of the edge/node nesting.
#[derive(Debug, Clone)]
pub struct LatestMedia {
    pub shortcode: String,
    pub display_url: String,
    /// Empty string for caption-less posts.
    pub caption: String,
    pub owner_username: String,
}

impl From<MediaNode> for LatestMedia {
    fn from(node: MediaNode) -> Self {
        let caption = node
            .edge_media_to_caption
            .edges
            .into_iter()
            .next()
            .map(|edge| edge.node.text)
            .unwrap_or_default();
        Self {
            shortcode: node.shortcode,
            display_url: node.display_url,
            caption,
            owner_username: node.owner.username,
        }
    }
}

/// HTTP client for the Instagram web API.
pub struct InstagramClient {
    http: Client,
    base_url: String,
}

impl InstagramClient {
    /// Wraps an existing HTTP client. `base_url` is the instagram.com
    /// origin; tests point it at a local mock server.
    #[must_use]
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Logs in with username and password and returns the session cookies.
    ///
    /// Mirrors the web login: fetch the landing page for a `csrftoken`
    /// cookie, then POST the form with the browser-style `enc_password`
    /// envelope. Two-factor and checkpoint challenges are not supported.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::LoginFailed`] — rejected credentials, a challenge,
    ///   or missing cookies in the response.
    /// - [`ScrapeError::Http`] — transport failure.
    pub async fn login(&self, credentials: &Credentials) -> Result<InstagramSession, ScrapeError> {
        let response = self.http.get(format!("{}/", self.base_url)).send().await?;
        let csrf_token =
            cookie_value(&response, "csrftoken").ok_or_else(|| ScrapeError::LoginFailed {
                platform: Platform::Instagram,
                reason: "no csrftoken cookie on landing page".to_string(),
            })?;

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        let enc_password = format!(
            "#PWD_INSTAGRAM_BROWSER:0:{timestamp}:{}",
            credentials.password
        );

        let response = self
            .http
            .post(format!("{}/accounts/login/ajax/", self.base_url))
            .header("X-CSRFToken", &csrf_token)
            .header("X-IG-App-ID", WEB_APP_ID)
            .header("Cookie", format!("csrftoken={csrf_token}"))
            .form(&[
                ("username", credentials.username.as_str()),
                ("enc_password", enc_password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        // Pull cookies off the headers before the body consumes the response.
        let session_id = cookie_value(&response, "sessionid");
        let csrf_token = cookie_value(&response, "csrftoken").unwrap_or(csrf_token);

        if !status.is_success() {
            return Err(ScrapeError::LoginFailed {
                platform: Platform::Instagram,
                reason: format!("login endpoint returned {status}"),
            });
        }

        let body = response.text().await?;
        let outcome: LoginResponse =
            serde_json::from_str(&body).map_err(|e| ScrapeError::Deserialize {
                context: "instagram login response".to_string(),
                source: e,
            })?;
        if !outcome.authenticated {
            return Err(ScrapeError::LoginFailed {
                platform: Platform::Instagram,
                reason: "credentials rejected".to_string(),
            });
        }

        let Some(session_id) = session_id else {
            return Err(ScrapeError::LoginFailed {
                platform: Platform::Instagram,
                reason: "no sessionid cookie after login".to_string(),
            });
        };

        Ok(InstagramSession {
            username: credentials.username.clone(),
            csrf_token,
            session_id,
        })
    }

    /// Fetches the newest timeline entry of `handle`.
    ///
    /// `Ok(None)` when the account exists but has no posts.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::SessionExpired`] — the session cookies no longer
    ///   authenticate (`data.user` came back null).
    /// - [`ScrapeError::UnexpectedStatus`] — any non-2xx response.
    /// - [`ScrapeError::Deserialize`] — the endpoint shape moved.
    pub async fn latest_media(
        &self,
        session: &InstagramSession,
        handle: &str,
    ) -> Result<Option<LatestMedia>, ScrapeError> {
        let url = format!(
            "{}/api/v1/users/web_profile_info/?username={handle}",
            self.base_url
        );
        let response = self
            .http
            .get(&url)
            .header("X-IG-App-ID", WEB_APP_ID)
            .header("X-CSRFToken", &session.csrf_token)
            .header(
                "Cookie",
                format!(
                    "csrftoken={}; sessionid={}",
                    session.csrf_token, session.session_id
                ),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let profile: WebProfileResponse =
            serde_json::from_str(&body).map_err(|e| ScrapeError::Deserialize {
                context: format!("web_profile_info for {handle}"),
                source: e,
            })?;

        let Some(user) = profile.data.user else {
            return Err(ScrapeError::SessionExpired {
                platform: Platform::Instagram,
            });
        };

        Ok(user
            .edge_owner_to_timeline_media
            .edges
            .into_iter()
            .next()
            .map(|edge| LatestMedia::from(edge.node)))
    }
}

/// First value of `name` among a response's `Set-Cookie` headers.
/// Deletion cookies (empty value) do not count.
fn cookie_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            let pair = cookie.split(';').next()?;
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name && !value.is_empty()).then(|| value.to_string())
        })
}

/// Fetches the most recent post from the configured account.
///
/// Instagram always needs a session: under `force_login` the operator is
/// prompted and the fresh session is written to the data directory,
/// otherwise the file from the last login is reused.
///
/// # Errors
///
/// - [`ScrapeError::SessionMissing`] — never logged in and `force_login`
///   not set.
/// - [`ScrapeError::LoginFailed`] — interactive login rejected.
/// - Everything [`InstagramClient::latest_media`] can return.
pub async fn fetch_latest(ctx: &ScrapeContext<'_>) -> Result<Option<Post>, ScrapeError> {
    let client = InstagramClient::new(ctx.http.clone(), DEFAULT_BASE_URL);
    let session_path = InstagramSession::path_in(ctx.data_dir);

    let session = if ctx.force_login {
        let credentials = prompt_credentials("Instagram").await?;
        let session = client.login(&credentials).await?;
        session.save(&session_path).await?;
        tracing::info!(platform = %Platform::Instagram, "logged in, session saved");
        session
    } else {
        InstagramSession::load(&session_path).await?
    };

    fetch_latest_with(&client, &session, ctx).await
}

/// Fetch path behind [`fetch_latest`], decoupled from the fixed base URL
/// and the session file so it can run against a mock server.
///
/// # Errors
///
/// See [`fetch_latest`].
pub async fn fetch_latest_with(
    client: &InstagramClient,
    session: &InstagramSession,
    ctx: &ScrapeContext<'_>,
) -> Result<Option<Post>, ScrapeError> {
    let handle = &ctx.config.instagram_handle;
    let Some(media) = client.latest_media(session, handle).await? else {
        tracing::info!(handle = %handle, "account has no posts");
        return Ok(None);
    };

    let image = match download_image(ctx.http, &media.display_url).await {
        Ok(decoded) => decoded,
        Err(e) => {
            // The image is the post on this platform; without it there is
            // nothing to scan.
            tracing::warn!(url = %media.display_url, error = %e, "failed to download post image");
            return Ok(None);
        }
    };

    Ok(Some(Post {
        platform: Platform::Instagram,
        author: media.owner_username,
        text: media.caption,
        image: Some(image),
        url: format!("https://www.instagram.com/p/{}/", media.shortcode),
        image_url: Some(media.display_url),
    }))
}
