//! Discord webhook client and the embed payload it posts.

use std::time::Duration;

use chrono::Utc;
use promowatch_core::Post;
use reqwest::Client;
use serde::Serialize;

use crate::error::NotifyError;

/// Embed accent color, the site's green.
const EMBED_COLOR: u32 = 0x006d_c176;

/// Avatar shown on the embed's author line.
const AVATAR_URL: &str = "https://csgocases.com/images/avatar.jpg";

/// Where the author line links to.
const SITE_URL: &str = "https://csgocases.com";

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    /// Role mention above the embed. Absent entirely when no role is
    /// configured, so Discord does not render an empty line.
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    embeds: [Embed<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    title: String,
    description: String,
    color: u32,
    author: EmbedAuthor<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<EmbedImage<'a>>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct EmbedAuthor<'a> {
    name: &'a str,
    icon_url: &'a str,
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct EmbedImage<'a> {
    url: &'a str,
}

/// Posts promocode announcements to a Discord webhook.
pub struct WebhookClient {
    http: Client,
    webhook_url: String,
    mention_role: Option<String>,
}

impl WebhookClient {
    /// Creates a client for `webhook_url`.
    ///
    /// `mention_role` is a Discord role id; when set, every announcement
    /// opens with a `<@&role>` mention above the embed.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        webhook_url: &str,
        user_agent: &str,
        timeout_secs: u64,
        mention_role: Option<String>,
    ) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            http,
            webhook_url: webhook_url.to_string(),
            mention_role,
        })
    }

    fn build_payload<'a>(&self, post: &'a Post, code: &str) -> WebhookPayload<'a> {
        WebhookPayload {
            content: self.mention_role.as_ref().map(|role| format!("<@&{role}>")),
            embeds: [Embed {
                title: format!("New promocode `{code}`"),
                description: format!("Click [here]({}) to see the post", post.url),
                color: EMBED_COLOR,
                author: EmbedAuthor {
                    name: &post.author,
                    icon_url: AVATAR_URL,
                    url: SITE_URL,
                },
                image: post.image_url.as_deref().map(|url| EmbedImage { url }),
                timestamp: Utc::now().to_rfc3339(),
            }],
        }
    }

    /// Announces `code` with a link back to the post it came from.
    ///
    /// Discord replies 204 on success; anything non-2xx is surfaced so the
    /// caller can decide whether the code still counts as announced.
    ///
    /// # Errors
    ///
    /// - [`NotifyError::UnexpectedStatus`] — non-2xx reply (rate limit,
    ///   deleted webhook).
    /// - [`NotifyError::Http`] — transport failure.
    pub async fn announce(&self, post: &Post, code: &str) -> Result<(), NotifyError> {
        let payload = self.build_payload(post, code);
        let response = self
            .http
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        tracing::info!(code = %code, platform = %post.platform, "announced new promocode");
        Ok(())
    }
}
