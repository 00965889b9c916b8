#[derive(Clone)]
pub struct AppConfig {
    /// Twitter/X account whose profile is checked for new posts.
    pub twitter_handle: String,
    /// Instagram account whose timeline is checked.
    pub instagram_handle: String,
    /// Facebook page checked without logging in.
    pub facebook_handle: String,
    /// Discord webhook URL new codes are announced to.
    pub webhook_url: String,
    /// Base URL of the chromedriver instance.
    pub webdriver_url: String,
    /// Tesseract executable name or path.
    pub tesseract_bin: String,
    /// Tesseract language pack.
    pub tesseract_lang: String,
    /// Discord role id to mention in announcements, if any.
    pub mention_role: Option<String>,
    pub request_timeout_secs: u64,
    /// How long platform adapters wait for an expected page element.
    pub element_wait_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("twitter_handle", &self.twitter_handle)
            .field("instagram_handle", &self.instagram_handle)
            .field("facebook_handle", &self.facebook_handle)
            .field("webhook_url", &"[redacted]")
            .field("webdriver_url", &self.webdriver_url)
            .field("tesseract_bin", &self.tesseract_bin)
            .field("tesseract_lang", &self.tesseract_lang)
            .field(
                "mention_role",
                &self.mention_role.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("element_wait_secs", &self.element_wait_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
