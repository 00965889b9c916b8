use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let twitter_handle = require("TWITTER_USERNAME")?;
    let instagram_handle = require("INSTAGRAM_USERNAME")?;
    let facebook_handle = require("FACEBOOK_USERNAME")?;
    let webhook_url = require("DISCORD_WEBHOOK_URL")?;

    let webdriver_url = or_default("PROMOWATCH_WEBDRIVER_URL", "http://localhost:9515");
    let tesseract_bin = or_default("PROMOWATCH_TESSERACT_BIN", "tesseract");
    let tesseract_lang = or_default("PROMOWATCH_TESSERACT_LANG", "eng");
    let mention_role = lookup("PROMOWATCH_MENTION_ROLE").ok();

    let request_timeout_secs = parse_u64("PROMOWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let element_wait_secs = parse_u64("PROMOWATCH_ELEMENT_WAIT_SECS", "10")?;
    let user_agent = or_default("PROMOWATCH_USER_AGENT", "promowatch/0.1 (promocode-watcher)");

    Ok(AppConfig {
        twitter_handle,
        instagram_handle,
        facebook_handle,
        webhook_url,
        webdriver_url,
        tesseract_bin,
        tesseract_lang,
        mention_role,
        request_timeout_secs,
        element_wait_secs,
        user_agent,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("TWITTER_USERNAME", "csgocases");
        m.insert("INSTAGRAM_USERNAME", "csgocases");
        m.insert("FACEBOOK_USERNAME", "csgocases");
        m.insert(
            "DISCORD_WEBHOOK_URL",
            "https://discord.com/api/webhooks/1/secret-token",
        );
        m
    }

    #[test]
    fn build_app_config_fails_without_twitter_username() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TWITTER_USERNAME"),
            "expected MissingEnvVar(TWITTER_USERNAME), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_without_webhook_url() {
        let mut map = full_env();
        map.remove("DISCORD_WEBHOOK_URL");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DISCORD_WEBHOOK_URL"),
            "expected MissingEnvVar(DISCORD_WEBHOOK_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_all_required_vars() {
        let map = full_env();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.twitter_handle, "csgocases");
        assert_eq!(cfg.webdriver_url, "http://localhost:9515");
        assert_eq!(cfg.tesseract_bin, "tesseract");
        assert_eq!(cfg.tesseract_lang, "eng");
        assert!(cfg.mention_role.is_none());
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.element_wait_secs, 10);
        assert_eq!(cfg.user_agent, "promowatch/0.1 (promocode-watcher)");
    }

    #[test]
    fn build_app_config_webdriver_url_override() {
        let mut map = full_env();
        map.insert("PROMOWATCH_WEBDRIVER_URL", "http://chromedriver:4444");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.webdriver_url, "http://chromedriver:4444");
    }

    #[test]
    fn build_app_config_mention_role_override() {
        let mut map = full_env();
        map.insert("PROMOWATCH_MENTION_ROLE", "1308897892240723979");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.mention_role.as_deref(), Some("1308897892240723979"));
    }

    #[test]
    fn build_app_config_element_wait_secs_override() {
        let mut map = full_env();
        map.insert("PROMOWATCH_ELEMENT_WAIT_SECS", "3");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.element_wait_secs, 3);
    }

    #[test]
    fn build_app_config_request_timeout_secs_invalid() {
        let mut map = full_env();
        map.insert("PROMOWATCH_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PROMOWATCH_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(PROMOWATCH_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn app_config_debug_redacts_webhook_url() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("secret-token"), "got: {rendered}");
        assert!(rendered.contains("[redacted]"), "got: {rendered}");
    }
}
