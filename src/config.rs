// src/config.rs

//! Bot configuration.
//!
//! Tunables (blog name, page size, timeouts) come from an optional TOML
//! file with serde defaults; credentials come from the environment and are
//! checked at startup, before any network call.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Bot tunables, loaded from `bot.toml` when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the Tumblr blog the bot operates on
    #[serde(default = "defaults::blog_name")]
    pub blog_name: String,

    /// Page size for the startup pagination loop
    #[serde(default = "defaults::page_size")]
    pub page_size: u64,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Tumblr API base URL (overridable for tests)
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Slack API base URL (overridable for tests)
    #[serde(default = "defaults::slack_api_base")]
    pub slack_api_base: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        if !path.as_ref().exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.blog_name.trim().is_empty() {
            return Err(AppError::validation("blog_name is empty"));
        }
        if self.page_size == 0 {
            return Err(AppError::validation("page_size must be > 0"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::validation("timeout_secs must be > 0"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(AppError::validation("user_agent is empty"));
        }
        Ok(())
    }

    /// Public permalink for a post on this blog.
    pub fn post_url(&self, id: u64) -> String {
        format!("https://{}.tumblr.com/{}", self.blog_name, id)
    }

    /// Display host for permalink link text.
    pub fn blog_host(&self) -> String {
        format!("{}.tumblr.com", self.blog_name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blog_name: defaults::blog_name(),
            page_size: defaults::page_size(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
            api_base: defaults::api_base(),
            slack_api_base: defaults::slack_api_base(),
        }
    }
}

mod defaults {
    pub fn blog_name() -> String {
        "bnotw".into()
    }
    pub fn page_size() -> u64 {
        50
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; bnotwbot/0.1)".into()
    }
    pub fn api_base() -> String {
        "https://api.tumblr.com".into()
    }
    pub fn slack_api_base() -> String {
        "https://slack.com/api".into()
    }
}

/// Credentials for the Tumblr and Slack APIs, read from the environment.
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub oauth_token: String,
    pub oauth_secret: String,
    pub slack_bot_token: String,
    pub slack_app_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &"[REDACTED]")
            .field("consumer_secret", &"[REDACTED]")
            .field("oauth_token", &"[REDACTED]")
            .field("oauth_secret", &"[REDACTED]")
            .field("slack_bot_token", &"[REDACTED]")
            .field("slack_app_token", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Load all credentials from the environment.
    ///
    /// Required variables:
    /// - `TUMBLR_CONSUMER_KEY`, `TUMBLR_CONSUMER_SECRET`
    /// - `TUMBLR_OAUTH_TOKEN`, `TUMBLR_OAUTH_SECRET`
    /// - `SLACK_BOT_TOKEN`, `SLACK_APP_TOKEN`
    ///
    /// Any missing variable fails here, at startup, not mid-command.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            consumer_key: require("TUMBLR_CONSUMER_KEY")?,
            consumer_secret: require("TUMBLR_CONSUMER_SECRET")?,
            oauth_token: require("TUMBLR_OAUTH_TOKEN")?,
            oauth_secret: require("TUMBLR_OAUTH_SECRET")?,
            slack_bot_token: require("SLACK_BOT_TOKEN")?,
            slack_app_token: require("SLACK_APP_TOKEN")?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| AppError::config(format!("{name} not set")))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_blog_name() {
        let mut config = Config::default();
        config.blog_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_post_url() {
        let config = Config::default();
        assert_eq!(config.post_url(42), "https://bnotw.tumblr.com/42");
    }

    #[test]
    fn load_applies_serde_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "blog_name = \"other\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.blog_name, "other");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.api_base, "https://api.tumblr.com");
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let config = Config::load_or_default("/nonexistent/bot.toml");
        assert_eq!(config.blog_name, "bnotw");
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let creds = Credentials {
            consumer_key: "ck".into(),
            consumer_secret: "cs".into(),
            oauth_token: "ot".into(),
            oauth_secret: "os".into(),
            slack_bot_token: "xoxb-1".into(),
            slack_app_token: "xapp-1".into(),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("xoxb-1"));
    }
}
