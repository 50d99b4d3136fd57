//! Deployment configuration.
//!
//! Read from an optional TOML file, then overridden from the environment
//! (a `.env` file is honoured through `dotenvy`).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use streamer_platforms::{
    DEFAULT_TIMEOUT, DEFAULT_TTL, ProviderContext, ProviderRegistry, ProviderSettings, StatusCache,
    default_client,
};
use tracing::debug;

use crate::logging::DEFAULT_LOG_FILTER;
use crate::{Error, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:streamer.db?mode=rwc";
pub const DEFAULT_PAGE_URL_PATTERN: &str = "/wiki/$1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    pub database_url: String,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    /// Link pattern for claim pages; `$1` is replaced by the page title.
    pub page_url_pattern: String,
    pub log_filter: String,
    pub providers: ProvidersConfig,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            page_url_pattern: DEFAULT_PAGE_URL_PATTERN.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            providers: ProvidersConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub twitch: TwitchConfig,
    pub youtube: YouTubeConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitchConfig {
    pub client_id: Option<String>,
    pub oauth_token: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
}

impl EmbedConfig {
    /// Load the configuration file (if any) and apply environment overrides.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)?;
                Self::from_toml(&raw)?
            }
            Some(path) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        dotenvy::dotenv().ok();
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::config(format!("invalid TOML: {e}")))
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(client_id) = lookup("TWITCH_CLIENT_ID") {
            self.providers.twitch.client_id = Some(client_id);
        }
        if let Some(token) = lookup("TWITCH_OAUTH_TOKEN") {
            self.providers.twitch.oauth_token = Some(token);
        }
        if let Some(key) = lookup("YOUTUBE_API_KEY") {
            self.providers.youtube.api_key = Some(key);
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Adapter context: a shared HTTP client, a fresh cache and per-service settings.
    pub fn provider_context(&self) -> Result<ProviderContext> {
        let client = default_client(self.request_timeout())?;
        let twitch = &self.providers.twitch;
        let youtube = &self.providers.youtube;

        Ok(
            ProviderContext::new(client, StatusCache::with_ttl(self.cache_ttl()))
                .with_settings(
                    "twitch",
                    ProviderSettings {
                        client_id: twitch.client_id.clone(),
                        oauth_token: twitch.oauth_token.clone(),
                        api_base: twitch.api_base.clone(),
                        ..Default::default()
                    },
                )
                .with_settings(
                    "youtube",
                    ProviderSettings {
                        api_key: youtube.api_key.clone(),
                        api_base: youtube.api_base.clone(),
                        ..Default::default()
                    },
                ),
        )
    }

    pub fn registry(&self) -> Result<ProviderRegistry> {
        Ok(ProviderRegistry::new(self.provider_context()?))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = EmbedConfig::default();
        assert_eq!(config.database_url, "sqlite:streamer.db?mode=rwc");
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.page_url_pattern, "/wiki/$1");
        assert!(config.providers.twitch.client_id.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config = EmbedConfig::from_toml(
            r#"
            cache_ttl_secs = 60

            [providers.twitch]
            client_id = "abc"
            api_base = "http://127.0.0.1:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.providers.twitch.client_id.as_deref(), Some("abc"));
        assert!(config.providers.youtube.api_key.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let err = EmbedConfig::from_toml("cache_ttl_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "sqlite::memory:"),
            ("TWITCH_CLIENT_ID", "from-env"),
            ("YOUTUBE_API_KEY", "  "),
        ]);
        let mut config = EmbedConfig::from_toml("[providers.youtube]\napi_key = \"file-key\"").unwrap();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.providers.twitch.client_id.as_deref(), Some("from-env"));
        // Blank values do not clobber the file.
        assert_eq!(config.providers.youtube.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_url_pattern = \"https://wiki.example/$1\"").unwrap();

        let config = EmbedConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.page_url_pattern, "https://wiki.example/$1");

        let missing = EmbedConfig::load(Some(Path::new("/nonexistent/streamer.toml"))).unwrap();
        assert_eq!(missing.page_url_pattern, DEFAULT_PAGE_URL_PATTERN);
    }

    #[test]
    fn test_registry_from_config() {
        let registry = EmbedConfig::default().registry().unwrap();
        assert_eq!(registry.context().cache.ttl(), Duration::from_secs(300));
        assert!(registry.resolve("twitch").is_ok());
    }
}
