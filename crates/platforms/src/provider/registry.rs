use reqwest::Client;
use rustc_hash::FxHashMap;

use super::cache::StatusCache;
use super::error::ProviderError;
use super::platforms::{twitch::Twitch, youtube::YouTube};
use super::provider::{PlatformProvider, Streamer};

/// Credentials and endpoint override for one service.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub client_id: Option<String>,
    pub oauth_token: Option<String>,
    pub api_key: Option<String>,
    /// Replaces the built-in API entry point (test servers, proxies).
    pub api_base: Option<String>,
}

/// Everything an adapter needs at construction time.
#[derive(Clone)]
pub struct ProviderContext {
    pub client: Client,
    pub cache: StatusCache,
    settings: FxHashMap<String, ProviderSettings>,
}

impl ProviderContext {
    pub fn new(client: Client, cache: StatusCache) -> Self {
        Self {
            client,
            cache,
            settings: FxHashMap::default(),
        }
    }

    pub fn with_settings(mut self, service: impl Into<String>, settings: ProviderSettings) -> Self {
        self.settings.insert(service.into(), settings);
        self
    }

    pub fn settings(&self, service: &str) -> Option<&ProviderSettings> {
        self.settings.get(service)
    }

    /// Configured API entry point for `service`, or `default`.
    pub fn api_base<'a>(&'a self, service: &str, default: &'a str) -> &'a str {
        self.settings(service)
            .and_then(|s| s.api_base.as_deref())
            .unwrap_or(default)
    }
}

type ProviderConstructor = fn(&ProviderContext) -> Box<dyn PlatformProvider>;

struct ProviderEntry {
    service: &'static str,
    constructor: ProviderConstructor,
}

macro_rules! provider_registry {
    ( $( $service:expr => $builder:path ),+ $(,)? ) => {
        &[
            $(
                ProviderEntry {
                    service: $service,
                    constructor: |context| {
                        Box::new($builder(context)) as Box<dyn PlatformProvider>
                    },
                },
            )+
        ]
    };
}

// Static provider registry.
static PROVIDERS: &[ProviderEntry] = provider_registry![
    Twitch::SERVICE => Twitch::new,
    YouTube::SERVICE => YouTube::new,
];

/// Maps a service name to its adapter.
///
/// Adding a platform means adding one line to the static table above.
pub struct ProviderRegistry {
    context: ProviderContext,
}

impl ProviderRegistry {
    pub fn new(context: ProviderContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ProviderContext {
        &self.context
    }

    /// Names of every service with an adapter.
    pub fn services() -> impl Iterator<Item = &'static str> {
        PROVIDERS.iter().map(|entry| entry.service)
    }

    pub fn is_registered(service: &str) -> bool {
        PROVIDERS.iter().any(|entry| entry.service == service)
    }

    /// Build a fresh [`Streamer`] handle for `service`.
    pub fn resolve(&self, service: &str) -> Result<Streamer, ProviderError> {
        PROVIDERS
            .iter()
            .find(|entry| entry.service == service)
            .map(|entry| {
                Streamer::new(
                    (entry.constructor)(&self.context),
                    self.context.cache.clone(),
                )
            })
            .ok_or_else(|| ProviderError::ProviderUnavailable(service.to_owned()))
    }
}
