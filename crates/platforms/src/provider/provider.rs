use async_trait::async_trait;
use tracing::{debug, warn};

use super::cache::StatusCache;
use super::error::ProviderError;
use crate::media::StreamerStatus;

/// A platform adapter: knows the identifier syntax and the fetch sequence of
/// one streaming service.
#[async_trait]
pub trait PlatformProvider: Send + Sync {
    /// Service name used as registry key and cache namespace.
    fn service(&self) -> &'static str;

    /// Surface syntax check, done before touching the cache or the network.
    fn is_valid_user(&self, user: &str) -> bool;

    /// Live fetch of the channel status.
    ///
    /// A missing or malformed channel response is an error; missing live data
    /// is not, it yields an offline status.
    async fn fetch_status(&self, user: &str) -> Result<StreamerStatus, ProviderError>;
}

/// Per-render handle around a provider adapter.
///
/// [`Streamer::set_user`] resolves the user through the cache or a live fetch;
/// [`Streamer::status`] exposes the result afterwards.
pub struct Streamer {
    provider: Box<dyn PlatformProvider>,
    cache: StatusCache,
    user: Option<String>,
    status: Option<StreamerStatus>,
}

impl Streamer {
    pub fn new(provider: Box<dyn PlatformProvider>, cache: StatusCache) -> Self {
        Self {
            provider,
            cache,
            user: None,
            status: None,
        }
    }

    pub fn service(&self) -> &'static str {
        self.provider.service()
    }

    /// Resolve `user` to live status data.
    ///
    /// Returns false for identifiers the platform would reject, for accounts
    /// that cannot be resolved and for transport or decoding failures.
    pub async fn set_user(&mut self, user: &str) -> bool {
        self.user = None;
        self.status = None;

        let service = self.provider.service();
        if !self.provider.is_valid_user(user) {
            debug!(service, user, "rejected user identifier");
            return false;
        }

        if let Some((status, age)) = self.cache.get(service, user) {
            debug!(service, user, ?age, "status cache hit");
            self.user = Some(user.to_owned());
            self.status = Some(status);
            return true;
        }

        debug!(service, user, "status cache miss, fetching");
        match self.provider.fetch_status(user).await {
            Ok(status) => {
                self.cache.put(service, user, status.clone());
                self.user = Some(user.to_owned());
                self.status = Some(status);
                true
            }
            Err(e) => {
                warn!(service, user, error = %e, "failed to fetch streamer status");
                false
            }
        }
    }

    /// The user accepted by the last successful [`Streamer::set_user`].
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Status resolved by the last successful [`Streamer::set_user`].
    pub fn status(&self) -> Option<&StreamerStatus> {
        self.status.as_ref()
    }
}
