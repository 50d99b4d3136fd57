//! Live status adapters for streaming platforms.
//!
//! A [`ProviderRegistry`] maps a service name (`"twitch"`, `"youtube"`) to a
//! platform adapter. Each adapter is driven through a [`Streamer`] handle,
//! which validates the user identifier, consults the shared [`StatusCache`]
//! and only then falls back to a live fetch.

pub mod media;
pub mod provider;

pub use media::StreamerStatus;
pub use provider::cache::{DEFAULT_TTL, StatusCache};
pub use provider::default::{DEFAULT_TIMEOUT, default_client};
pub use provider::error::ProviderError;
pub use provider::provider::{PlatformProvider, Streamer};
pub use provider::registry::{ProviderContext, ProviderRegistry, ProviderSettings};
