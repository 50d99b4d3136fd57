use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use super::models::{ChannelItem, ListResponse, SearchItem, VideoItem};
use crate::media::StreamerStatus;
use crate::provider::api_client::ApiClient;
use crate::provider::error::ProviderError;
use crate::provider::provider::PlatformProvider;
use crate::provider::registry::ProviderContext;
use crate::provider::utils::parse_count;

pub static USER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Channel ids are `UC` followed by 22 url-safe base64 characters.
static CHANNEL_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UC[A-Za-z0-9_-]{22}$").unwrap());

struct LiveBroadcast {
    title: Option<String>,
    thumbnail: Option<String>,
    viewers: u64,
}

pub struct YouTube {
    api: ApiClient,
    has_api_key: bool,
}

impl YouTube {
    pub const SERVICE: &'static str = "youtube";
    const API_BASE: &'static str = "https://www.googleapis.com/youtube/v3";
    const BASE_URL: &'static str = "https://www.youtube.com";

    pub fn new(context: &ProviderContext) -> Self {
        let mut api = ApiClient::new(
            Self::SERVICE,
            context.api_base(Self::SERVICE, Self::API_BASE),
            context.client.clone(),
        );

        let api_key = context
            .settings(Self::SERVICE)
            .and_then(|s| s.api_key.as_deref());
        if let Some(key) = api_key {
            api.add_param("key", key);
        }

        Self {
            api,
            has_api_key: api_key.is_some(),
        }
    }

    fn is_channel_id(user: &str) -> bool {
        CHANNEL_ID_REGEX.is_match(user)
    }

    async fn get_channel(&self, user: &str) -> Result<ChannelItem, ProviderError> {
        let lookup = if Self::is_channel_id(user) {
            ("id", user)
        } else {
            ("forUsername", user)
        };

        let channels: ListResponse<ChannelItem> = self
            .api
            .get_json("channels", &[("part", "snippet,statistics"), lookup])
            .await?;

        channels
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::StreamerNotFound(user.to_owned()))
    }

    /// Current live broadcast of a channel, if any. Lookup failures read as offline.
    async fn get_live_broadcast(&self, channel_id: &str) -> Option<LiveBroadcast> {
        let search = self
            .api
            .get_json::<ListResponse<SearchItem>>(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("eventType", "live"),
                    ("type", "video"),
                ],
            )
            .await;

        let item = match search {
            Ok(search) => search.items.into_iter().find(|i| i.id.video_id.is_some())?,
            Err(e) => {
                debug!(channel_id, error = %e, "live search failed, treating as offline");
                return None;
            }
        };

        let video_id = item.id.video_id.unwrap_or_default();
        let (title, thumbnail) = item
            .snippet
            .map(|s| (s.title, s.thumbnails.and_then(|t| t.largest())))
            .unwrap_or_default();

        Some(LiveBroadcast {
            title,
            thumbnail,
            viewers: self.get_concurrent_viewers(&video_id).await,
        })
    }

    async fn get_concurrent_viewers(&self, video_id: &str) -> u64 {
        match self
            .api
            .get_json::<ListResponse<VideoItem>>(
                "videos",
                &[("part", "liveStreamingDetails"), ("id", video_id)],
            )
            .await
        {
            Ok(videos) => videos
                .items
                .into_iter()
                .next()
                .and_then(|v| v.live_streaming_details)
                .map(|d| parse_count(d.concurrent_viewers.as_deref()))
                .unwrap_or(0),
            Err(e) => {
                debug!(video_id, error = %e, "viewer count unavailable");
                0
            }
        }
    }
}

#[async_trait]
impl PlatformProvider for YouTube {
    fn service(&self) -> &'static str {
        Self::SERVICE
    }

    fn is_valid_user(&self, user: &str) -> bool {
        USER_REGEX.is_match(user)
    }

    async fn fetch_status(&self, user: &str) -> Result<StreamerStatus, ProviderError> {
        if !self.has_api_key {
            return Err(ProviderError::MissingCredentials("youtube api_key"));
        }

        let channel = self.get_channel(user).await?;
        let Some(snippet) = channel.snippet else {
            return Err(ProviderError::UnexpectedResponse(format!(
                "channel {} has no snippet",
                channel.id
            )));
        };

        let channel_url = match snippet.custom_url.as_deref() {
            Some(handle) if handle.starts_with('@') => format!("{}/{handle}", Self::BASE_URL),
            _ => format!("{}/channel/{}", Self::BASE_URL, channel.id),
        };
        let (lifetime_views, followers) = channel
            .statistics
            .map(|s| {
                (
                    parse_count(s.view_count.as_deref()),
                    parse_count(s.subscriber_count.as_deref()),
                )
            })
            .unwrap_or_default();

        let builder = StreamerStatus::builder(snippet.title.unwrap_or_else(|| user.to_owned()))
            .logo_opt(snippet.thumbnails.and_then(|t| t.smallest()))
            .lifetime_views(lifetime_views)
            .followers(followers)
            .channel_url(channel_url);

        let status = match self.get_live_broadcast(&channel.id).await {
            Some(live) => builder
                .online(true)
                .viewers(live.viewers)
                .status_opt(live.title)
                .thumbnail_opt(live.thumbnail)
                .build(),
            None => builder.online(false).build(),
        };

        Ok(status)
    }
}
