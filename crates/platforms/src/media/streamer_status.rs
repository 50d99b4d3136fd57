use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
/// Normalized live status of a channel on a streaming platform.
///
/// Every provider fills in what it can; fields a platform does not expose are
/// left as `None` (or `0` / `false` for the counters and the online flag).
///
/// # Fields
///
/// * `online` - Whether the channel is currently broadcasting
/// * `name` - Display name of the channel as reported by the platform
/// * `viewers` - Concurrent viewers of the current broadcast, `0` when offline
/// * `doing` - Current activity, usually the game or category being streamed
/// * `status` - Free-form status text, usually the broadcast title
/// * `lifetime_views` - Total channel views
/// * `followers` - Follower or subscriber count
/// * `logo` - URL of the channel avatar
/// * `thumbnail` - URL of the live preview image, only set while online
/// * `channel_url` - Public URL of the channel page
///
/// # Examples
///
/// ```rust
/// use streamer_platforms::StreamerStatus;
///
/// let status = StreamerStatus::builder("SomeChannel")
///     .online(true)
///     .viewers(42)
///     .channel_url("https://www.twitch.tv/somechannel")
///     .build();
///
/// assert!(status.online);
/// assert_eq!(status.viewers, 42);
/// ```
pub struct StreamerStatus {
    pub online: bool,
    pub name: Option<String>,
    pub viewers: u64,
    pub doing: Option<String>,
    pub status: Option<String>,
    pub lifetime_views: u64,
    pub followers: u64,
    pub logo: Option<String>,
    pub thumbnail: Option<String>,
    pub channel_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StreamerStatusBuilder {
    inner: StreamerStatus,
}

impl StreamerStatus {
    pub fn builder(name: impl Into<String>) -> StreamerStatusBuilder {
        StreamerStatusBuilder::new(name)
    }
}

impl StreamerStatusBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: StreamerStatus {
                name: Some(name.into()),
                ..StreamerStatus::default()
            },
        }
    }

    pub fn online(mut self, online: bool) -> Self {
        self.inner.online = online;
        self
    }

    pub fn viewers(mut self, viewers: u64) -> Self {
        self.inner.viewers = viewers;
        self
    }

    pub fn doing(mut self, doing: impl Into<String>) -> Self {
        self.inner.doing = Some(doing.into());
        self
    }

    pub fn doing_opt(mut self, doing: Option<String>) -> Self {
        self.inner.doing = doing;
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.inner.status = Some(status.into());
        self
    }

    pub fn status_opt(mut self, status: Option<String>) -> Self {
        self.inner.status = status;
        self
    }

    pub fn lifetime_views(mut self, lifetime_views: u64) -> Self {
        self.inner.lifetime_views = lifetime_views;
        self
    }

    pub fn followers(mut self, followers: u64) -> Self {
        self.inner.followers = followers;
        self
    }

    pub fn logo(mut self, logo: impl Into<String>) -> Self {
        self.inner.logo = Some(logo.into());
        self
    }

    pub fn logo_opt(mut self, logo: Option<String>) -> Self {
        self.inner.logo = logo;
        self
    }

    pub fn thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.inner.thumbnail = Some(thumbnail.into());
        self
    }

    pub fn thumbnail_opt(mut self, thumbnail: Option<String>) -> Self {
        self.inner.thumbnail = thumbnail;
        self
    }

    pub fn channel_url(mut self, channel_url: impl Into<String>) -> Self {
        self.inner.channel_url = Some(channel_url.into());
        self
    }

    pub fn channel_url_opt(mut self, channel_url: Option<String>) -> Self {
        self.inner.channel_url = channel_url;
        self
    }

    pub fn build(self) -> StreamerStatus {
        self.inner
    }
}
