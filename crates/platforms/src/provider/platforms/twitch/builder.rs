use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use super::models::{ChannelResponse, StreamsResponse, UsersResponse};
use crate::media::StreamerStatus;
use crate::provider::api_client::ApiClient;
use crate::provider::error::ProviderError;
use crate::provider::provider::PlatformProvider;
use crate::provider::registry::ProviderContext;

pub static USER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

pub struct Twitch {
    api: ApiClient,
    has_client_id: bool,
}

impl Twitch {
    pub const SERVICE: &'static str = "twitch";
    const API_BASE: &'static str = "https://api.twitch.tv/kraken";
    const BASE_URL: &'static str = "https://www.twitch.tv";

    pub fn new(context: &ProviderContext) -> Self {
        let mut api = ApiClient::new(
            Self::SERVICE,
            context.api_base(Self::SERVICE, Self::API_BASE),
            context.client.clone(),
        );
        api.add_header_typed(reqwest::header::ACCEPT, "application/vnd.twitchtv.v5+json");

        let settings = context.settings(Self::SERVICE);
        let client_id = settings.and_then(|s| s.client_id.as_deref());
        if let Some(client_id) = client_id {
            api.add_header_str("Client-ID", client_id);
        }
        if let Some(token) = settings.and_then(|s| s.oauth_token.as_deref()) {
            api.add_header_typed(reqwest::header::AUTHORIZATION, format!("OAuth {token}"));
        }

        Self {
            api,
            has_client_id: client_id.is_some(),
        }
    }

    async fn get_user_id(&self, login: &str) -> Result<String, ProviderError> {
        let users: UsersResponse = self.api.get_json("users", &[("login", login)]).await?;
        if users.total != 1 {
            return Err(ProviderError::StreamerNotFound(login.to_owned()));
        }
        users
            .users
            .first()
            .map(|u| u.id.to_string())
            .ok_or_else(|| ProviderError::StreamerNotFound(login.to_owned()))
    }

    /// Twitch answers `streams/{id}` with an error body or `"stream": null`
    /// for channels that are not broadcasting, so every failure here means offline.
    async fn get_stream(&self, user_id: &str) -> Option<StreamsResponse> {
        match self
            .api
            .get_json::<StreamsResponse>(&format!("streams/{user_id}"), &[])
            .await
        {
            Ok(streams) => Some(streams),
            Err(e) => {
                debug!(user_id, error = %e, "no live data, treating as offline");
                None
            }
        }
    }
}

#[async_trait]
impl PlatformProvider for Twitch {
    fn service(&self) -> &'static str {
        Self::SERVICE
    }

    fn is_valid_user(&self, user: &str) -> bool {
        USER_REGEX.is_match(user)
    }

    async fn fetch_status(&self, user: &str) -> Result<StreamerStatus, ProviderError> {
        if !self.has_client_id {
            return Err(ProviderError::MissingCredentials("twitch client_id"));
        }

        let user_id = self.get_user_id(user).await?;
        debug!(user, user_id = %user_id, "resolved twitch channel id");

        let channel: ChannelResponse = self
            .api
            .get_json(&format!("channels/{user_id}"), &[])
            .await?;
        let Some(display_name) = channel.display_name else {
            return Err(ProviderError::StreamerNotFound(user.to_owned()));
        };

        let channel_url = channel
            .url
            .unwrap_or_else(|| format!("{}/{}", Self::BASE_URL, user.to_lowercase()));

        let builder = StreamerStatus::builder(display_name)
            .logo_opt(channel.logo)
            .doing_opt(channel.game)
            .status_opt(channel.status)
            .lifetime_views(channel.views.unwrap_or(0))
            .followers(channel.followers.unwrap_or(0))
            .channel_url(channel_url);

        let live = self.get_stream(&user_id).await.and_then(|s| s.stream);
        let status = match live {
            Some(stream) => builder
                .online(true)
                .viewers(stream.viewers.unwrap_or(0))
                .thumbnail_opt(stream.preview.and_then(|p| p.medium.or(p.large)))
                .build(),
            None => builder.online(false).build(),
        };

        Ok(status)
    }
}
