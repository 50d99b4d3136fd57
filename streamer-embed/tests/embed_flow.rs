//! End-to-end directive rendering and claim lifecycle against a mock Twitch API.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use streamer_embed::config::EmbedConfig;
use streamer_embed::database::{
    self, ClaimDbModel, ClaimRepository, SqlxClaimRepository,
};
use streamer_embed::{ClaimTransition, Error, PageContext, StreamerEmbed};
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = "Some Channel/Streams";
const INFO: &str = "{{#streamerinfo: service=twitch | user=somechannel}}";

async fn mount_offline_channel(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("login", "somechannel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_total": 1,
            "users": [{ "_id": "44322889" }]
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels/44322889"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "display_name": "SomeChannel",
            "logo": "https://cdn.example/logo.png",
            "views": 1200,
            "url": "https://www.twitch.tv/somechannel",
            "followers": 55
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/streams/44322889"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "stream": null })))
        .expect(1)
        .mount(server)
        .await;
}

fn config(server: &MockServer) -> EmbedConfig {
    let mut config = EmbedConfig::default();
    config.providers.twitch.client_id = Some("test-client".to_string());
    config.providers.twitch.api_base = Some(server.uri());
    config
}

async fn embed(server: &MockServer) -> StreamerEmbed {
    let pool = database::init_pool_with_size("sqlite::memory:", 1).await.unwrap();
    database::run_migrations(&pool).await.unwrap();
    StreamerEmbed::new(
        config(server).registry().unwrap(),
        Arc::new(SqlxClaimRepository::new(pool)),
    )
}

#[tokio::test]
async fn offline_channel_links_to_channel_url() {
    let server = MockServer::start().await;
    mount_offline_channel(&server).await;
    let embed = embed(&server).await;

    let out = embed
        .render_streamer(["service=twitch", "user=somechannel"])
        .await
        .unwrap();

    assert!(!out.no_parse);
    assert!(out.html.starts_with("<div class='stream block'>"));
    assert!(out.html.contains("<a href='https://www.twitch.tv/somechannel'>SomeChannel</a>"));
    assert!(out.html.contains("{{#ifeq:0|1|Online|Offline}}"));
}

#[tokio::test]
async fn second_render_within_ttl_reuses_status() {
    let server = MockServer::start().await;
    mount_offline_channel(&server).await;
    let embed = embed(&server).await;
    let args = ["service=twitch", "user=somechannel", "template=debug"];

    let first = embed.render_streamer(args).await.unwrap();
    let second = embed.render_streamer(args).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(embed.registry().context().cache.len(), 1);
    // Mock expectations (one call per endpoint) are verified on drop.
}

#[tokio::test]
async fn unknown_service_is_rejected_without_fetch() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let embed = embed(&server).await;

    let bogus = embed
        .render_streamer(["service=bogus", "user=somechannel"])
        .await
        .unwrap();
    assert_eq!(bogus.html.matches("<br/>").count(), 2);
    assert!(bogus.html.contains("The option &quot;bogus&quot; is not valid"));
    assert!(bogus.html.contains("The parameter &quot;service&quot; is required."));

    let retired = embed
        .render_streamer(["service=hitbox", "user=somechannel"])
        .await
        .unwrap();
    assert_eq!(retired.html.matches("<br/>").count(), 1);
    assert!(retired.html.contains("No provider is available for the service &quot;hitbox&quot;."));
}

#[tokio::test]
async fn bad_user_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let embed = embed(&server).await;

    let out = embed
        .render_streamer(["service=twitch", "user=bad user!"])
        .await
        .unwrap();

    assert_eq!(out.html.matches("<br/>").count(), 1);
    assert!(out.html.contains(
        "The user &quot;bad user!&quot; is not valid for the service &quot;twitch&quot; or could not be found."
    ));
}

#[tokio::test]
async fn claim_names_and_links_the_widget() {
    let server = MockServer::start().await;
    mount_offline_channel(&server).await;
    let embed = embed(&server).await.with_page_url_pattern("https://wiki.example/$1");

    let info = embed
        .render_streamer_info(&PageContext::new(PAGE), ["service=twitch", "user=somechannel"])
        .await
        .unwrap();
    assert!(info.no_parse);
    assert!(info.html.is_empty());

    let claim = embed.claims().find("twitch", "somechannel").await.unwrap().unwrap();
    assert_eq!(claim.display_name, "Some Channel");
    assert_eq!(claim.page_title, PAGE);

    let out = embed
        .render_streamer(["service=twitch", "user=somechannel", "template=link"])
        .await
        .unwrap();
    assert_eq!(
        out.html,
        "<a class='stream link' href='https://wiki.example/Some_Channel/Streams'>Some Channel</a>"
    );

    let explicit = embed
        .render_streamer([
            "service=twitch",
            "user=somechannel",
            "template=link",
            "link=https://example.com/me",
        ])
        .await
        .unwrap();
    assert!(explicit.html.contains("href='https://example.com/me'"));
}

#[tokio::test]
async fn claim_lifecycle_follows_page_edits() {
    let server = MockServer::start().await;
    mount_offline_channel(&server).await;
    let embed = embed(&server).await;
    let args = ["service=twitch", "user=somechannel"];
    let page = PageContext::new(PAGE);

    // Revision N adds the directive, and the page render writes the claim.
    let added = embed.on_page_saved(PAGE, None, INFO).await.unwrap();
    assert_eq!(added, ClaimTransition::Added);
    embed.render_streamer_info(&page, args).await.unwrap();
    let first = embed.claims().find_by_page(PAGE).await.unwrap().unwrap();

    // Revision N+1 keeps it; rendering refreshes the claim.
    let kept = format!("Updated intro\n{INFO}");
    let retained = embed.on_page_saved(PAGE, Some(INFO), &kept).await.unwrap();
    assert_eq!(retained, ClaimTransition::Retained);
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    embed.render_streamer_info(&page, args).await.unwrap();
    let refreshed = embed.claims().find_by_page(PAGE).await.unwrap().unwrap();
    assert_eq!(refreshed.created_at, first.created_at);
    assert!(refreshed.updated_at > first.updated_at);

    // Revision N+2 drops it.
    let removed = embed.on_page_saved(PAGE, Some(&kept), "Gone").await.unwrap();
    assert_eq!(removed, ClaimTransition::Removed { deleted: true });
    assert!(embed.claims().find("twitch", "somechannel").await.unwrap().is_none());
}

struct UnavailableStore;

#[async_trait]
impl ClaimRepository for UnavailableStore {
    async fn save(&self, _claim: &ClaimDbModel) -> streamer_embed::Result<()> {
        Err(Error::DatabaseSqlx(sqlx::Error::PoolClosed))
    }

    async fn delete(&self, _service: &str, _user: &str) -> streamer_embed::Result<bool> {
        Err(Error::DatabaseSqlx(sqlx::Error::PoolClosed))
    }

    async fn find(&self, _service: &str, _user: &str) -> streamer_embed::Result<Option<ClaimDbModel>> {
        Err(Error::DatabaseSqlx(sqlx::Error::PoolClosed))
    }

    async fn find_by_page(&self, _page_title: &str) -> streamer_embed::Result<Option<ClaimDbModel>> {
        Err(Error::DatabaseSqlx(sqlx::Error::PoolClosed))
    }
}

#[tokio::test]
async fn storage_failures_propagate() {
    let server = MockServer::start().await;
    mount_offline_channel(&server).await;
    let embed = StreamerEmbed::new(config(&server).registry().unwrap(), Arc::new(UnavailableStore));

    let render = embed
        .render_streamer(["service=twitch", "user=somechannel"])
        .await;
    assert!(matches!(render, Err(Error::DatabaseSqlx(_))));

    let saved = embed.on_page_saved(PAGE, Some(INFO), "Gone").await;
    assert!(matches!(saved, Err(Error::DatabaseSqlx(_))));
}
