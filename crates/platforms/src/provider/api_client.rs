use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use tracing::debug;
use url::Url;

use super::default::DEFAULT_UA;
use super::error::ProviderError;

/// Shared HTTP plumbing for a single platform API.
///
/// Every request built through the client carries the platform headers
/// (authentication, `Accept`, ...) and the platform query parameters
/// (API keys), so adapters only deal with paths and response shapes.
///
/// # Example Usage
///
/// ```rust,ignore
/// # use reqwest::Client;
/// # use streamer_platforms::provider::api_client::ApiClient;
/// #
/// # async fn doc_test() -> Result<(), Box<dyn std::error::Error>> {
/// let mut api = ApiClient::new("twitch", "https://api.twitch.tv/kraken", Client::new());
/// api.add_header_str("Client-ID", "my-client-id");
///
/// let users: serde_json::Value = api.get_json("users", &[("login", "somechannel")]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    // service name, e.g. "twitch"
    pub service: String,
    // API entry point without trailing slash
    pub base_url: String,
    pub client: Client,
    platform_headers: HeaderMap,
    pub platform_params: FxHashMap<String, String>,
}

impl ApiClient {
    pub fn new<S1: Into<String>, S2: AsRef<str>>(service: S1, base_url: S2, client: Client) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        Self {
            service: service.into(),
            base_url: base_url.as_ref().trim_end_matches('/').to_owned(),
            client,
            platform_headers: default_headers,
            platform_params: FxHashMap::default(),
        }
    }

    pub fn add_header_str<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) {
        match HeaderName::from_str(key.as_ref()) {
            Ok(name) => match HeaderValue::from_str(value.as_ref()) {
                Ok(value) => {
                    self.platform_headers.insert(name, value);
                }
                Err(e) => {
                    debug!(error = %e, "Invalid header value; skipping");
                }
            },
            Err(e) => {
                debug!(error = %e, "Invalid header name; skipping");
            }
        }
    }

    pub fn add_header_typed<K: Into<HeaderName>, V: AsRef<str>>(&mut self, key: K, value: V) {
        match HeaderValue::from_str(value.as_ref()) {
            Ok(value) => {
                self.platform_headers.insert(key.into(), value);
            }
            Err(e) => {
                debug!(error = %e, "Invalid header value; skipping");
            }
        }
    }

    pub fn add_param<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.platform_params.insert(key.into(), value.into());
    }

    pub fn get_platform_headers(&self) -> &HeaderMap {
        &self.platform_headers
    }

    /// Full URL for a path below the API entry point.
    pub fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        Ok(Url::parse(&format!(
            "{}/{}",
            self.base_url,
            path.trim_start_matches('/')
        ))?)
    }

    pub fn get(&self, path: &str) -> Result<RequestBuilder, ProviderError> {
        self.request(Method::GET, path)
    }

    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ProviderError> {
        Ok(self
            .client
            .request(method, self.endpoint(path)?)
            .headers(self.platform_headers.clone())
            .query(&self.platform_params))
    }

    /// GET `path` with `query` and decode the JSON body.
    ///
    /// Non-success status codes are reported as [`ProviderError::UnexpectedResponse`],
    /// so a provider answering with an error-shaped body never reaches the decoder.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let response = self.get(path)?.query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(service = %self.service, path, %status, "api response");

        if !status.is_success() {
            return Err(ProviderError::UnexpectedResponse(format!(
                "{} {path} returned {status}",
                self.service
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_single_slash() {
        let api = ApiClient::new("twitch", "https://api.twitch.tv/kraken/", Client::new());
        assert_eq!(
            api.endpoint("/users").unwrap().as_str(),
            "https://api.twitch.tv/kraken/users"
        );
        assert_eq!(
            api.endpoint("channels/123").unwrap().as_str(),
            "https://api.twitch.tv/kraken/channels/123"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let api = ApiClient::new("twitch", "not a url", Client::new());
        assert!(matches!(api.endpoint("users"), Err(ProviderError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_header_is_skipped() {
        let mut api = ApiClient::new("twitch", "https://api.twitch.tv/kraken", Client::new());
        api.add_header_str("Client-ID", "abc\nxyz");
        assert!(api.get_platform_headers().get("client-id").is_none());

        api.add_header_str("Client-ID", "abc");
        assert_eq!(api.get_platform_headers().get("client-id").unwrap(), "abc");
    }
}
