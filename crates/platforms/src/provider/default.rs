use std::time::Duration;

use reqwest::Client;

pub(crate) const DEFAULT_UA: &str = concat!("streamer-platforms/", env!("CARGO_PKG_VERSION"));

/// Request deadline used when the caller does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by every provider adapter.
///
/// `timeout` bounds each request end to end; an expired deadline surfaces as
/// an ordinary transport error.
pub fn default_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(DEFAULT_UA)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(5)))
        .build()
}
