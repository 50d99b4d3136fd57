use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("streamer not found: {0}")]
    StreamerNotFound(String),
    #[error("no provider registered for service: {0}")]
    ProviderUnavailable(String),
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
