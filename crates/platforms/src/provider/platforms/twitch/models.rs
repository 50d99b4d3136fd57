use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum KrakenId {
    Text(String),
    Number(u64),
}

impl std::fmt::Display for KrakenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KrakenId::Text(s) => f.write_str(s),
            KrakenId::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    #[serde(rename = "_total", default)]
    pub total: u64,
    #[serde(default)]
    pub users: Vec<KrakenUser>,
}

#[derive(Debug, Deserialize)]
pub struct KrakenUser {
    #[serde(rename = "_id")]
    pub id: KrakenId,
}

#[derive(Debug, Deserialize)]
pub struct ChannelResponse {
    pub display_name: Option<String>,
    pub logo: Option<String>,
    pub game: Option<String>,
    pub views: Option<u64>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub followers: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct StreamsResponse {
    pub stream: Option<KrakenStream>,
}

#[derive(Debug, Deserialize)]
pub struct KrakenStream {
    pub viewers: Option<u64>,
    pub preview: Option<StreamPreview>,
}

#[derive(Debug, Deserialize)]
pub struct StreamPreview {
    pub medium: Option<String>,
    pub large: Option<String>,
}
