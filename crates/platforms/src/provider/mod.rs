pub mod api_client;
pub mod cache;
pub mod default;
pub mod error;
pub mod platforms;
pub mod provider;
pub mod registry;
pub mod utils;
