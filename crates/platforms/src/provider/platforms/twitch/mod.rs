mod builder;
mod models;

pub use builder::Twitch;
pub use builder::USER_REGEX;
