mod builder;
mod models;

pub use builder::USER_REGEX;
pub use builder::YouTube;
