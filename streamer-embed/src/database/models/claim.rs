//! Claim database model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::time::now_ms;

/// Association between a (service, user) pair and the page whose
/// `#streamerinfo` directive last declared it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ClaimDbModel {
    pub service: String,
    pub user: String,
    /// Root title of the claiming page.
    pub display_name: String,
    /// Full title of the claiming page.
    pub page_title: String,
    /// Unix epoch milliseconds (UTC) when created.
    pub created_at: i64,
    /// Unix epoch milliseconds (UTC) when last refreshed.
    pub updated_at: i64,
}

impl ClaimDbModel {
    pub fn new(
        service: impl Into<String>,
        user: impl Into<String>,
        display_name: impl Into<String>,
        page_title: impl Into<String>,
    ) -> Self {
        let now = now_ms();
        Self {
            service: service.into(),
            user: user.into(),
            display_name: display_name.into(),
            page_title: page_title.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Link to the claiming page for a `$1`-style URL pattern.
    ///
    /// Spaces in the title become underscores.
    pub fn page_link(&self, pattern: &str) -> String {
        pattern.replace("$1", &self.page_title.replace(' ', "_"))
    }
}
