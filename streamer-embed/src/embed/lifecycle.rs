//! Claim reconciliation on page saves.
//!
//! Detection is a plain substring test on the raw revisions, so an edited
//! directive reads as retained and only the most recent claim a page wrote is
//! removed when the marker disappears.

use tracing::{debug, info};

use super::StreamerEmbed;
use crate::Result;

/// Raw text that marks a `#streamerinfo` directive in page source.
pub const DIRECTIVE_MARKER: &str = "{{#streamerinfo";

/// What a page save meant for the page's claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimTransition {
    /// The directive appeared; the claim is written when the page renders.
    Added,
    /// The directive is still there; rendering refreshes the claim.
    Retained,
    /// The directive was removed. `deleted` reports whether a claim row existed.
    Removed { deleted: bool },
    /// No directive before or after.
    Absent,
}

fn has_directive(content: Option<&str>) -> bool {
    content.is_some_and(|c| c.contains(DIRECTIVE_MARKER))
}

impl StreamerEmbed {
    /// Reconcile the claim store after `page_title` was saved.
    ///
    /// `previous` is the raw content of the prior revision, `None` for a new page.
    pub async fn on_page_saved(
        &self,
        page_title: &str,
        previous: Option<&str>,
        current: &str,
    ) -> Result<ClaimTransition> {
        let transition = match (has_directive(previous), has_directive(Some(current))) {
            (false, true) => ClaimTransition::Added,
            (true, true) => ClaimTransition::Retained,
            (false, false) => ClaimTransition::Absent,
            (true, false) => {
                let deleted = match self.claims.find_by_page(page_title).await? {
                    Some(claim) => {
                        let deleted = self.claims.delete(&claim.service, &claim.user).await?;
                        info!(
                            service = %claim.service,
                            user = %claim.user,
                            page = page_title,
                            "claim removed with its directive"
                        );
                        deleted
                    }
                    None => false,
                };
                ClaimTransition::Removed { deleted }
            }
        };

        debug!(page = page_title, ?transition, "page save reconciled");
        Ok(transition)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use streamer_platforms::{ProviderContext, ProviderRegistry, StatusCache};

    use super::*;
    use crate::database::{ClaimDbModel, ClaimRepository, SqlxClaimRepository, memory_pool};

    const WITH: &str = "Intro\n{{#streamerinfo: service=twitch | user=somechannel}}\n";
    const WITHOUT: &str = "Intro\n";

    async fn embed_with_claim() -> StreamerEmbed {
        let claims = Arc::new(SqlxClaimRepository::new(memory_pool().await));
        claims
            .save(&ClaimDbModel::new("twitch", "somechannel", "Some Channel", "Some Channel"))
            .await
            .unwrap();
        let context = ProviderContext::new(reqwest::Client::new(), StatusCache::new());
        StreamerEmbed::new(ProviderRegistry::new(context), claims)
    }

    #[tokio::test]
    async fn test_removal_deletes_claim() {
        let embed = embed_with_claim().await;

        let transition = embed
            .on_page_saved("Some Channel", Some(WITH), WITHOUT)
            .await
            .unwrap();

        assert_eq!(transition, ClaimTransition::Removed { deleted: true });
        assert!(embed.claims().find("twitch", "somechannel").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_removal_on_other_page_keeps_claim() {
        let embed = embed_with_claim().await;

        let transition = embed
            .on_page_saved("Another Page", Some(WITH), WITHOUT)
            .await
            .unwrap();

        assert_eq!(transition, ClaimTransition::Removed { deleted: false });
        assert!(embed.claims().find("twitch", "somechannel").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_other_transitions_leave_claims_alone() {
        let embed = embed_with_claim().await;

        let cases = [
            (Some(WITH), WITH, ClaimTransition::Retained),
            (Some(WITHOUT), WITH, ClaimTransition::Added),
            (None, WITH, ClaimTransition::Added),
            (Some(WITHOUT), WITHOUT, ClaimTransition::Absent),
            (None, WITHOUT, ClaimTransition::Absent),
        ];
        for (previous, current, expected) in cases {
            let transition = embed
                .on_page_saved("Some Channel", previous, current)
                .await
                .unwrap();
            assert_eq!(transition, expected);
        }
        assert!(embed.claims().find("twitch", "somechannel").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_edited_directive_counts_as_retained() {
        let embed = embed_with_claim().await;
        let edited = "{{#streamerinfo: service=youtube | user=other}}";

        let transition = embed
            .on_page_saved("Some Channel", Some(WITH), edited)
            .await
            .unwrap();
        assert_eq!(transition, ClaimTransition::Retained);
    }
}
