//! Claim repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::Result;
use crate::database::models::ClaimDbModel;

/// Claim repository trait.
///
/// At most one claim exists per (service, user); `save` replaces it.
#[async_trait]
pub trait ClaimRepository: Send + Sync {
    /// Insert or refresh the claim for its (service, user) key.
    async fn save(&self, claim: &ClaimDbModel) -> Result<()>;
    /// Returns whether a row was removed.
    async fn delete(&self, service: &str, user: &str) -> Result<bool>;
    async fn find(&self, service: &str, user: &str) -> Result<Option<ClaimDbModel>>;
    /// Most recently refreshed claim written by `page_title`.
    ///
    /// Only one claim is returned even if the page wrote several, so
    /// reconciling a removed directive leaves the page's older claims behind.
    async fn find_by_page(&self, page_title: &str) -> Result<Option<ClaimDbModel>>;
}

/// SQLx implementation of ClaimRepository.
pub struct SqlxClaimRepository {
    pool: SqlitePool,
}

impl SqlxClaimRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClaimRepository for SqlxClaimRepository {
    async fn save(&self, claim: &ClaimDbModel) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO streamer_claims (service, user, display_name, page_title, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(service, user) DO UPDATE SET
                display_name = excluded.display_name,
                page_title = excluded.page_title,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&claim.service)
        .bind(&claim.user)
        .bind(&claim.display_name)
        .bind(&claim.page_title)
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, service: &str, user: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM streamer_claims WHERE service = ? AND user = ?")
            .bind(service)
            .bind(user)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, service: &str, user: &str) -> Result<Option<ClaimDbModel>> {
        let claim = sqlx::query_as::<_, ClaimDbModel>(
            "SELECT * FROM streamer_claims WHERE service = ? AND user = ?",
        )
        .bind(service)
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;
        Ok(claim)
    }

    async fn find_by_page(&self, page_title: &str) -> Result<Option<ClaimDbModel>> {
        let claim = sqlx::query_as::<_, ClaimDbModel>(
            "SELECT * FROM streamer_claims WHERE page_title = ? ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(page_title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(claim)
    }
}
