//! PostgreSQL implementation of LikeRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use amity_core::entities::Like;
use amity_core::error::DomainError;
use amity_core::traits::{LikeRepository, RepoResult};
use amity_core::value_objects::Snowflake;

use crate::models::LikeModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of LikeRepository
#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    /// Create a new PgLikeRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    #[instrument(skip(self))]
    async fn create(&self, like: &Like) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO likes (sender_id, receiver_id, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(like.sender_id.into_inner())
        .bind(like.receiver_id.into_inner())
        .bind(like.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyLiked))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, sender_id: Snowflake, receiver_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE sender_id = $1 AND receiver_id = $2
            "#,
        )
        .bind(sender_id.into_inner())
        .bind(receiver_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn exists(&self, sender_id: Snowflake, receiver_id: Snowflake) -> RepoResult<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE sender_id = $1 AND receiver_id = $2
            )
            "#,
        )
        .bind(sender_id.into_inner())
        .bind(receiver_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists.0)
    }

    #[instrument(skip(self))]
    async fn find_sent(&self, sender_id: Snowflake) -> RepoResult<Vec<Like>> {
        let results = sqlx::query_as::<_, LikeModel>(
            r#"
            SELECT sender_id, receiver_id, created_at
            FROM likes
            WHERE sender_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(sender_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Like::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_received(&self, receiver_id: Snowflake) -> RepoResult<Vec<Like>> {
        let results = sqlx::query_as::<_, LikeModel>(
            r#"
            SELECT sender_id, receiver_id, created_at
            FROM likes
            WHERE receiver_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(receiver_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Like::from).collect())
    }
}
