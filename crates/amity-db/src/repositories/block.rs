//! PostgreSQL implementation of BlockRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use amity_core::entities::Block;
use amity_core::traits::{BlockRepository, RepoResult};
use amity_core::value_objects::Snowflake;

use crate::models::BlockModel;

use super::error::map_db_error;

/// PostgreSQL implementation of BlockRepository
#[derive(Clone)]
pub struct PgBlockRepository {
    pool: PgPool,
}

impl PgBlockRepository {
    /// Create a new PgBlockRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockRepository for PgBlockRepository {
    #[instrument(skip(self))]
    async fn create(&self, block: &Block) -> RepoResult<bool> {
        // ON CONFLICT DO NOTHING makes a repeat block a no-op
        let result = sqlx::query(
            r#"
            INSERT INTO blocks (blocker_id, blocked_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (blocker_id, blocked_id) DO NOTHING
            "#,
        )
        .bind(block.blocker_id.into_inner())
        .bind(block.blocked_id.into_inner())
        .bind(block.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, blocker_id: Snowflake, blocked_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM blocks
            WHERE blocker_id = $1 AND blocked_id = $2
            "#,
        )
        .bind(blocker_id.into_inner())
        .bind(blocked_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find_between(&self, a: Snowflake, b: Snowflake) -> RepoResult<Vec<Block>> {
        let results = sqlx::query_as::<_, BlockModel>(
            r#"
            SELECT blocker_id, blocked_id, created_at
            FROM blocks
            WHERE (blocker_id = $1 AND blocked_id = $2)
               OR (blocker_id = $2 AND blocked_id = $1)
            "#,
        )
        .bind(a.into_inner())
        .bind(b.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Block::from).collect())
    }

    #[instrument(skip(self))]
    async fn blocked_ids(&self, blocker_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT blocked_id
            FROM blocks
            WHERE blocker_id = $1
            "#,
        )
        .bind(blocker_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id,)| Snowflake::new(id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgBlockRepository>();
    }
}
