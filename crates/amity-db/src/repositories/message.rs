//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use amity_core::entities::Message;
use amity_core::traits::{MessageRepository, RepoResult};
use amity_core::value_objects::Snowflake;

use crate::models::{MessageModel, UnreadCountModel};

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, match_id, sender_id, content, kind, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.match_id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(&message.content)
        .bind(message.kind.as_str())
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, match_id, sender_id, content, kind, created_at, read_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_by_match(&self, match_id: Snowflake) -> RepoResult<Vec<Message>> {
        let results = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, match_id, sender_id, content, kind, created_at, read_at
            FROM messages
            WHERE match_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(match_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn latest_by_match(&self, match_id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, match_id, sender_id, content, kind, created_at, read_at
            FROM messages
            WHERE match_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(match_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn mark_read(
        &self,
        match_id: Snowflake,
        viewer_id: Snowflake,
        read_at: DateTime<Utc>,
    ) -> RepoResult<Vec<Snowflake>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            UPDATE messages
            SET read_at = $3
            WHERE match_id = $1 AND sender_id != $2 AND read_at IS NULL
            RETURNING id
            "#,
        )
        .bind(match_id.into_inner())
        .bind(viewer_id.into_inner())
        .bind(read_at)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id,)| Snowflake::new(id)).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake, sender_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM messages
            WHERE id = $1 AND sender_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(sender_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_expired(
        &self,
        match_id: Snowflake,
        cutoff: DateTime<Utc>,
    ) -> RepoResult<Vec<Snowflake>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            DELETE FROM messages
            WHERE match_id = $1 AND created_at < $2
            RETURNING id
            "#,
        )
        .bind(match_id.into_inner())
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id,)| Snowflake::new(id)).collect())
    }

    #[instrument(skip(self))]
    async fn delete_expired_all(
        &self,
        cutoff: DateTime<Utc>,
    ) -> RepoResult<Vec<(Snowflake, Snowflake)>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            DELETE FROM messages
            WHERE created_at < $1
            RETURNING match_id, id
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|(match_id, id)| (Snowflake::new(match_id), Snowflake::new(id)))
            .collect())
    }

    #[instrument(skip(self))]
    async fn count_unread(&self, match_id: Snowflake, viewer_id: Snowflake) -> RepoResult<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE match_id = $1 AND sender_id != $2 AND read_at IS NULL
            "#,
        )
        .bind(match_id.into_inner())
        .bind(viewer_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count.0)
    }

    #[instrument(skip(self))]
    async fn count_unread_per_match(
        &self,
        viewer_id: Snowflake,
        match_ids: &[Snowflake],
    ) -> RepoResult<Vec<(Snowflake, i64)>> {
        if match_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = match_ids.iter().map(|s| s.into_inner()).collect();

        let results = sqlx::query_as::<_, UnreadCountModel>(
            r#"
            SELECT match_id, COUNT(*) AS unread
            FROM messages
            WHERE match_id = ANY($1) AND sender_id != $2 AND read_at IS NULL
            GROUP BY match_id
            "#,
        )
        .bind(&ids)
        .bind(viewer_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results
            .into_iter()
            .map(|r| (Snowflake::new(r.match_id), r.unread))
            .collect())
    }
}
