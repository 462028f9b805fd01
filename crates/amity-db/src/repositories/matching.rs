//! PostgreSQL implementation of MatchRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use amity_core::entities::Match;
use amity_core::error::DomainError;
use amity_core::traits::{MatchRepository, RepoResult};
use amity_core::value_objects::Snowflake;

use crate::models::MatchModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of MatchRepository
///
/// Pair uniqueness is enforced by a unique index on
/// `(LEAST(user1_id, user2_id), GREATEST(user1_id, user2_id))`, so a
/// duplicate insert fails regardless of column ordering.
#[derive(Clone)]
pub struct PgMatchRepository {
    pool: PgPool,
}

impl PgMatchRepository {
    /// Create a new PgMatchRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchRepository for PgMatchRepository {
    #[instrument(skip(self))]
    async fn create(&self, m: &Match) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO matches (id, user1_id, user2_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(m.id.into_inner())
        .bind(m.user1_id.into_inner())
        .bind(m.user2_id.into_inner())
        .bind(m.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::DuplicateMatch))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Match>> {
        let result = sqlx::query_as::<_, MatchModel>(
            r#"
            SELECT id, user1_id, user2_id, created_at
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Match::from))
    }

    #[instrument(skip(self))]
    async fn find_pair(&self, a: Snowflake, b: Snowflake) -> RepoResult<Option<Match>> {
        let result = sqlx::query_as::<_, MatchModel>(
            r#"
            SELECT id, user1_id, user2_id, created_at
            FROM matches
            WHERE (user1_id = $1 AND user2_id = $2)
               OR (user1_id = $2 AND user2_id = $1)
            "#,
        )
        .bind(a.into_inner())
        .bind(b.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Match::from))
    }

    #[instrument(skip(self))]
    async fn find_by_profile(&self, profile_id: Snowflake) -> RepoResult<Vec<Match>> {
        let results = sqlx::query_as::<_, MatchModel>(
            r#"
            SELECT id, user1_id, user2_id, created_at
            FROM matches
            WHERE user1_id = $1 OR user2_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(profile_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Match::from).collect())
    }

    #[instrument(skip(self))]
    async fn ids_by_profile(&self, profile_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM matches
            WHERE user1_id = $1 OR user2_id = $1
            "#,
        )
        .bind(profile_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id,)| Snowflake::new(id)).collect())
    }
}
