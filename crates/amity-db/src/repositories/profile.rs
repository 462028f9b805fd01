//! PostgreSQL implementation of ProfileDirectory

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use amity_core::entities::ProfileRef;
use amity_core::error::DomainError;
use amity_core::traits::{ProfileDirectory, RepoResult};
use amity_core::value_objects::Snowflake;

use crate::models::ProfileModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ProfileDirectory
#[derive(Clone)]
pub struct PgProfileDirectory {
    pool: PgPool,
}

impl PgProfileDirectory {
    /// Create a new PgProfileDirectory
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileDirectory for PgProfileDirectory {
    #[instrument(skip(self))]
    async fn get_profile(&self, id: Snowflake) -> RepoResult<Option<ProfileRef>> {
        let result = sqlx::query_as::<_, ProfileModel>(
            r#"
            SELECT id, display_name, avatar_url, is_premium, is_active, created_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ProfileRef::from))
    }

    #[instrument(skip(self))]
    async fn get_profiles(&self, ids: &[Snowflake]) -> RepoResult<Vec<ProfileRef>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = ids.iter().map(|s| s.into_inner()).collect();

        let results = sqlx::query_as::<_, ProfileModel>(
            r#"
            SELECT id, display_name, avatar_url, is_premium, is_active, created_at
            FROM profiles
            WHERE id = ANY($1)
            "#,
        )
        .bind(&raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ProfileRef::from).collect())
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET is_active = FALSE
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ProfileNotFound(id));
        }

        Ok(())
    }
}
