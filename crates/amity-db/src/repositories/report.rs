//! PostgreSQL implementation of ReportRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use amity_core::entities::Report;
use amity_core::traits::{RepoResult, ReportRepository};
use amity_core::value_objects::Snowflake;

use super::error::map_db_error;

/// PostgreSQL implementation of ReportRepository
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    /// Create a new PgReportRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    #[instrument(skip(self, report), fields(reported_id = %report.reported_id))]
    async fn create(&self, report: &Report) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reports (id, reporter_id, reported_id, reason, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(report.id.into_inner())
        .bind(report.reporter_id.into_inner())
        .bind(report.reported_id.into_inner())
        .bind(&report.reason)
        .bind(report.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn distinct_reporters(&self, reported_id: Snowflake) -> RepoResult<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT reporter_id)
            FROM reports
            WHERE reported_id = $1
            "#,
        )
        .bind(reported_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgReportRepository>();
    }
}
