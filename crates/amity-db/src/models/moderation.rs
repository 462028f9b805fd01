//! Block and report database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for blocks table
#[derive(Debug, Clone, FromRow)]
pub struct BlockModel {
    pub blocker_id: i64,
    pub blocked_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Database model for reports table
#[derive(Debug, Clone, FromRow)]
pub struct ReportModel {
    pub id: i64,
    pub reporter_id: i64,
    pub reported_id: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
