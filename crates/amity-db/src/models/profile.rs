//! Profile database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for profiles table
#[derive(Debug, Clone, FromRow)]
pub struct ProfileModel {
    pub id: i64,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub is_premium: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
