//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub match_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl MessageModel {
    /// Check if message has been read
    #[inline]
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

/// Row shape for grouped unread counts
#[derive(Debug, Clone, FromRow)]
pub struct UnreadCountModel {
    pub match_id: i64,
    pub unread: i64,
}
