//! Response DTOs for service operations
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs serialize as strings for JavaScript compatibility.

use amity_core::entities::{Message, MessageKind, ProfileRef};
use amity_core::Snowflake;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of sending a like
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LikeOutcome {
    /// Whether this like completed a mutual pair
    pub matched: bool,
    /// The match for the pair, set when `matched` is true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<Snowflake>,
}

/// Read-only like/match relationship between two profiles
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LikeStatus {
    /// Whether the first profile has liked the second
    pub liked: bool,
    /// Whether a match exists for the pair
    pub matched: bool,
}

/// Truncated view of the most recent message in a match
#[derive(Debug, Clone, Serialize)]
pub struct LastMessage {
    pub id: Snowflake,
    pub sender_id: Snowflake,
    pub preview: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

impl LastMessage {
    /// Longest preview carried in a match listing
    pub const PREVIEW_LENGTH: usize = 80;

    pub fn from_message(message: &Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            preview: message.preview(Self::PREVIEW_LENGTH).to_string(),
            kind: message.kind,
            created_at: message.created_at,
            is_read: message.is_read(),
        }
    }
}

/// One entry in a profile's match listing, enriched with the other
/// participant, the latest message, and the viewer's unread count
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub match_id: Snowflake,
    pub created_at: DateTime<Utc>,
    /// The other participant, if the directory still knows them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<ProfileRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessage>,
    pub unread: i64,
}
