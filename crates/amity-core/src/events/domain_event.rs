//! Domain events - events emitted when domain state changes
//!
//! These events are used for:
//! - Driving the realtime change feed toward open conversations
//! - Keeping unread counters current without refetching
//! - Audit logging

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::MessageKind;
use crate::value_objects::Snowflake;

/// All possible domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Like Events
    // =========================================================================
    LikeCreated(LikeCreatedEvent),
    LikeRemoved(LikeRemovedEvent),

    // =========================================================================
    // Match Events
    // =========================================================================
    MatchCreated(MatchCreatedEvent),

    // =========================================================================
    // Message Events
    // =========================================================================
    MessageCreated(MessageCreatedEvent),
    MessagesRead(MessagesReadEvent),
    MessageDeleted(MessageDeletedEvent),
    MessagesPurged(MessagesPurgedEvent),

    // =========================================================================
    // Moderation Events
    // =========================================================================
    ProfileBlocked(ProfileBlockedEvent),
    ProfileReported(ProfileReportedEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::LikeCreated(_) => "LIKE_CREATED",
            Self::LikeRemoved(_) => "LIKE_REMOVED",
            Self::MatchCreated(_) => "MATCH_CREATED",
            Self::MessageCreated(_) => "MESSAGE_CREATED",
            Self::MessagesRead(_) => "MESSAGES_READ",
            Self::MessageDeleted(_) => "MESSAGE_DELETED",
            Self::MessagesPurged(_) => "MESSAGES_PURGED",
            Self::ProfileBlocked(_) => "PROFILE_BLOCKED",
            Self::ProfileReported(_) => "PROFILE_REPORTED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::LikeCreated(e) => e.timestamp,
            Self::LikeRemoved(e) => e.timestamp,
            Self::MatchCreated(e) => e.timestamp,
            Self::MessageCreated(e) => e.timestamp,
            Self::MessagesRead(e) => e.timestamp,
            Self::MessageDeleted(e) => e.timestamp,
            Self::MessagesPurged(e) => e.timestamp,
            Self::ProfileBlocked(e) => e.timestamp,
            Self::ProfileReported(e) => e.timestamp,
        }
    }

    /// Get the match this event belongs to, if it is scoped to one
    pub fn match_id(&self) -> Option<Snowflake> {
        match self {
            Self::MatchCreated(e) => Some(e.match_id),
            Self::MessageCreated(e) => Some(e.match_id),
            Self::MessagesRead(e) => Some(e.match_id),
            Self::MessageDeleted(e) => Some(e.match_id),
            Self::MessagesPurged(e) => Some(e.match_id),
            _ => None,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeCreatedEvent {
    pub sender_id: Snowflake,
    pub receiver_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeRemovedEvent {
    pub sender_id: Snowflake,
    pub receiver_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCreatedEvent {
    pub match_id: Snowflake,
    pub user1_id: Snowflake,
    pub user2_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreatedEvent {
    pub message_id: Snowflake,
    pub match_id: Snowflake,
    pub sender_id: Snowflake,
    pub content: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesReadEvent {
    pub match_id: Snowflake,
    pub reader_id: Snowflake,
    pub message_ids: Vec<Snowflake>,
    pub read_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeletedEvent {
    pub message_id: Snowflake,
    pub match_id: Snowflake,
    pub sender_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesPurgedEvent {
    pub match_id: Snowflake,
    pub message_ids: Vec<Snowflake>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileBlockedEvent {
    pub blocker_id: Snowflake,
    pub blocked_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReportedEvent {
    pub reporter_id: Snowflake,
    pub reported_id: Snowflake,
    pub deactivated: bool,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Event Creation Helpers
// ============================================================================

impl LikeCreatedEvent {
    pub fn new(sender_id: Snowflake, receiver_id: Snowflake) -> Self {
        Self {
            sender_id,
            receiver_id,
            timestamp: Utc::now(),
        }
    }
}

impl LikeRemovedEvent {
    pub fn new(sender_id: Snowflake, receiver_id: Snowflake) -> Self {
        Self {
            sender_id,
            receiver_id,
            timestamp: Utc::now(),
        }
    }
}

impl MatchCreatedEvent {
    pub fn new(match_id: Snowflake, user1_id: Snowflake, user2_id: Snowflake) -> Self {
        Self {
            match_id,
            user1_id,
            user2_id,
            timestamp: Utc::now(),
        }
    }
}

impl MessageCreatedEvent {
    pub fn from_message(message: &crate::entities::Message) -> Self {
        Self {
            message_id: message.id,
            match_id: message.match_id,
            sender_id: message.sender_id,
            content: message.content.clone(),
            kind: message.kind,
            created_at: message.created_at,
            timestamp: Utc::now(),
        }
    }
}

impl MessagesReadEvent {
    pub fn new(
        match_id: Snowflake,
        reader_id: Snowflake,
        message_ids: Vec<Snowflake>,
        read_at: DateTime<Utc>,
    ) -> Self {
        Self {
            match_id,
            reader_id,
            message_ids,
            read_at,
            timestamp: Utc::now(),
        }
    }
}

impl MessageDeletedEvent {
    pub fn new(message_id: Snowflake, match_id: Snowflake, sender_id: Snowflake) -> Self {
        Self {
            message_id,
            match_id,
            sender_id,
            timestamp: Utc::now(),
        }
    }
}

impl MessagesPurgedEvent {
    pub fn new(match_id: Snowflake, message_ids: Vec<Snowflake>) -> Self {
        Self {
            match_id,
            message_ids,
            timestamp: Utc::now(),
        }
    }
}

impl ProfileBlockedEvent {
    pub fn new(blocker_id: Snowflake, blocked_id: Snowflake) -> Self {
        Self {
            blocker_id,
            blocked_id,
            timestamp: Utc::now(),
        }
    }
}

impl ProfileReportedEvent {
    pub fn new(reporter_id: Snowflake, reported_id: Snowflake, deactivated: bool) -> Self {
        Self {
            reporter_id,
            reported_id,
            deactivated,
            timestamp: Utc::now(),
        }
    }
}
