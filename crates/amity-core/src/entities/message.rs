//! Message entity - a single message inside a match conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Kind of message content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    Location,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Location => "location",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "location" => Some(Self::Location),
            _ => None,
        }
    }
}

/// A message within a match conversation.
///
/// Messages carry a read receipt (`read_at`) that is set at most once,
/// when the non-sender first views the conversation. Every message
/// expires 24 hours after creation and is hard-deleted by the retention
/// sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub match_id: Snowflake,
    pub sender_id: Snowflake,
    pub content: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    pub const MAX_CONTENT_LENGTH: usize = 4000;

    /// Create a new text message
    pub fn new(id: Snowflake, match_id: Snowflake, sender_id: Snowflake, content: String) -> Self {
        Self {
            id,
            match_id,
            sender_id,
            content,
            kind: MessageKind::Text,
            created_at: Utc::now(),
            read_at: None,
        }
    }

    /// Whether the message has been read by the recipient
    #[inline]
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Whether the content is empty after trimming whitespace
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Whether this message counts as unread for the given viewer
    #[inline]
    pub fn is_unread_for(&self, viewer_id: Snowflake) -> bool {
        self.sender_id != viewer_id && self.read_at.is_none()
    }

    /// Record the read receipt. Idempotent: a second call keeps the
    /// original timestamp.
    pub fn mark_read(&mut self, now: DateTime<Utc>) {
        if self.read_at.is_none() {
            self.read_at = Some(now);
        }
    }

    /// Whether the message has outlived its retention window
    #[inline]
    pub fn is_expired(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff
    }

    /// Get a truncated preview of the content
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) {
                end -= 1;
            }
            &self.content[..end]
        }
    }
}
