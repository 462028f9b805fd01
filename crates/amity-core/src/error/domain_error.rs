//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Profile not found: {0}")]
    ProfileNotFound(Snowflake),

    #[error("Match not found: {0}")]
    MatchNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("Like not found")]
    LikeNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message content is empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Cannot like yourself")]
    SelfLike,

    #[error("Cannot block yourself")]
    SelfBlock,

    #[error("Cannot report yourself")]
    SelfReport,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not a participant of this match")]
    NotParticipant,

    #[error("Not message sender")]
    NotMessageSender,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Like already exists")]
    AlreadyLiked,

    #[error("Match already exists for this pair")]
    DuplicateMatch,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Feed error: {0}")]
    FeedError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",
            Self::MatchNotFound(_) => "UNKNOWN_MATCH",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::LikeNotFound => "UNKNOWN_LIKE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::SelfLike => "SELF_LIKE",
            Self::SelfBlock => "SELF_BLOCK",
            Self::SelfReport => "SELF_REPORT",

            // Authorization
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::NotMessageSender => "NOT_MESSAGE_SENDER",

            // Conflict
            Self::AlreadyLiked => "ALREADY_LIKED",
            Self::DuplicateMatch => "DUPLICATE_MATCH",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::FeedError(_) => "FEED_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProfileNotFound(_)
                | Self::MatchNotFound(_)
                | Self::MessageNotFound(_)
                | Self::LikeNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyContent
                | Self::ContentTooLong { .. }
                | Self::SelfLike
                | Self::SelfBlock
                | Self::SelfReport
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotParticipant | Self::NotMessageSender)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyLiked | Self::DuplicateMatch)
    }
}
