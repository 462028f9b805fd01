//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Block, Like, Match, Message, ProfileRef, Report};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Like Repository
// ============================================================================

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Insert a like.
    ///
    /// Returns `DomainError::AlreadyLiked` if the ordered
    /// `(sender, receiver)` pair already exists.
    async fn create(&self, like: &Like) -> RepoResult<()>;

    /// Remove a like. Returns whether a row was deleted.
    async fn delete(&self, sender_id: Snowflake, receiver_id: Snowflake) -> RepoResult<bool>;

    /// Check whether a directional like exists
    async fn exists(&self, sender_id: Snowflake, receiver_id: Snowflake) -> RepoResult<bool>;

    /// Likes sent by a profile, most recent first
    async fn find_sent(&self, sender_id: Snowflake) -> RepoResult<Vec<Like>>;

    /// Likes received by a profile, most recent first
    async fn find_received(&self, receiver_id: Snowflake) -> RepoResult<Vec<Like>>;
}

// ============================================================================
// Match Repository
// ============================================================================

#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Insert a match.
    ///
    /// Returns `DomainError::DuplicateMatch` if a match already exists
    /// for the unordered pair, regardless of column ordering.
    async fn create(&self, m: &Match) -> RepoResult<()>;

    /// Find a match by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Match>>;

    /// Find the match between two profiles, checking both orderings
    async fn find_pair(&self, a: Snowflake, b: Snowflake) -> RepoResult<Option<Match>>;

    /// All matches involving a profile, most recent first
    async fn find_by_profile(&self, profile_id: Snowflake) -> RepoResult<Vec<Match>>;

    /// IDs of all matches involving a profile
    async fn ids_by_profile(&self, profile_id: Snowflake) -> RepoResult<Vec<Snowflake>>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert a message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Find a message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// All messages in a match, oldest first (`created_at` ascending,
    /// ID as tiebreak)
    async fn find_by_match(&self, match_id: Snowflake) -> RepoResult<Vec<Message>>;

    /// The most recent message in a match, if any
    async fn latest_by_match(&self, match_id: Snowflake) -> RepoResult<Option<Message>>;

    /// Set `read_at` on every unread message in the match that the
    /// viewer did not send. Returns the IDs of messages updated.
    async fn mark_read(
        &self,
        match_id: Snowflake,
        viewer_id: Snowflake,
        read_at: DateTime<Utc>,
    ) -> RepoResult<Vec<Snowflake>>;

    /// Delete a message, scoped to its sender. Returns whether a row
    /// was deleted.
    async fn delete(&self, id: Snowflake, sender_id: Snowflake) -> RepoResult<bool>;

    /// Delete expired messages in one match. Returns deleted IDs.
    async fn delete_expired(
        &self,
        match_id: Snowflake,
        cutoff: DateTime<Utc>,
    ) -> RepoResult<Vec<Snowflake>>;

    /// Delete expired messages across all matches. Returns
    /// `(match_id, message_id)` pairs for feed notification.
    async fn delete_expired_all(
        &self,
        cutoff: DateTime<Utc>,
    ) -> RepoResult<Vec<(Snowflake, Snowflake)>>;

    /// Count unread messages in one match for a viewer
    async fn count_unread(&self, match_id: Snowflake, viewer_id: Snowflake) -> RepoResult<i64>;

    /// Unread counts per match for a viewer, restricted to the given
    /// matches. Matches with zero unread are omitted.
    async fn count_unread_per_match(
        &self,
        viewer_id: Snowflake,
        match_ids: &[Snowflake],
    ) -> RepoResult<Vec<(Snowflake, i64)>>;
}

// ============================================================================
// Block Repository
// ============================================================================

#[async_trait]
pub trait BlockRepository: Send + Sync {
    /// Insert a block. Returns `false` when the pair was already
    /// blocked (duplicate insert is a no-op).
    async fn create(&self, block: &Block) -> RepoResult<bool>;

    /// Remove a block. Returns whether a row was deleted.
    async fn delete(&self, blocker_id: Snowflake, blocked_id: Snowflake) -> RepoResult<bool>;

    /// Blocks between two profiles, in either direction
    async fn find_between(&self, a: Snowflake, b: Snowflake) -> RepoResult<Vec<Block>>;

    /// IDs a profile has blocked
    async fn blocked_ids(&self, blocker_id: Snowflake) -> RepoResult<Vec<Snowflake>>;
}

// ============================================================================
// Report Repository
// ============================================================================

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert a report
    async fn create(&self, report: &Report) -> RepoResult<()>;

    /// Count distinct reporters for a profile
    async fn distinct_reporters(&self, reported_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Profile Directory
// ============================================================================

/// Read-mostly access to profile data owned by another system
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Fetch one profile
    async fn get_profile(&self, id: Snowflake) -> RepoResult<Option<ProfileRef>>;

    /// Fetch many profiles in one round trip
    async fn get_profiles(&self, ids: &[Snowflake]) -> RepoResult<Vec<ProfileRef>>;

    /// Deactivate a profile (moderation outcome)
    async fn deactivate(&self, id: Snowflake) -> RepoResult<()>;
}
