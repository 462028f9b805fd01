//! Pub/Sub channel definitions.
//!
//! The feed carries exactly two channel scopes: one per match for open
//! conversations, and one per profile for its sessions.

use amity_core::Snowflake;

/// Channel prefix for match conversation events
pub const MATCH_CHANNEL_PREFIX: &str = "match:";
/// Channel prefix for profile-scoped events (matches, likes)
pub const USER_CHANNEL_PREFIX: &str = "user:";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedChannel {
    /// Events inside one match conversation
    Match(Snowflake),
    /// Events for a specific profile (all their sessions)
    User(Snowflake),
}

impl FeedChannel {
    /// Create a match channel
    #[must_use]
    pub fn match_channel(match_id: Snowflake) -> Self {
        Self::Match(match_id)
    }

    /// Create a user channel
    #[must_use]
    pub fn user(profile_id: Snowflake) -> Self {
        Self::User(profile_id)
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Match(id) => format!("{MATCH_CHANNEL_PREFIX}{id}"),
            Self::User(id) => format!("{USER_CHANNEL_PREFIX}{id}"),
        }
    }

    /// Parse a channel name back to a `FeedChannel`. Names outside the
    /// two feed scopes are not ours and yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(id_str) = name.strip_prefix(MATCH_CHANNEL_PREFIX) {
            return id_str.parse::<i64>().ok().map(|id| Self::Match(Snowflake::from(id)));
        }

        if let Some(id_str) = name.strip_prefix(USER_CHANNEL_PREFIX) {
            return id_str.parse::<i64>().ok().map(|id| Self::User(Snowflake::from(id)));
        }

        None
    }
}

impl std::fmt::Display for FeedChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
