//! Match entity - the bidirectional relationship created from mutual likes

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A match between two profiles, created exactly once when both
/// directional likes exist.
///
/// The `(user1_id, user2_id)` pair is unordered for lookup purposes:
/// queries must check both orderings. Matches are monotonic - once
/// created they are never deleted, even if a like is later removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: Snowflake,
    pub user1_id: Snowflake,
    pub user2_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Create a new Match
    pub fn new(id: Snowflake, user1_id: Snowflake, user2_id: Snowflake) -> Self {
        Self {
            id,
            user1_id,
            user2_id,
            created_at: Utc::now(),
        }
    }

    /// Check whether a profile is one of the two participants
    #[inline]
    pub fn involves(&self, profile_id: Snowflake) -> bool {
        self.user1_id == profile_id || self.user2_id == profile_id
    }

    /// Check whether this match is between the given (unordered) pair
    #[inline]
    pub fn is_pair(&self, a: Snowflake, b: Snowflake) -> bool {
        (self.user1_id == a && self.user2_id == b) || (self.user1_id == b && self.user2_id == a)
    }

    /// Get the other participant relative to a viewer.
    ///
    /// Returns `None` if the viewer is not a participant.
    pub fn other_participant(&self, viewer_id: Snowflake) -> Option<Snowflake> {
        if self.user1_id == viewer_id {
            Some(self.user2_id)
        } else if self.user2_id == viewer_id {
            Some(self.user1_id)
        } else {
            None
        }
    }
}
