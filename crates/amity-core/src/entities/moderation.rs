//! Moderation entities - blocks and reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A directional block from one profile toward another.
///
/// Blocking the same profile twice is a no-op at the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub blocker_id: Snowflake,
    pub blocked_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Block {
    pub fn new(blocker_id: Snowflake, blocked_id: Snowflake) -> Self {
        Self {
            blocker_id,
            blocked_id,
            created_at: Utc::now(),
        }
    }
}

/// Block relationship between two profiles, in both directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockStatus {
    /// The viewer has blocked the other profile
    pub i_blocked: bool,
    /// The other profile has blocked the viewer
    pub blocked_me: bool,
}

impl BlockStatus {
    /// Whether any block exists in either direction
    #[inline]
    pub fn any(&self) -> bool {
        self.i_blocked || self.blocked_me
    }
}

/// A report filed against a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: Snowflake,
    pub reporter_id: Snowflake,
    pub reported_id: Snowflake,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Distinct reporters required before a profile is deactivated
    pub const DEACTIVATION_THRESHOLD: i64 = 3;

    pub fn new(id: Snowflake, reporter_id: Snowflake, reported_id: Snowflake, reason: String) -> Self {
        Self {
            id,
            reporter_id,
            reported_id,
            reason,
            created_at: Utc::now(),
        }
    }
}
