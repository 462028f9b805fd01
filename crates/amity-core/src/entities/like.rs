//! Like entity - a one-directional expression of interest

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A directional like from one profile toward another.
///
/// At most one row exists per ordered `(sender_id, receiver_id)` pair;
/// the storage layer enforces this with a composite primary key. A like
/// is immutable once created except for deletion (un-like).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    pub sender_id: Snowflake,
    pub receiver_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Like {
    /// Create a new Like
    pub fn new(sender_id: Snowflake, receiver_id: Snowflake) -> Self {
        Self {
            sender_id,
            receiver_id,
            created_at: Utc::now(),
        }
    }

    /// Check whether this like is the reciprocal of another
    #[inline]
    pub fn is_reciprocal_of(&self, other: &Like) -> bool {
        self.sender_id == other.receiver_id && self.receiver_id == other.sender_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reciprocal() {
        let a = Snowflake::new(1);
        let b = Snowflake::new(2);

        let forward = Like::new(a, b);
        let backward = Like::new(b, a);
        assert!(forward.is_reciprocal_of(&backward));
        assert!(!forward.is_reciprocal_of(&forward));
    }
}
