//! Unread tracker - per-session unread counts
//!
//! Counts here are a cache, never the truth: they are seeded from one
//! aggregate query at login and nudged by feed events afterwards. Any
//! doubt is resolved by re-counting from storage.

use std::collections::HashMap;

use amity_core::Snowflake;
use parking_lot::RwLock;

/// Per-match unread counts for one session
#[derive(Debug, Default)]
pub struct UnreadTracker {
    counts: RwLock<HashMap<Snowflake, i64>>,
}

impl UnreadTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all counts from an aggregate query. Zero counts are
    /// dropped rather than stored.
    pub fn seed(&self, counts: Vec<(Snowflake, i64)>) {
        let mut map = self.counts.write();
        map.clear();
        map.extend(counts.into_iter().filter(|(_, n)| *n > 0));
    }

    /// Record one new unread message in a match
    pub fn increment(&self, match_id: Snowflake) {
        *self.counts.write().entry(match_id).or_insert(0) += 1;
    }

    /// Remove one unread message from a match, never going negative
    pub fn decrement(&self, match_id: Snowflake) {
        let mut map = self.counts.write();
        if let Some(count) = map.get_mut(&match_id) {
            *count -= 1;
            if *count <= 0 {
                map.remove(&match_id);
            }
        }
    }

    /// Clear a match's count (conversation opened)
    pub fn clear(&self, match_id: Snowflake) {
        self.counts.write().remove(&match_id);
    }

    /// Overwrite a match's count with a fresh value from storage
    pub fn set(&self, match_id: Snowflake, count: i64) {
        let mut map = self.counts.write();
        if count > 0 {
            map.insert(match_id, count);
        } else {
            map.remove(&match_id);
        }
    }

    /// Unread count for one match
    pub fn count(&self, match_id: Snowflake) -> i64 {
        self.counts.read().get(&match_id).copied().unwrap_or(0)
    }

    /// Total unread across all matches
    pub fn total(&self) -> i64 {
        self.counts.read().values().sum()
    }
}
