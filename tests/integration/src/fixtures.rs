//! In-memory repository implementations
//!
//! Each repository mirrors the constraints the SQL schema enforces:
//! the like table's ordered-pair primary key, the match table's
//! unordered-pair unique index, and the block table's insert-or-ignore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

use amity_core::entities::{Block, Like, Match, Message, ProfileRef, Report};
use amity_core::traits::{
    BlockRepository, LikeRepository, MatchRepository, MessageRepository, ProfileDirectory,
    RepoResult, ReportRepository,
};
use amity_core::{DomainError, Snowflake};

// ============================================================================
// Likes
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryLikeRepository {
    rows: Mutex<Vec<Like>>,
}

#[async_trait]
impl LikeRepository for MemoryLikeRepository {
    async fn create(&self, like: &Like) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        // Primary key on (sender_id, receiver_id)
        if rows
            .iter()
            .any(|l| l.sender_id == like.sender_id && l.receiver_id == like.receiver_id)
        {
            return Err(DomainError::AlreadyLiked);
        }
        rows.push(like.clone());
        Ok(())
    }

    async fn delete(&self, sender_id: Snowflake, receiver_id: Snowflake) -> RepoResult<bool> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|l| !(l.sender_id == sender_id && l.receiver_id == receiver_id));
        Ok(rows.len() < before)
    }

    async fn exists(&self, sender_id: Snowflake, receiver_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .rows
            .lock()
            .iter()
            .any(|l| l.sender_id == sender_id && l.receiver_id == receiver_id))
    }

    async fn find_sent(&self, sender_id: Snowflake) -> RepoResult<Vec<Like>> {
        let mut likes: Vec<Like> = self
            .rows
            .lock()
            .iter()
            .filter(|l| l.sender_id == sender_id)
            .cloned()
            .collect();
        likes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(likes)
    }

    async fn find_received(&self, receiver_id: Snowflake) -> RepoResult<Vec<Like>> {
        let mut likes: Vec<Like> = self
            .rows
            .lock()
            .iter()
            .filter(|l| l.receiver_id == receiver_id)
            .cloned()
            .collect();
        likes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(likes)
    }
}

// ============================================================================
// Matches
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryMatchRepository {
    rows: Mutex<Vec<Match>>,
}

#[async_trait]
impl MatchRepository for MemoryMatchRepository {
    async fn create(&self, m: &Match) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        // Unique on (LEAST(user1_id, user2_id), GREATEST(user1_id, user2_id))
        if rows.iter().any(|row| row.is_pair(m.user1_id, m.user2_id)) {
            return Err(DomainError::DuplicateMatch);
        }
        rows.push(m.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Match>> {
        Ok(self.rows.lock().iter().find(|m| m.id == id).cloned())
    }

    async fn find_pair(&self, a: Snowflake, b: Snowflake) -> RepoResult<Option<Match>> {
        Ok(self.rows.lock().iter().find(|m| m.is_pair(a, b)).cloned())
    }

    async fn find_by_profile(&self, profile_id: Snowflake) -> RepoResult<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .rows
            .lock()
            .iter()
            .filter(|m| m.involves(profile_id))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn ids_by_profile(&self, profile_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|m| m.involves(profile_id))
            .map(|m| m.id)
            .collect())
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryMessageRepository {
    rows: Mutex<Vec<Message>>,
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.rows.lock().push(message.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self.rows.lock().iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_match(&self, match_id: Snowflake) -> RepoResult<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .rows
            .lock()
            .iter()
            .filter(|m| m.match_id == match_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(messages)
    }

    async fn latest_by_match(&self, match_id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|m| m.match_id == match_id)
            .max_by_key(|m| (m.created_at, m.id))
            .cloned())
    }

    async fn mark_read(
        &self,
        match_id: Snowflake,
        viewer_id: Snowflake,
        read_at: DateTime<Utc>,
    ) -> RepoResult<Vec<Snowflake>> {
        let mut ids = Vec::new();
        for message in self.rows.lock().iter_mut() {
            if message.match_id == match_id
                && message.sender_id != viewer_id
                && message.read_at.is_none()
            {
                message.read_at = Some(read_at);
                ids.push(message.id);
            }
        }
        Ok(ids)
    }

    async fn delete(&self, id: Snowflake, sender_id: Snowflake) -> RepoResult<bool> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|m| !(m.id == id && m.sender_id == sender_id));
        Ok(rows.len() < before)
    }

    async fn delete_expired(
        &self,
        match_id: Snowflake,
        cutoff: DateTime<Utc>,
    ) -> RepoResult<Vec<Snowflake>> {
        let mut rows = self.rows.lock();
        let ids: Vec<Snowflake> = rows
            .iter()
            .filter(|m| m.match_id == match_id && m.created_at < cutoff)
            .map(|m| m.id)
            .collect();
        rows.retain(|m| !(m.match_id == match_id && m.created_at < cutoff));
        Ok(ids)
    }

    async fn delete_expired_all(
        &self,
        cutoff: DateTime<Utc>,
    ) -> RepoResult<Vec<(Snowflake, Snowflake)>> {
        let mut rows = self.rows.lock();
        let pairs: Vec<(Snowflake, Snowflake)> = rows
            .iter()
            .filter(|m| m.created_at < cutoff)
            .map(|m| (m.match_id, m.id))
            .collect();
        rows.retain(|m| m.created_at >= cutoff);
        Ok(pairs)
    }

    async fn count_unread(&self, match_id: Snowflake, viewer_id: Snowflake) -> RepoResult<i64> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|m| m.match_id == match_id && m.is_unread_for(viewer_id))
            .count() as i64)
    }

    async fn count_unread_per_match(
        &self,
        viewer_id: Snowflake,
        match_ids: &[Snowflake],
    ) -> RepoResult<Vec<(Snowflake, i64)>> {
        let rows = self.rows.lock();
        let mut counts: HashMap<Snowflake, i64> = HashMap::new();
        for message in rows.iter() {
            if match_ids.contains(&message.match_id) && message.is_unread_for(viewer_id) {
                *counts.entry(message.match_id).or_insert(0) += 1;
            }
        }
        // Matches with zero unread are omitted, as in the SQL GROUP BY
        Ok(counts.into_iter().collect())
    }
}

// ============================================================================
// Blocks
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryBlockRepository {
    rows: Mutex<Vec<Block>>,
}

#[async_trait]
impl BlockRepository for MemoryBlockRepository {
    async fn create(&self, block: &Block) -> RepoResult<bool> {
        let mut rows = self.rows.lock();
        // ON CONFLICT DO NOTHING
        if rows
            .iter()
            .any(|b| b.blocker_id == block.blocker_id && b.blocked_id == block.blocked_id)
        {
            return Ok(false);
        }
        rows.push(block.clone());
        Ok(true)
    }

    async fn delete(&self, blocker_id: Snowflake, blocked_id: Snowflake) -> RepoResult<bool> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|b| !(b.blocker_id == blocker_id && b.blocked_id == blocked_id));
        Ok(rows.len() < before)
    }

    async fn find_between(&self, a: Snowflake, b: Snowflake) -> RepoResult<Vec<Block>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|block| {
                (block.blocker_id == a && block.blocked_id == b)
                    || (block.blocker_id == b && block.blocked_id == a)
            })
            .cloned()
            .collect())
    }

    async fn blocked_ids(&self, blocker_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|b| b.blocker_id == blocker_id)
            .map(|b| b.blocked_id)
            .collect())
    }
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryReportRepository {
    rows: Mutex<Vec<Report>>,
}

#[async_trait]
impl ReportRepository for MemoryReportRepository {
    async fn create(&self, report: &Report) -> RepoResult<()> {
        self.rows.lock().push(report.clone());
        Ok(())
    }

    async fn distinct_reporters(&self, reported_id: Snowflake) -> RepoResult<i64> {
        let rows = self.rows.lock();
        let mut reporters: Vec<Snowflake> = rows
            .iter()
            .filter(|r| r.reported_id == reported_id)
            .map(|r| r.reporter_id)
            .collect();
        reporters.sort_unstable();
        reporters.dedup();
        Ok(reporters.len() as i64)
    }
}

// ============================================================================
// Profile directory
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryProfileDirectory {
    rows: Mutex<HashMap<Snowflake, ProfileRef>>,
}

impl MemoryProfileDirectory {
    /// Register a profile for the test
    pub fn insert(&self, profile: ProfileRef) {
        self.rows.lock().insert(profile.id, profile);
    }

    /// Whether a profile is still active
    pub fn is_active(&self, id: Snowflake) -> bool {
        self.rows.lock().get(&id).is_some_and(|p| p.is_active)
    }
}

#[async_trait]
impl ProfileDirectory for MemoryProfileDirectory {
    async fn get_profile(&self, id: Snowflake) -> RepoResult<Option<ProfileRef>> {
        Ok(self.rows.lock().get(&id).cloned())
    }

    async fn get_profiles(&self, ids: &[Snowflake]) -> RepoResult<Vec<ProfileRef>> {
        let rows = self.rows.lock();
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }

    async fn deactivate(&self, id: Snowflake) -> RepoResult<()> {
        self.rows
            .lock()
            .get_mut(&id)
            .map(|p| p.is_active = false)
            .ok_or(DomainError::ProfileNotFound(id))
    }
}
