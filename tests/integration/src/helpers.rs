//! Test engine assembly
//!
//! Builds a `ServiceContext` over the in-memory repositories. The
//! database pool is lazy and the Redis publisher is best-effort, so no
//! external services are needed.

use std::sync::Arc;

use amity_core::entities::ProfileRef;
use amity_core::{RetentionPolicy, Snowflake, SnowflakeGenerator};
use amity_db::{create_lazy_pool, DatabaseConfig};
use amity_feed::{RedisPool, RedisPoolConfig};
use amity_service::{ServiceContext, ServiceContextBuilder};

use crate::fixtures::{
    MemoryBlockRepository, MemoryLikeRepository, MemoryMatchRepository, MemoryMessageRepository,
    MemoryProfileDirectory, MemoryReportRepository,
};

/// Fully wired engine over in-memory storage
pub struct TestEngine {
    pub ctx: ServiceContext,
    pub likes: Arc<MemoryLikeRepository>,
    pub matches: Arc<MemoryMatchRepository>,
    pub messages: Arc<MemoryMessageRepository>,
    pub blocks: Arc<MemoryBlockRepository>,
    pub reports: Arc<MemoryReportRepository>,
    pub profiles: Arc<MemoryProfileDirectory>,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_retention(RetentionPolicy::default())
    }

    pub fn with_retention(retention: RetentionPolicy) -> Self {
        let likes = Arc::new(MemoryLikeRepository::default());
        let matches = Arc::new(MemoryMatchRepository::default());
        let messages = Arc::new(MemoryMessageRepository::default());
        let blocks = Arc::new(MemoryBlockRepository::default());
        let reports = Arc::new(MemoryReportRepository::default());
        let profiles = Arc::new(MemoryProfileDirectory::default());

        let pool = create_lazy_pool(&DatabaseConfig::default()).expect("lazy pool");
        let redis_pool =
            Arc::new(RedisPool::new(RedisPoolConfig::default()).expect("redis pool config"));

        let ctx = ServiceContextBuilder::new()
            .pool(pool)
            .redis_pool(redis_pool)
            .like_repo(likes.clone())
            .match_repo(matches.clone())
            .message_repo(messages.clone())
            .block_repo(blocks.clone())
            .report_repo(reports.clone())
            .profile_dir(profiles.clone())
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(0)))
            .retention(retention)
            .build()
            .expect("service context");

        Self {
            ctx,
            likes,
            matches,
            messages,
            blocks,
            reports,
            profiles,
        }
    }

    /// Register an active profile and return its ID
    pub fn add_profile(&self, display_name: &str) -> Snowflake {
        let id = self.ctx.generate_id();
        self.profiles
            .insert(ProfileRef::new(id, display_name.to_string()));
        id
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}
