//! Service context - dependency container for services
//!
//! Holds all repositories, the feed publisher, and other dependencies
//! needed by services.

use std::sync::Arc;

use amity_core::traits::{
    BlockRepository, LikeRepository, MatchRepository, MessageRepository, ProfileDirectory,
    ReportRepository,
};
use amity_core::{RetentionPolicy, SnowflakeGenerator};
use amity_db::PgPool;
use amity_feed::{Publisher, SharedRedisPool};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - The profile directory collaborator
/// - The realtime feed publisher
/// - Snowflake generator for ID generation
/// - The message retention policy
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Redis pool
    redis_pool: SharedRedisPool,

    // Repositories
    like_repo: Arc<dyn LikeRepository>,
    match_repo: Arc<dyn MatchRepository>,
    message_repo: Arc<dyn MessageRepository>,
    block_repo: Arc<dyn BlockRepository>,
    report_repo: Arc<dyn ReportRepository>,
    profile_dir: Arc<dyn ProfileDirectory>,

    // Pub/Sub
    publisher: Publisher,

    // Services
    snowflake_generator: Arc<SnowflakeGenerator>,
    retention: RetentionPolicy,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        redis_pool: SharedRedisPool,
        like_repo: Arc<dyn LikeRepository>,
        match_repo: Arc<dyn MatchRepository>,
        message_repo: Arc<dyn MessageRepository>,
        block_repo: Arc<dyn BlockRepository>,
        report_repo: Arc<dyn ReportRepository>,
        profile_dir: Arc<dyn ProfileDirectory>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        retention: RetentionPolicy,
    ) -> Self {
        // Clone the inner RedisPool from the Arc
        let publisher = Publisher::new((*redis_pool).clone());

        Self {
            pool,
            redis_pool,
            like_repo,
            match_repo,
            message_repo,
            block_repo,
            report_repo,
            profile_dir,
            publisher,
            snowflake_generator,
            retention,
        }
    }

    // === Pools ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the Redis connection pool
    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    // === Repositories ===

    /// Get the like repository
    pub fn like_repo(&self) -> &dyn LikeRepository {
        self.like_repo.as_ref()
    }

    /// Get the match repository
    pub fn match_repo(&self) -> &dyn MatchRepository {
        self.match_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the block repository
    pub fn block_repo(&self) -> &dyn BlockRepository {
        self.block_repo.as_ref()
    }

    /// Get the report repository
    pub fn report_repo(&self) -> &dyn ReportRepository {
        self.report_repo.as_ref()
    }

    /// Get the profile directory
    pub fn profile_dir(&self) -> &dyn ProfileDirectory {
        self.profile_dir.as_ref()
    }

    // === Pub/Sub ===

    /// Get the realtime feed publisher
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    // === Services ===

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> amity_core::Snowflake {
        self.snowflake_generator.generate()
    }

    /// Get the message retention policy
    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("redis_pool", &"SharedRedisPool")
            .field("repositories", &"...")
            .field("retention", &self.retention)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    like_repo: Option<Arc<dyn LikeRepository>>,
    match_repo: Option<Arc<dyn MatchRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    block_repo: Option<Arc<dyn BlockRepository>>,
    report_repo: Option<Arc<dyn ReportRepository>>,
    profile_dir: Option<Arc<dyn ProfileDirectory>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    retention: RetentionPolicy,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            redis_pool: None,
            like_repo: None,
            match_repo: None,
            message_repo: None,
            block_repo: None,
            report_repo: None,
            profile_dir: None,
            snowflake_generator: None,
            retention: RetentionPolicy::default(),
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn like_repo(mut self, repo: Arc<dyn LikeRepository>) -> Self {
        self.like_repo = Some(repo);
        self
    }

    pub fn match_repo(mut self, repo: Arc<dyn MatchRepository>) -> Self {
        self.match_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn block_repo(mut self, repo: Arc<dyn BlockRepository>) -> Self {
        self.block_repo = Some(repo);
        self
    }

    pub fn report_repo(mut self, repo: Arc<dyn ReportRepository>) -> Self {
        self.report_repo = Some(repo);
        self
    }

    pub fn profile_dir(mut self, dir: Arc<dyn ProfileDirectory>) -> Self {
        self.profile_dir = Some(dir);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool.ok_or_else(|| super::error::ServiceError::validation("pool is required"))?,
            self.redis_pool.ok_or_else(|| super::error::ServiceError::validation("redis_pool is required"))?,
            self.like_repo.ok_or_else(|| super::error::ServiceError::validation("like_repo is required"))?,
            self.match_repo.ok_or_else(|| super::error::ServiceError::validation("match_repo is required"))?,
            self.message_repo.ok_or_else(|| super::error::ServiceError::validation("message_repo is required"))?,
            self.block_repo.ok_or_else(|| super::error::ServiceError::validation("block_repo is required"))?,
            self.report_repo.ok_or_else(|| super::error::ServiceError::validation("report_repo is required"))?,
            self.profile_dir.ok_or_else(|| super::error::ServiceError::validation("profile_dir is required"))?,
            self.snowflake_generator.ok_or_else(|| super::error::ServiceError::validation("snowflake_generator is required"))?,
            self.retention,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
