//! Retention sweeper entry point
//!
//! Run with:
//! ```bash
//! cargo run -p amity-sweeper
//! ```
//!
//! Configuration is loaded from environment variables (`DATABASE_URL`,
//! `REDIS_URL`, `MESSAGE_RETENTION_HOURS`, `SWEEP_INTERVAL_SECS`).

use std::sync::Arc;
use std::time::Duration;

use amity_common::{try_init_tracing, AppConfig, AppError};
use amity_core::{RetentionPolicy, SnowflakeGenerator};
use amity_db::{
    create_pool, PgBlockRepository, PgLikeRepository, PgMatchRepository, PgMessageRepository,
    PgProfileDirectory, PgReportRepository,
};
use amity_feed::{RedisPool, RedisPoolConfig};
use amity_service::{RetentionSweeper, ServiceContextBuilder};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Sweeper failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    info!("Starting retention sweeper...");

    let config = AppConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;

    info!(
        env = ?config.app.env,
        retention_hours = config.retention.hours,
        sweep_interval_secs = config.retention.sweep_interval_secs,
        "Configuration loaded"
    );

    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = amity_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Create Redis pool
    info!("Connecting to Redis...");
    let redis_pool = RedisPool::new(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Feed(e.to_string()))?;
    let shared_redis = Arc::new(redis_pool);
    info!("Redis connection established");

    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));
    let retention = RetentionPolicy::from_hours(config.retention.hours);

    let ctx = ServiceContextBuilder::new()
        .pool(pool.clone())
        .redis_pool(shared_redis)
        .like_repo(Arc::new(PgLikeRepository::new(pool.clone())))
        .match_repo(Arc::new(PgMatchRepository::new(pool.clone())))
        .message_repo(Arc::new(PgMessageRepository::new(pool.clone())))
        .block_repo(Arc::new(PgBlockRepository::new(pool.clone())))
        .report_repo(Arc::new(PgReportRepository::new(pool.clone())))
        .profile_dir(Arc::new(PgProfileDirectory::new(pool)))
        .snowflake_generator(snowflake_generator)
        .retention(retention)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let interval = Duration::from_secs(config.retention.sweep_interval_secs);
    RetentionSweeper::new(ctx, interval).run().await;

    Ok(())
}
