//! # amity-feed
//!
//! Realtime change feed built on Redis Pub/Sub.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Publisher**: Fan-out of domain events to match and profile channels
//! - **Subscriptions**: Per-channel subscription handles with an explicit
//!   lifecycle, backed by a single shared listener connection
//!
//! Delivery is at-least-once and unordered: consumers reconcile by
//! message ID rather than assuming the feed mirrors storage exactly.
//!
//! ## Example
//!
//! ```ignore
//! use amity_feed::{FeedChannel, Publisher, RedisPool, RedisPoolConfig, Subscriber, SubscriberConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = Publisher::new(pool);
//!
//! let subscriber = Subscriber::connect(SubscriberConfig::default());
//! let mut sub = subscriber.subscribe_feed(FeedChannel::match_channel(match_id)).await?;
//! while let Some(event) = sub.recv().await {
//!     // reconcile local state by message ID
//! }
//! // recv() returned None: closed, or a gap — resubscribe and re-fetch
//! ```

pub mod pool;
pub mod pubsub;
pub mod subscription;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool};

// Re-export pubsub types
pub use pubsub::{
    FeedChannel, FeedDelivery, FeedEvent, FeedNotice, Publisher, Subscriber, SubscriberConfig,
    SubscriberError, SubscriberResult, MATCH_CHANNEL_PREFIX, USER_CHANNEL_PREFIX,
};

// Re-export subscription types
pub use subscription::{FeedSubscription, SubscriptionState};
