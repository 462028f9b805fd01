//! Redis Pub/Sub module.
//!
//! Provides publish/subscribe functionality for realtime event distribution.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{FeedChannel, MATCH_CHANNEL_PREFIX, USER_CHANNEL_PREFIX};
pub use publisher::{FeedEvent, Publisher};
pub use subscriber::{
    FeedDelivery, FeedNotice, Subscriber, SubscriberConfig, SubscriberError, SubscriberResult,
};

pub(crate) use subscriber::SubscriberCommand;
