//! Redis Pub/Sub publisher.
//!
//! Publishes domain events to Redis channels for distribution to open
//! conversation views and unread trackers.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::FeedChannel;
use amity_core::events::DomainEvent;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEvent {
    /// Event type name (e.g., "MESSAGE_CREATED", "MATCH_CREATED")
    pub event_type: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl FeedEvent {
    /// Create a new event from raw parts
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Wrap a domain event for transport
    pub fn from_domain(event: &DomainEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_type: event.event_type().to_string(),
            data: serde_json::to_value(event)?,
        })
    }

    /// Recover the domain event from the payload
    pub fn to_domain(&self) -> Result<DomainEvent, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel
    pub async fn publish(&self, channel: &FeedChannel, event: &FeedEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }

    /// Publish to multiple channels
    pub async fn publish_many(
        &self,
        channels: &[FeedChannel],
        event: &FeedEvent,
    ) -> RedisResult<u32> {
        let payload = event.to_json()?;
        let mut total_receivers = 0;
        let mut conn = self.pool.get().await?;

        for channel in channels {
            let channel_name = channel.name();
            let receivers: u32 = conn.publish(&channel_name, &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            channels = channels.len(),
            event_type = %event.event_type,
            total_receivers = total_receivers,
            "Published event to multiple channels"
        );

        Ok(total_receivers)
    }
}

/// Convenience methods for domain event fan-out
impl Publisher {
    /// Publish a domain event to its match channel.
    ///
    /// Events without a match scope are ignored.
    pub async fn publish_to_match(&self, event: &DomainEvent) -> RedisResult<u32> {
        let Some(match_id) = event.match_id() else {
            return Ok(0);
        };

        let feed_event = FeedEvent::from_domain(event)?;
        self.publish(&FeedChannel::match_channel(match_id), &feed_event)
            .await
    }

    /// Publish a domain event to a profile's channel
    pub async fn publish_to_user(
        &self,
        profile_id: amity_core::Snowflake,
        event: &DomainEvent,
    ) -> RedisResult<u32> {
        let feed_event = FeedEvent::from_domain(event)?;
        self.publish(&FeedChannel::user(profile_id), &feed_event).await
    }

    /// Publish a domain event to the channels of several profiles
    pub async fn publish_to_users(
        &self,
        profile_ids: &[amity_core::Snowflake],
        event: &DomainEvent,
    ) -> RedisResult<u32> {
        let feed_event = FeedEvent::from_domain(event)?;
        let channels: Vec<FeedChannel> =
            profile_ids.iter().map(|&id| FeedChannel::user(id)).collect();
        self.publish_many(&channels, &feed_event).await
    }
}
