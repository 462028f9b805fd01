//! Redis Pub/Sub listener.
//!
//! One background task owns the subscribing connection and fans
//! deliveries out to `FeedSubscription` handles over a broadcast
//! channel. Delivery is at-least-once and unordered.
//!
//! A dropped Redis connection loses whatever was published while it was
//! down. The listener reconnects and re-subscribes on its own, but it
//! cannot replay the gap, so before reconnecting it broadcasts an
//! `Interrupted` notice on every tracked channel. Handles surface that
//! as an error and their consumers re-fetch from storage.

use crate::pubsub::{FeedChannel, FeedEvent};
use futures_util::StreamExt;
use redis::Client;
use std::collections::HashSet;
use tokio::sync::{broadcast, mpsc};

/// Error type for subscriber operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to parse event: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Channel closed")]
    ChannelClosed,

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for subscriber operations
pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// One delivery fanned out to subscription handles
#[derive(Debug, Clone)]
pub struct FeedDelivery {
    /// Channel the delivery belongs to
    pub channel: FeedChannel,
    /// What the channel is being told
    pub notice: FeedNotice,
}

/// Payload of a delivery
#[derive(Debug, Clone)]
pub enum FeedNotice {
    /// A published feed event
    Event(FeedEvent),
    /// The transport dropped; events for this channel may have been
    /// lost and the consumer must re-fetch from storage
    Interrupted,
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Redis connection URL
    pub redis_url: String,
    /// Channel buffer size for broadcast
    pub broadcast_buffer: usize,
    /// Reconnection delay in milliseconds
    pub reconnect_delay_ms: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

/// Commands from subscription handles to the listener task
#[derive(Debug)]
pub(crate) enum SubscriberCommand {
    Subscribe(FeedChannel),
    Unsubscribe(FeedChannel),
    Shutdown,
}

/// Owner of the subscribing Redis connection
pub struct Subscriber {
    broadcast_tx: broadcast::Sender<FeedDelivery>,
    control_tx: mpsc::Sender<SubscriberCommand>,
}

impl Subscriber {
    /// Start the background listener task
    pub fn connect(config: SubscriberConfig) -> Self {
        let (broadcast_tx, _) = broadcast::channel(config.broadcast_buffer);
        let (control_tx, control_rx) = mpsc::channel(32);

        // The tracked set lives with the listener task; handles talk to
        // it through the control channel only.
        tokio::spawn(Self::drive(config, broadcast_tx.clone(), control_rx));

        Self {
            broadcast_tx,
            control_tx,
        }
    }

    /// Reconnect loop around the listener
    async fn drive(
        config: SubscriberConfig,
        broadcast_tx: broadcast::Sender<FeedDelivery>,
        mut control_rx: mpsc::Receiver<SubscriberCommand>,
    ) {
        let mut tracked: HashSet<FeedChannel> = HashSet::new();

        loop {
            match Self::listen(&config, &mut tracked, &broadcast_tx, &mut control_rx).await {
                Ok(()) => {
                    tracing::info!("Feed listener shutting down");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Feed transport dropped, reconnecting");
                    Self::notify_interrupted(&tracked, &broadcast_tx);
                    tokio::time::sleep(tokio::time::Duration::from_millis(
                        config.reconnect_delay_ms,
                    ))
                    .await;
                }
            }
        }
    }

    /// Tell every tracked channel its events may have been lost
    fn notify_interrupted(
        tracked: &HashSet<FeedChannel>,
        broadcast_tx: &broadcast::Sender<FeedDelivery>,
    ) {
        for channel in tracked {
            let _ = broadcast_tx.send(FeedDelivery {
                channel: channel.clone(),
                notice: FeedNotice::Interrupted,
            });
        }
    }

    /// Run one connection until a transport error or shutdown.
    /// `Ok(())` means shutdown was requested.
    async fn listen(
        config: &SubscriberConfig,
        tracked: &mut HashSet<FeedChannel>,
        broadcast_tx: &broadcast::Sender<FeedDelivery>,
        control_rx: &mut mpsc::Receiver<SubscriberCommand>,
    ) -> SubscriberResult<()> {
        let client = Client::open(config.redis_url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;

        // Re-subscribe tracked channels after a reconnect
        for channel in tracked.iter() {
            pubsub.subscribe(channel.name()).await?;
        }

        tracing::info!("Feed listener connected");

        let mut stream = pubsub.on_message();

        loop {
            tokio::select! {
                msg = stream.next() => {
                    let Some(msg) = msg else {
                        return Err(SubscriberError::Connection(
                            "pub/sub stream ended".to_string(),
                        ));
                    };
                    if let Some(delivery) = Self::decode(&msg) {
                        // No receivers is fine
                        let _ = broadcast_tx.send(delivery);
                    }
                }

                cmd = control_rx.recv() => {
                    match cmd {
                        Some(SubscriberCommand::Subscribe(channel)) => {
                            // The stream borrows pubsub; release it first
                            drop(stream);
                            match pubsub.subscribe(channel.name()).await {
                                Ok(()) => {
                                    tracing::debug!(channel = %channel, "Subscribed");
                                    tracked.insert(channel);
                                }
                                Err(e) => {
                                    tracing::error!(channel = %channel, error = %e, "Subscribe failed");
                                }
                            }
                            stream = pubsub.on_message();
                        }
                        Some(SubscriberCommand::Unsubscribe(channel)) => {
                            drop(stream);
                            match pubsub.unsubscribe(channel.name()).await {
                                Ok(()) => {
                                    tracing::debug!(channel = %channel, "Unsubscribed");
                                    tracked.remove(&channel);
                                }
                                Err(e) => {
                                    tracing::error!(channel = %channel, error = %e, "Unsubscribe failed");
                                }
                            }
                            stream = pubsub.on_message();
                        }
                        Some(SubscriberCommand::Shutdown) | None => return Ok(()),
                    }
                }
            }
        }
    }

    /// Decode a raw Redis message into a delivery. Foreign channels and
    /// payloads that are not feed envelopes are dropped with a warning.
    fn decode(msg: &redis::Msg) -> Option<FeedDelivery> {
        let channel_name = msg.get_channel_name();
        let Some(channel) = FeedChannel::parse(channel_name) else {
            tracing::warn!(channel = %channel_name, "Message on unrecognized channel");
            return None;
        };

        let payload: String = msg.get_payload().unwrap_or_default();
        match serde_json::from_str::<FeedEvent>(&payload) {
            Ok(event) => Some(FeedDelivery {
                channel,
                notice: FeedNotice::Event(event),
            }),
            Err(e) => {
                tracing::warn!(channel = %channel, error = %e, "Undecodable feed payload");
                None
            }
        }
    }

    /// Ask the listener to subscribe to a channel
    pub async fn subscribe(&self, channel: FeedChannel) -> SubscriberResult<()> {
        self.control_tx
            .send(SubscriberCommand::Subscribe(channel))
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }

    /// Ask the listener to drop a channel
    pub async fn unsubscribe(&self, channel: FeedChannel) -> SubscriberResult<()> {
        self.control_tx
            .send(SubscriberCommand::Unsubscribe(channel))
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }

    /// Get a receiver for fanned-out deliveries
    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<FeedDelivery> {
        self.broadcast_tx.subscribe()
    }

    /// Clone of the control sender, for subscription handles
    pub(crate) fn control_tx(&self) -> mpsc::Sender<SubscriberCommand> {
        self.control_tx.clone()
    }

    /// Stop the listener task
    pub async fn shutdown(&self) -> SubscriberResult<()> {
        self.control_tx
            .send(SubscriberCommand::Shutdown)
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }
}
