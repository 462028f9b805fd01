//! Per-channel subscription handles.
//!
//! A `FeedSubscription` is a self-contained handle for one channel: it
//! owns its receiver and carries its lifecycle state, so consumers never
//! reach into shared mutable state to find out what they are subscribed
//! to. Dropping the handle without closing it leaves the Redis
//! subscription in place for other handles on the same channel.
//!
//! Any gap in delivery — a transport interruption or a lagged receiver —
//! moves the handle to `Error`: events were lost and cannot be replayed,
//! so the consumer's contract is to resubscribe and re-fetch from
//! storage rather than keep reading around the hole.

use tokio::sync::{broadcast, mpsc};

use crate::pubsub::{
    FeedChannel, FeedEvent, FeedNotice, Subscriber, SubscriberCommand, SubscriberError,
    SubscriberResult,
};
use crate::FeedDelivery;

/// Lifecycle of a subscription handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Handle created, no subscribe request sent yet
    Unsubscribed,
    /// Subscribe request in flight
    Subscribing,
    /// Receiving events
    Active,
    /// Delivery gap or transport failure; resubscribe and re-fetch
    Error,
    /// Explicitly closed
    Closed,
}

/// Handle for a single channel subscription
pub struct FeedSubscription {
    channel: FeedChannel,
    state: SubscriptionState,
    rx: broadcast::Receiver<FeedDelivery>,
    control: mpsc::Sender<SubscriberCommand>,
}

impl Subscriber {
    /// Subscribe to one channel and get a handle scoped to it
    pub async fn subscribe_feed(&self, channel: FeedChannel) -> SubscriberResult<FeedSubscription> {
        let mut sub = FeedSubscription {
            channel: channel.clone(),
            state: SubscriptionState::Unsubscribed,
            rx: self.receiver(),
            control: self.control_tx(),
        };

        sub.state = SubscriptionState::Subscribing;
        match self.subscribe(channel).await {
            Ok(()) => {
                sub.state = SubscriptionState::Active;
                Ok(sub)
            }
            Err(e) => {
                sub.state = SubscriptionState::Error;
                Err(e)
            }
        }
    }
}

impl FeedSubscription {
    /// The channel this handle is scoped to
    #[must_use]
    pub fn channel(&self) -> &FeedChannel {
        &self.channel
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// Whether the handle can still receive events
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == SubscriptionState::Active
    }

    /// Receive the next event on this channel.
    ///
    /// Deliveries for other channels on the shared connection are
    /// skipped. Returns `None` once the handle leaves `Active`: closed,
    /// listener gone, or a delivery gap (lag or transport interruption)
    /// that moved it to `Error` — check `state()` and re-fetch.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        if self.state != SubscriptionState::Active {
            return None;
        }

        loop {
            match self.rx.recv().await {
                Ok(delivery) if delivery.channel == self.channel => match delivery.notice {
                    FeedNotice::Event(event) => return Some(event),
                    FeedNotice::Interrupted => {
                        tracing::warn!(
                            channel = %self.channel,
                            "Feed interrupted, events may be lost"
                        );
                        self.state = SubscriptionState::Error;
                        return None;
                    }
                },
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        channel = %self.channel,
                        skipped = skipped,
                        "Subscription lagged, events dropped"
                    );
                    self.state = SubscriptionState::Error;
                    return None;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    self.state = SubscriptionState::Error;
                    return None;
                }
            }
        }
    }

    /// Close the handle and unsubscribe from the channel
    pub async fn close(&mut self) -> SubscriberResult<()> {
        if self.state == SubscriptionState::Closed {
            return Ok(());
        }

        let result = self
            .control
            .send(SubscriberCommand::Unsubscribe(self.channel.clone()))
            .await
            .map_err(|_| SubscriberError::ChannelClosed);

        self.state = SubscriptionState::Closed;
        result
    }
}

impl std::fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("channel", &self.channel)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amity_core::events::domain_event::MatchCreatedEvent;
    use amity_core::{DomainEvent, Snowflake};

    fn event_delivery(channel: FeedChannel) -> FeedDelivery {
        let domain = DomainEvent::MatchCreated(MatchCreatedEvent::new(
            Snowflake::new(10),
            Snowflake::new(1),
            Snowflake::new(2),
        ));
        FeedDelivery {
            channel,
            notice: FeedNotice::Event(FeedEvent::from_domain(&domain).unwrap()),
        }
    }

    fn handle_with(
        channel: FeedChannel,
        state: SubscriptionState,
        capacity: usize,
    ) -> (
        FeedSubscription,
        broadcast::Sender<FeedDelivery>,
        mpsc::Receiver<SubscriberCommand>,
    ) {
        let (broadcast_tx, rx) = broadcast::channel(capacity);
        let (control, control_rx) = mpsc::channel(8);
        let sub = FeedSubscription {
            channel,
            state,
            rx,
            control,
        };
        (sub, broadcast_tx, control_rx)
    }

    #[tokio::test]
    async fn test_recv_requires_active_state() {
        let channel = FeedChannel::match_channel(Snowflake::new(1));
        let (mut sub, _tx, _rx) = handle_with(channel.clone(), SubscriptionState::Unsubscribed, 8);
        assert!(sub.recv().await.is_none());

        let (mut sub, _tx, _rx) = handle_with(channel, SubscriptionState::Closed, 8);
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_recv_transitions_to_error_when_listener_gone() {
        let channel = FeedChannel::match_channel(Snowflake::new(1));
        let (mut sub, tx, _rx) = handle_with(channel, SubscriptionState::Active, 8);
        drop(tx);

        assert!(sub.recv().await.is_none());
        assert_eq!(sub.state(), SubscriptionState::Error);
    }

    #[tokio::test]
    async fn test_recv_filters_other_channels() {
        let mine = FeedChannel::match_channel(Snowflake::new(1));
        let (mut sub, tx, _rx) = handle_with(mine.clone(), SubscriptionState::Active, 8);

        tx.send(event_delivery(FeedChannel::match_channel(Snowflake::new(2))))
            .unwrap();
        tx.send(event_delivery(mine)).unwrap();

        let event = sub.recv().await.unwrap();
        assert_eq!(event.event_type, "MATCH_CREATED");
        assert!(sub.is_active());
    }

    #[tokio::test]
    async fn test_interrupted_delivery_errors_the_handle() {
        let channel = FeedChannel::user(Snowflake::new(5));
        let (mut sub, tx, _rx) = handle_with(channel.clone(), SubscriptionState::Active, 8);

        tx.send(FeedDelivery {
            channel,
            notice: FeedNotice::Interrupted,
        })
        .unwrap();

        assert!(sub.recv().await.is_none());
        assert_eq!(sub.state(), SubscriptionState::Error);
        // An errored handle stays unusable
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_lagged_receiver_errors_instead_of_skipping() {
        let channel = FeedChannel::match_channel(Snowflake::new(1));
        let (mut sub, tx, _rx) = handle_with(channel.clone(), SubscriptionState::Active, 1);

        // Overflow the single-slot buffer so the receiver lags
        tx.send(event_delivery(channel.clone())).unwrap();
        tx.send(event_delivery(channel.clone())).unwrap();
        tx.send(event_delivery(channel)).unwrap();

        assert!(sub.recv().await.is_none());
        assert_eq!(sub.state(), SubscriptionState::Error);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let channel = FeedChannel::user(Snowflake::new(9));
        let (mut sub, tx, mut control_rx) = handle_with(channel, SubscriptionState::Active, 8);
        drop(tx);

        sub.close().await.unwrap();
        assert_eq!(sub.state(), SubscriptionState::Closed);

        // The unsubscribe command went out once
        assert!(matches!(
            control_rx.recv().await,
            Some(SubscriberCommand::Unsubscribe(_))
        ));

        // A second close does nothing
        sub.close().await.unwrap();
        assert!(control_rx.try_recv().is_err());
    }
}
