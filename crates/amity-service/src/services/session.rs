//! Session context - per-login state for one profile
//!
//! Constructed at login and torn down at logout; there is no global
//! mutable state. The session owns its unread tracker and a long-lived
//! subscription to the profile's user channel that keeps the tracker
//! current between conversation opens.

use amity_core::entities::BlockStatus;
use amity_core::{DomainError, DomainEvent, Snowflake};
use amity_feed::{FeedChannel, FeedSubscription, Subscriber};
use tracing::instrument;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::unread::UnreadTracker;
use super::view::ConversationView;

/// Per-session state for a logged-in profile
pub struct SessionContext {
    viewer_id: Snowflake,
    unread: UnreadTracker,
    subscription: FeedSubscription,
}

impl SessionContext {
    /// Start a session: seed unread counts from storage and subscribe
    /// to the profile's user channel.
    #[instrument(skip(ctx, subscriber))]
    pub async fn start(
        ctx: &ServiceContext,
        subscriber: &Subscriber,
        viewer_id: Snowflake,
    ) -> ServiceResult<Self> {
        let match_ids = ctx.match_repo().ids_by_profile(viewer_id).await?;
        let counts = ctx
            .message_repo()
            .count_unread_per_match(viewer_id, &match_ids)
            .await?;

        let unread = UnreadTracker::new();
        unread.seed(counts);

        let subscription = subscriber
            .subscribe_feed(FeedChannel::user(viewer_id))
            .await
            .map_err(|e| DomainError::FeedError(e.to_string()))?;

        Ok(Self {
            viewer_id,
            unread,
            subscription,
        })
    }

    /// The profile this session belongs to
    pub fn viewer_id(&self) -> Snowflake {
        self.viewer_id
    }

    /// The session's unread counts
    pub fn unread(&self) -> &UnreadTracker {
        &self.unread
    }

    /// Whether the session's feed subscription is still delivering
    pub fn is_live(&self) -> bool {
        self.subscription.is_active()
    }

    /// Receive the next event from the user channel and fold it into
    /// the unread tracker. Returns `None` when the subscription ends or
    /// hits a delivery gap; check `is_live()` and `recover` if not.
    pub async fn next_event(
        &mut self,
        ctx: &ServiceContext,
    ) -> ServiceResult<Option<DomainEvent>> {
        while let Some(feed_event) = self.subscription.recv().await {
            let Ok(event) = feed_event.to_domain() else { continue };

            if let Some(match_id) = Self::track(&self.unread, self.viewer_id, &event) {
                self.resync(ctx, match_id).await?;
            }
            return Ok(Some(event));
        }
        Ok(None)
    }

    /// Recover from a delivery gap: resubscribe to the user channel and
    /// reseed the unread counts from storage, since events lost in the
    /// gap cannot be replayed.
    #[instrument(skip(self, ctx, subscriber))]
    pub async fn recover(
        &mut self,
        ctx: &ServiceContext,
        subscriber: &Subscriber,
    ) -> ServiceResult<()> {
        self.subscription = subscriber
            .subscribe_feed(FeedChannel::user(self.viewer_id))
            .await
            .map_err(|e| DomainError::FeedError(e.to_string()))?;

        let match_ids = ctx.match_repo().ids_by_profile(self.viewer_id).await?;
        let counts = ctx
            .message_repo()
            .count_unread_per_match(self.viewer_id, &match_ids)
            .await?;
        self.unread.seed(counts);

        Ok(())
    }

    /// Fold one event into a tracker.
    ///
    /// Returns `Some(match_id)` when local arithmetic cannot stay
    /// honest and the count must be re-read from storage.
    pub fn track(
        unread: &UnreadTracker,
        viewer_id: Snowflake,
        event: &DomainEvent,
    ) -> Option<Snowflake> {
        match event {
            DomainEvent::MessageCreated(e) if e.sender_id != viewer_id => {
                unread.increment(e.match_id);
                None
            }
            DomainEvent::MessagesRead(e) if e.reader_id == viewer_id => {
                unread.clear(e.match_id);
                None
            }
            DomainEvent::MessageDeleted(e) if e.sender_id != viewer_id => {
                unread.decrement(e.match_id);
                None
            }
            // A purge may remove any mix of read and unread rows
            DomainEvent::MessagesPurged(e) => Some(e.match_id),
            _ => None,
        }
    }

    /// Re-read one match's unread count from storage
    #[instrument(skip(self, ctx))]
    pub async fn resync(&self, ctx: &ServiceContext, match_id: Snowflake) -> ServiceResult<()> {
        let count = ctx
            .message_repo()
            .count_unread(match_id, self.viewer_id)
            .await?;
        self.unread.set(match_id, count);
        Ok(())
    }

    /// Open a conversation for this session. Clears the match's unread
    /// entry in the same logical operation that records read receipts.
    #[instrument(skip(self, ctx, subscriber))]
    pub async fn open_conversation(
        &self,
        ctx: &ServiceContext,
        subscriber: &Subscriber,
        match_id: Snowflake,
    ) -> ServiceResult<(ConversationView, FeedSubscription)> {
        let opened = ConversationView::open(ctx, subscriber, match_id, self.viewer_id).await?;
        self.unread.clear(match_id);
        Ok(opened)
    }

    /// Block relationship between this session's profile and another
    #[instrument(skip(self, ctx))]
    pub async fn block_status(
        &self,
        ctx: &ServiceContext,
        other_id: Snowflake,
    ) -> ServiceResult<BlockStatus> {
        let blocks = ctx.block_repo().find_between(self.viewer_id, other_id).await?;

        let mut status = BlockStatus::default();
        for block in blocks {
            if block.blocker_id == self.viewer_id {
                status.i_blocked = true;
            } else {
                status.blocked_me = true;
            }
        }
        Ok(status)
    }

    /// Whether this session may message the other profile
    pub async fn can_message(
        &self,
        ctx: &ServiceContext,
        other_id: Snowflake,
    ) -> ServiceResult<bool> {
        Ok(!self.block_status(ctx, other_id).await?.any())
    }

    /// End the session and release the feed subscription
    pub async fn close(mut self) -> ServiceResult<()> {
        self.subscription
            .close()
            .await
            .map_err(|e| DomainError::FeedError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("viewer_id", &self.viewer_id)
            .field("total_unread", &self.unread.total())
            .field("subscription", &self.subscription)
            .finish()
    }
}
