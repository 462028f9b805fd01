//! Conversation view - session-local model of one open conversation
//!
//! The feed is at-least-once and unordered, so the view reconciles by
//! message ID: inserts deduplicate, read receipts apply to whatever is
//! present, deletes drop rows, and display order is always
//! `(created_at, id)` regardless of delivery order. Storage stays the
//! source of truth; a feed failure is recovered by resubscribing and
//! re-fetching everything.

use amity_core::entities::Message;
use amity_core::events::domain_event::MessageCreatedEvent;
use amity_core::{DomainError, DomainEvent, Snowflake};
use amity_feed::{FeedChannel, FeedSubscription, Subscriber};
use chrono::Utc;
use tracing::instrument;

use super::context::ServiceContext;
use super::conversation::ConversationService;
use super::error::ServiceResult;

/// Session-local model of one open conversation
#[derive(Debug)]
pub struct ConversationView {
    match_id: Snowflake,
    viewer_id: Snowflake,
    messages: Vec<Message>,
}

impl ConversationView {
    /// Open a conversation: purge expired messages, fetch the backlog,
    /// record read receipts, and subscribe to the match channel.
    #[instrument(skip(ctx, subscriber))]
    pub async fn open(
        ctx: &ServiceContext,
        subscriber: &Subscriber,
        match_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<(Self, FeedSubscription)> {
        let service = ConversationService::new(ctx);

        service.purge_expired(match_id, Utc::now()).await?;
        let messages = service.get_messages(match_id, viewer_id).await?;
        let mut view = Self::from_backlog(match_id, viewer_id, messages);

        let read_ids = service.mark_messages_read(match_id, viewer_id).await?;
        view.apply_read(&read_ids, Utc::now());

        let subscription = subscriber
            .subscribe_feed(FeedChannel::match_channel(match_id))
            .await
            .map_err(|e| DomainError::FeedError(e.to_string()))?;

        Ok((view, subscription))
    }

    /// Recover from a feed error: resubscribe and fall back to a full
    /// re-fetch so any events lost in the gap are reconciled.
    #[instrument(skip(self, ctx, subscriber))]
    pub async fn recover(
        &mut self,
        ctx: &ServiceContext,
        subscriber: &Subscriber,
    ) -> ServiceResult<FeedSubscription> {
        let subscription = subscriber
            .subscribe_feed(FeedChannel::match_channel(self.match_id))
            .await
            .map_err(|e| DomainError::FeedError(e.to_string()))?;

        let messages = ConversationService::new(ctx)
            .get_messages(self.match_id, self.viewer_id)
            .await?;
        self.replace_all(messages);

        Ok(subscription)
    }

    /// Build a view from a fetched backlog
    pub fn from_backlog(match_id: Snowflake, viewer_id: Snowflake, messages: Vec<Message>) -> Self {
        let mut view = Self {
            match_id,
            viewer_id,
            messages: Vec::with_capacity(messages.len()),
        };
        for message in messages {
            view.insert(message);
        }
        view
    }

    /// The match this view is scoped to
    pub fn match_id(&self) -> Snowflake {
        self.match_id
    }

    /// The profile viewing the conversation
    pub fn viewer_id(&self) -> Snowflake {
        self.viewer_id
    }

    /// Messages in display order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages still unread for the viewer
    pub fn unread_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.is_unread_for(self.viewer_id))
            .count()
    }

    /// Apply one feed event to the view.
    ///
    /// Events scoped to another match are ignored. Returns whether the
    /// view changed.
    pub fn apply(&mut self, event: &DomainEvent) -> bool {
        if event.match_id() != Some(self.match_id) {
            return false;
        }

        match event {
            DomainEvent::MessageCreated(e) => self.apply_insert(e),
            DomainEvent::MessagesRead(e) => {
                self.apply_read(&e.message_ids, e.read_at) > 0
            }
            DomainEvent::MessageDeleted(e) => self.remove_ids(std::slice::from_ref(&e.message_id)) > 0,
            DomainEvent::MessagesPurged(e) => self.remove_ids(&e.message_ids) > 0,
            _ => false,
        }
    }

    /// Replace the whole message set (full re-fetch)
    pub fn replace_all(&mut self, messages: Vec<Message>) {
        self.messages.clear();
        for message in messages {
            self.insert(message);
        }
    }

    fn apply_insert(&mut self, event: &MessageCreatedEvent) -> bool {
        if self.contains(event.message_id) {
            return false;
        }
        self.insert(Message {
            id: event.message_id,
            match_id: event.match_id,
            sender_id: event.sender_id,
            content: event.content.clone(),
            kind: event.kind,
            created_at: event.created_at,
            read_at: None,
        });
        true
    }

    fn apply_read(&mut self, ids: &[Snowflake], read_at: chrono::DateTime<chrono::Utc>) -> usize {
        let mut updated = 0;
        for message in &mut self.messages {
            if ids.contains(&message.id) && message.read_at.is_none() {
                message.mark_read(read_at);
                updated += 1;
            }
        }
        updated
    }

    fn remove_ids(&mut self, ids: &[Snowflake]) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !ids.contains(&m.id));
        before - self.messages.len()
    }

    fn contains(&self, id: Snowflake) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }

    fn insert(&mut self, message: Message) {
        if self.contains(message.id) {
            return;
        }
        let key = (message.created_at, message.id);
        let pos = self
            .messages
            .partition_point(|m| (m.created_at, m.id) < key);
        self.messages.insert(pos, message);
    }
}
