//! Conversation service - message operations within a match
//!
//! All operations verify participation explicitly: storage does not
//! enforce it. Send takes `&str` so a failed send leaves the caller's
//! buffer untouched.

use amity_core::entities::{Match, Message, MessageKind};
use amity_core::events::domain_event::{
    MessageCreatedEvent, MessageDeletedEvent, MessagesPurgedEvent, MessagesReadEvent,
};
use amity_core::{DomainError, DomainEvent, Snowflake};
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Conversation service
pub struct ConversationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConversationService<'a> {
    /// Create a new ConversationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load the match and verify the caller is a participant
    async fn require_participant(
        &self,
        match_id: Snowflake,
        profile_id: Snowflake,
    ) -> ServiceResult<Match> {
        let m = self
            .ctx
            .match_repo()
            .find_by_id(match_id)
            .await?
            .ok_or(DomainError::MatchNotFound(match_id))?;

        if !m.involves(profile_id) {
            return Err(DomainError::NotParticipant.into());
        }

        Ok(m)
    }

    /// Messages in a match, oldest first. Idempotent re-fetch.
    #[instrument(skip(self))]
    pub async fn get_messages(
        &self,
        match_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<Vec<Message>> {
        self.require_participant(match_id, viewer_id).await?;
        self.ctx
            .message_repo()
            .find_by_match(match_id)
            .await
            .map_err(Into::into)
    }

    /// Send a message into a match.
    ///
    /// Content is rejected when blank after trimming or past the length
    /// limit. The sender must be a participant, and sending is refused
    /// while a block exists in either direction.
    #[instrument(skip(self, content))]
    pub async fn send_message(
        &self,
        match_id: Snowflake,
        sender_id: Snowflake,
        content: &str,
        kind: MessageKind,
    ) -> ServiceResult<Message> {
        if content.trim().is_empty() {
            return Err(DomainError::EmptyContent.into());
        }
        if content.chars().count() > Message::MAX_CONTENT_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: Message::MAX_CONTENT_LENGTH,
            }
            .into());
        }

        let m = self.require_participant(match_id, sender_id).await?;

        // A block in either direction suspends the conversation; the
        // match itself stays.
        let other_id = m
            .other_participant(sender_id)
            .ok_or(DomainError::NotParticipant)?;
        let blocks = self.ctx.block_repo().find_between(sender_id, other_id).await?;
        if !blocks.is_empty() {
            return Err(ServiceError::permission_denied(
                "messaging a blocked profile",
            ));
        }

        let message = Message {
            id: self.ctx.generate_id(),
            match_id,
            sender_id,
            content: content.to_string(),
            kind,
            created_at: Utc::now(),
            read_at: None,
        };
        self.ctx.message_repo().create(&message).await?;

        info!(
            message_id = %message.id,
            match_id = %match_id,
            sender_id = %sender_id,
            "Message created"
        );

        let event = DomainEvent::MessageCreated(MessageCreatedEvent::from_message(&message));
        self.ctx.publisher().publish_to_match(&event).await.ok();
        self.ctx
            .publisher()
            .publish_to_users(&[m.user1_id, m.user2_id], &event)
            .await
            .ok();

        Ok(message)
    }

    /// Set read receipts on every unread message the viewer did not
    /// send. Idempotent: a second call updates nothing. Returns the IDs
    /// of messages updated.
    #[instrument(skip(self))]
    pub async fn mark_messages_read(
        &self,
        match_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<Vec<Snowflake>> {
        self.require_participant(match_id, viewer_id).await?;

        let read_at = Utc::now();
        let ids = self
            .ctx
            .message_repo()
            .mark_read(match_id, viewer_id, read_at)
            .await?;

        if !ids.is_empty() {
            debug!(
                match_id = %match_id,
                viewer_id = %viewer_id,
                count = ids.len(),
                "Messages marked read"
            );

            let event = DomainEvent::MessagesRead(MessagesReadEvent::new(
                match_id,
                viewer_id,
                ids.clone(),
                read_at,
            ));
            self.ctx.publisher().publish_to_match(&event).await.ok();
        }

        Ok(ids)
    }

    /// Delete one message, scoped to its sender
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        message_id: Snowflake,
        sender_id: Snowflake,
    ) -> ServiceResult<()> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if message.sender_id != sender_id {
            return Err(DomainError::NotMessageSender.into());
        }

        let deleted = self.ctx.message_repo().delete(message_id, sender_id).await?;
        if !deleted {
            // The retention sweep got there first
            return Err(DomainError::MessageNotFound(message_id).into());
        }

        info!(message_id = %message_id, match_id = %message.match_id, "Message deleted");

        let event = DomainEvent::MessageDeleted(MessageDeletedEvent::new(
            message_id,
            message.match_id,
            sender_id,
        ));
        self.ctx.publisher().publish_to_match(&event).await.ok();

        Ok(())
    }

    /// Hard-delete expired messages in one match. Idempotent; acts as
    /// the on-open backstop to the background sweep. Returns deleted IDs.
    #[instrument(skip(self))]
    pub async fn purge_expired(
        &self,
        match_id: Snowflake,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<Snowflake>> {
        let cutoff = self.ctx.retention().cutoff(now);
        let ids = self
            .ctx
            .message_repo()
            .delete_expired(match_id, cutoff)
            .await?;

        if !ids.is_empty() {
            debug!(match_id = %match_id, count = ids.len(), "Expired messages purged");

            let event =
                DomainEvent::MessagesPurged(MessagesPurgedEvent::new(match_id, ids.clone()));
            self.ctx.publisher().publish_to_match(&event).await.ok();
        }

        Ok(ids)
    }
}
