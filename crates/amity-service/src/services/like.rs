//! Like service - the directional like ledger
//!
//! Sending a like checks for the reciprocal like and creates the match
//! when both directions exist. Duplicate detection relies on storage
//! constraints rather than check-then-act, so concurrent mutual likes
//! still produce exactly one match.

use amity_core::entities::Like;
use amity_core::events::domain_event::{LikeCreatedEvent, LikeRemovedEvent};
use amity_core::{DomainError, DomainEvent, Snowflake};
use tracing::{info, instrument};

use crate::dto::{LikeOutcome, LikeStatus};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::matches::MatchService;

/// Like service
pub struct LikeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LikeService<'a> {
    /// Create a new LikeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a like from one profile to another.
    ///
    /// Returns `DomainError::AlreadyLiked` when the ordered pair already
    /// exists. When the reciprocal like is present the match is created;
    /// a concurrent `DuplicateMatch` from the other direction is treated
    /// as success.
    #[instrument(skip(self))]
    pub async fn send_like(
        &self,
        sender_id: Snowflake,
        receiver_id: Snowflake,
    ) -> ServiceResult<LikeOutcome> {
        if sender_id == receiver_id {
            return Err(DomainError::SelfLike.into());
        }

        let receiver = self
            .ctx
            .profile_dir()
            .get_profile(receiver_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(receiver_id))?;

        if !receiver.is_active {
            return Err(ServiceError::validation("Profile is deactivated"));
        }

        let like = Like::new(sender_id, receiver_id);
        self.ctx.like_repo().create(&like).await?;

        info!(
            sender_id = %sender_id,
            receiver_id = %receiver_id,
            "Like created"
        );

        let event = DomainEvent::LikeCreated(LikeCreatedEvent::new(sender_id, receiver_id));
        self.ctx
            .publisher()
            .publish_to_user(receiver_id, &event)
            .await
            .ok();

        // Mutual pair: promote to a match
        if self.ctx.like_repo().exists(receiver_id, sender_id).await? {
            let match_service = MatchService::new(self.ctx);
            return match match_service.create_match(sender_id, receiver_id).await {
                Ok(m) => Ok(LikeOutcome {
                    matched: true,
                    match_id: Some(m.id),
                }),
                Err(ServiceError::Domain(DomainError::DuplicateMatch)) => {
                    // The other direction won the race; the pair is matched either way
                    let existing = self
                        .ctx
                        .match_repo()
                        .find_pair(sender_id, receiver_id)
                        .await?;
                    Ok(LikeOutcome {
                        matched: true,
                        match_id: existing.map(|m| m.id),
                    })
                }
                Err(e) => Err(e),
            };
        }

        Ok(LikeOutcome {
            matched: false,
            match_id: None,
        })
    }

    /// Remove a like. Never cascades to an existing match.
    #[instrument(skip(self))]
    pub async fn remove_like(
        &self,
        sender_id: Snowflake,
        receiver_id: Snowflake,
    ) -> ServiceResult<()> {
        let deleted = self.ctx.like_repo().delete(sender_id, receiver_id).await?;
        if !deleted {
            return Err(DomainError::LikeNotFound.into());
        }

        info!(
            sender_id = %sender_id,
            receiver_id = %receiver_id,
            "Like removed"
        );

        let event = DomainEvent::LikeRemoved(LikeRemovedEvent::new(sender_id, receiver_id));
        self.ctx
            .publisher()
            .publish_to_user(receiver_id, &event)
            .await
            .ok();

        Ok(())
    }

    /// Read-only like/match status between two profiles
    #[instrument(skip(self))]
    pub async fn check_like_status(
        &self,
        profile_id: Snowflake,
        other_id: Snowflake,
    ) -> ServiceResult<LikeStatus> {
        let liked = self.ctx.like_repo().exists(profile_id, other_id).await?;
        let matched = self
            .ctx
            .match_repo()
            .find_pair(profile_id, other_id)
            .await?
            .is_some();

        Ok(LikeStatus { liked, matched })
    }

    /// Likes a profile has sent, most recent first
    #[instrument(skip(self))]
    pub async fn likes_sent(&self, profile_id: Snowflake) -> ServiceResult<Vec<Like>> {
        self.ctx
            .like_repo()
            .find_sent(profile_id)
            .await
            .map_err(Into::into)
    }

    /// Likes a profile has received, most recent first
    #[instrument(skip(self))]
    pub async fn likes_received(&self, profile_id: Snowflake) -> ServiceResult<Vec<Like>> {
        self.ctx
            .like_repo()
            .find_received(profile_id)
            .await
            .map_err(Into::into)
    }
}
