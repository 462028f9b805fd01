//! Match service - the match registry
//!
//! Matches are monotonic: once created for a pair they are never
//! deleted, even when a like is removed or a block is placed. The
//! unordered-pair uniqueness lives in the database, so concurrent
//! creation from either direction yields exactly one row.

use std::collections::HashMap;

use amity_core::entities::Match;
use amity_core::events::domain_event::MatchCreatedEvent;
use amity_core::{DomainEvent, Snowflake};
use tracing::{info, instrument};

use crate::dto::{LastMessage, MatchSummary};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Match service
pub struct MatchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MatchService<'a> {
    /// Create a new MatchService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a match for a pair of profiles.
    ///
    /// Returns `DomainError::DuplicateMatch` when a match already exists
    /// for the unordered pair; callers racing on mutual likes swallow
    /// that as success.
    #[instrument(skip(self))]
    pub async fn create_match(&self, a: Snowflake, b: Snowflake) -> ServiceResult<Match> {
        let m = Match::new(self.ctx.generate_id(), a, b);
        self.ctx.match_repo().create(&m).await?;

        info!(
            match_id = %m.id,
            user1_id = %a,
            user2_id = %b,
            "Match created"
        );

        let event = DomainEvent::MatchCreated(MatchCreatedEvent::new(m.id, a, b));
        self.ctx
            .publisher()
            .publish_to_users(&[a, b], &event)
            .await
            .ok();

        Ok(m)
    }

    /// Find the match between two profiles, checking both orderings
    #[instrument(skip(self))]
    pub async fn find_match(&self, a: Snowflake, b: Snowflake) -> ServiceResult<Option<Match>> {
        self.ctx
            .match_repo()
            .find_pair(a, b)
            .await
            .map_err(Into::into)
    }

    /// List a profile's matches, most recent first, enriched with the
    /// other participant's profile, the latest message, and the
    /// viewer's unread count.
    #[instrument(skip(self))]
    pub async fn list_matches(&self, profile_id: Snowflake) -> ServiceResult<Vec<MatchSummary>> {
        let matches = self.ctx.match_repo().find_by_profile(profile_id).await?;
        if matches.is_empty() {
            return Ok(Vec::new());
        }

        let other_ids: Vec<Snowflake> = matches
            .iter()
            .filter_map(|m| m.other_participant(profile_id))
            .collect();
        let profiles: HashMap<Snowflake, _> = self
            .ctx
            .profile_dir()
            .get_profiles(&other_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let match_ids: Vec<Snowflake> = matches.iter().map(|m| m.id).collect();
        let unread: HashMap<Snowflake, i64> = self
            .ctx
            .message_repo()
            .count_unread_per_match(profile_id, &match_ids)
            .await?
            .into_iter()
            .collect();

        let mut summaries = Vec::with_capacity(matches.len());
        for m in matches {
            let other = m
                .other_participant(profile_id)
                .and_then(|id| profiles.get(&id).cloned());
            let last_message = self
                .ctx
                .message_repo()
                .latest_by_match(m.id)
                .await?
                .as_ref()
                .map(LastMessage::from_message);

            summaries.push(MatchSummary {
                match_id: m.id,
                created_at: m.created_at,
                other,
                last_message,
                unread: unread.get(&m.id).copied().unwrap_or(0),
            });
        }

        Ok(summaries)
    }

    /// IDs of all matches involving a profile
    #[instrument(skip(self))]
    pub async fn match_ids(&self, profile_id: Snowflake) -> ServiceResult<Vec<Snowflake>> {
        self.ctx
            .match_repo()
            .ids_by_profile(profile_id)
            .await
            .map_err(Into::into)
    }
}
