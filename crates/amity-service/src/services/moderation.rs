//! Moderation service - blocks and reports
//!
//! Blocks are asymmetric and suspend messaging without touching the
//! match. Reports accumulate; three distinct reporters deactivate the
//! reported profile.

use amity_core::entities::{Block, BlockStatus, Report};
use amity_core::events::domain_event::{ProfileBlockedEvent, ProfileReportedEvent};
use amity_core::{DomainError, DomainEvent, Snowflake};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Block a profile. Blocking the same profile twice is a no-op
    /// success; returns whether a new block was recorded.
    #[instrument(skip(self))]
    pub async fn block(
        &self,
        blocker_id: Snowflake,
        blocked_id: Snowflake,
    ) -> ServiceResult<bool> {
        if blocker_id == blocked_id {
            return Err(DomainError::SelfBlock.into());
        }

        let block = Block::new(blocker_id, blocked_id);
        let created = self.ctx.block_repo().create(&block).await?;

        if created {
            info!(blocker_id = %blocker_id, blocked_id = %blocked_id, "Profile blocked");

            // Other sessions of the blocker pick this up and stop rendering
            // the conversation as writable
            let event =
                DomainEvent::ProfileBlocked(ProfileBlockedEvent::new(blocker_id, blocked_id));
            self.ctx
                .publisher()
                .publish_to_user(blocker_id, &event)
                .await
                .ok();
        }

        Ok(created)
    }

    /// Remove a block
    #[instrument(skip(self))]
    pub async fn unblock(
        &self,
        blocker_id: Snowflake,
        blocked_id: Snowflake,
    ) -> ServiceResult<()> {
        let deleted = self.ctx.block_repo().delete(blocker_id, blocked_id).await?;
        if !deleted {
            return Err(ServiceError::not_found("Block", blocked_id.to_string()));
        }

        info!(blocker_id = %blocker_id, blocked_id = %blocked_id, "Profile unblocked");
        Ok(())
    }

    /// Block relationship between two profiles, from the viewer's side
    #[instrument(skip(self))]
    pub async fn block_status(
        &self,
        viewer_id: Snowflake,
        other_id: Snowflake,
    ) -> ServiceResult<BlockStatus> {
        let blocks = self.ctx.block_repo().find_between(viewer_id, other_id).await?;

        let mut status = BlockStatus::default();
        for block in blocks {
            if block.blocker_id == viewer_id {
                status.i_blocked = true;
            } else {
                status.blocked_me = true;
            }
        }
        Ok(status)
    }

    /// Report a profile. Once three distinct reporters have filed, the
    /// reported profile is deactivated. Returns whether this report
    /// triggered the deactivation.
    #[instrument(skip(self, reason))]
    pub async fn report(
        &self,
        reporter_id: Snowflake,
        reported_id: Snowflake,
        reason: &str,
    ) -> ServiceResult<bool> {
        if reporter_id == reported_id {
            return Err(DomainError::SelfReport.into());
        }
        if reason.trim().is_empty() {
            return Err(ServiceError::validation("Report reason is required"));
        }

        let reported = self
            .ctx
            .profile_dir()
            .get_profile(reported_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(reported_id))?;

        let report = Report::new(
            self.ctx.generate_id(),
            reporter_id,
            reported_id,
            reason.trim().to_string(),
        );
        self.ctx.report_repo().create(&report).await?;

        let reporters = self.ctx.report_repo().distinct_reporters(reported_id).await?;
        let deactivate = reported.is_active && reporters >= Report::DEACTIVATION_THRESHOLD;

        if deactivate {
            self.ctx.profile_dir().deactivate(reported_id).await?;
            warn!(
                reported_id = %reported_id,
                reporters = reporters,
                "Profile deactivated after repeated reports"
            );
        }

        let event = DomainEvent::ProfileReported(ProfileReportedEvent::new(
            reporter_id,
            reported_id,
            deactivate,
        ));
        self.ctx
            .publisher()
            .publish_to_user(reported_id, &event)
            .await
            .ok();

        Ok(deactivate)
    }
}
