//! Retention sweep - the primary TTL mechanism
//!
//! Deletes every expired message across all matches in one statement and
//! publishes a purge event per affected match. The on-open purge in
//! `ConversationView` is only the backstop for matches opened between
//! sweeps.

use std::collections::HashMap;
use std::time::Duration;

use amity_core::events::domain_event::MessagesPurgedEvent;
use amity_core::{DomainEvent, Snowflake};
use chrono::Utc;
use tracing::{error, info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Background retention sweeper
pub struct RetentionSweeper {
    ctx: ServiceContext,
    interval: Duration,
}

impl RetentionSweeper {
    /// Create a new sweeper
    pub fn new(ctx: ServiceContext, interval: Duration) -> Self {
        Self { ctx, interval }
    }

    /// Run the sweep on an interval until the task is cancelled.
    ///
    /// A failed sweep is logged and retried at the next tick.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(
            interval_secs = self.interval.as_secs(),
            window_hours = self.ctx.retention().window().num_hours(),
            "Retention sweeper started"
        );

        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep_once().await {
                error!(error = %e, "Retention sweep failed");
            }
        }
    }

    /// Run one sweep pass. Idempotent: a second pass over the same
    /// window deletes nothing. Returns the number of messages removed.
    #[instrument(skip(self))]
    pub async fn sweep_once(&self) -> ServiceResult<usize> {
        let cutoff = self.ctx.retention().cutoff(Utc::now());
        let deleted = self.ctx.message_repo().delete_expired_all(cutoff).await?;

        if deleted.is_empty() {
            return Ok(0);
        }

        let mut by_match: HashMap<Snowflake, Vec<Snowflake>> = HashMap::new();
        for (match_id, message_id) in &deleted {
            by_match.entry(*match_id).or_default().push(*message_id);
        }

        for (match_id, message_ids) in by_match {
            let event =
                DomainEvent::MessagesPurged(MessagesPurgedEvent::new(match_id, message_ids));
            self.ctx.publisher().publish_to_match(&event).await.ok();
        }

        info!(
            count = deleted.len(),
            cutoff = %cutoff,
            "Expired messages swept"
        );

        Ok(deleted.len())
    }
}
