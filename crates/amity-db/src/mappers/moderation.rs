//! Block and report entity <-> model mappers

use amity_core::entities::{Block, Report};
use amity_core::value_objects::Snowflake;

use crate::models::{BlockModel, ReportModel};

impl From<BlockModel> for Block {
    fn from(model: BlockModel) -> Self {
        Block {
            blocker_id: Snowflake::new(model.blocker_id),
            blocked_id: Snowflake::new(model.blocked_id),
            created_at: model.created_at,
        }
    }
}

impl From<ReportModel> for Report {
    fn from(model: ReportModel) -> Self {
        Report {
            id: Snowflake::new(model.id),
            reporter_id: Snowflake::new(model.reporter_id),
            reported_id: Snowflake::new(model.reported_id),
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}
