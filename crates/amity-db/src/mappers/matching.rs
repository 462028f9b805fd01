//! Match entity <-> model mapper

use amity_core::entities::Match;
use amity_core::value_objects::Snowflake;

use crate::models::MatchModel;

impl From<MatchModel> for Match {
    fn from(model: MatchModel) -> Self {
        Match {
            id: Snowflake::new(model.id),
            user1_id: Snowflake::new(model.user1_id),
            user2_id: Snowflake::new(model.user2_id),
            created_at: model.created_at,
        }
    }
}
