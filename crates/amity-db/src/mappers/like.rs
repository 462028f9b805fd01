//! Like entity <-> model mapper

use amity_core::entities::Like;
use amity_core::value_objects::Snowflake;

use crate::models::LikeModel;

impl From<LikeModel> for Like {
    fn from(model: LikeModel) -> Self {
        Like {
            sender_id: Snowflake::new(model.sender_id),
            receiver_id: Snowflake::new(model.receiver_id),
            created_at: model.created_at,
        }
    }
}
