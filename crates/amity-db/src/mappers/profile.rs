//! Profile entity <-> model mapper

use amity_core::entities::ProfileRef;
use amity_core::value_objects::Snowflake;

use crate::models::ProfileModel;

impl From<ProfileModel> for ProfileRef {
    fn from(model: ProfileModel) -> Self {
        ProfileRef {
            id: Snowflake::new(model.id),
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            is_premium: model.is_premium,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}
