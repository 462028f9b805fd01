//! Profile reference - the projection of a profile the engine needs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A lightweight view of a profile.
///
/// The engine does not own profile data; it only needs enough to
/// enrich match listings and to gate moderation (`is_active`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRef {
    pub id: Snowflake,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub is_premium: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ProfileRef {
    pub fn new(id: Snowflake, display_name: String) -> Self {
        Self {
            id,
            display_name,
            avatar_url: None,
            is_premium: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
