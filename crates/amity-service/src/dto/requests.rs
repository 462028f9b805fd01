//! Request DTOs for service operations
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use amity_core::entities::MessageKind;
use serde::Deserialize;
use validator::Validate;

/// Send message request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Content must be 1-4000 characters"))]
    pub content: String,

    #[serde(default)]
    pub kind: MessageKind,
}

/// Report profile request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReportProfileRequest {
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
}
