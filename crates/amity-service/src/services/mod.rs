//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod context;
pub mod conversation;
pub mod error;
pub mod like;
pub mod matches;
pub mod moderation;
pub mod session;
pub mod sweep;
pub mod unread;
pub mod view;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use conversation::ConversationService;
pub use error::{ServiceError, ServiceResult};
pub use like::LikeService;
pub use matches::MatchService;
pub use moderation::ModerationService;
pub use session::SessionContext;
pub use sweep::RetentionSweeper;
pub use unread::UnreadTracker;
pub use view::ConversationView;
