//! # amity-service
//!
//! Application layer containing business logic, services, and DTOs for the
//! match-and-conversation engine.

pub mod dto;
pub mod services;

pub use services::{
    ConversationService, ConversationView, LikeService, MatchService, ModerationService,
    RetentionSweeper, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    SessionContext, UnreadTracker,
};
