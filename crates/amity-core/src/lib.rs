//! # amity-core
//!
//! Domain layer containing entities, value objects, repository traits, and domain events
//! for the match-and-conversation engine.
//! This crate has zero dependencies on infrastructure (database, realtime feed, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod retention;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Block, BlockStatus, Like, Match, Message, MessageKind, ProfileRef, Report,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use retention::RetentionPolicy;
pub use traits::{
    BlockRepository, LikeRepository, MatchRepository, MessageRepository, ProfileDirectory,
    RepoResult, ReportRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
