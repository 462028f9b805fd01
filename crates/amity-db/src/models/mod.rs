//! Database models - SQLx-compatible structs for PostgreSQL tables

mod like;
mod matching;
mod message;
mod moderation;
mod profile;

pub use like::LikeModel;
pub use matching::MatchModel;
pub use message::{MessageModel, UnreadCountModel};
pub use moderation::{BlockModel, ReportModel};
pub use profile::ProfileModel;
