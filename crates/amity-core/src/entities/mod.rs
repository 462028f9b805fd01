//! Domain entities

pub mod like;
pub mod matching;
pub mod message;
pub mod moderation;
pub mod profile;

pub use like::Like;
pub use matching::Match;
pub use message::{Message, MessageKind};
pub use moderation::{Block, BlockStatus, Report};
pub use profile::ProfileRef;
