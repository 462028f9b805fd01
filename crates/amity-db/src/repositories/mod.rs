//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in amity-core.
//! Each repository handles database operations for a specific domain entity.

mod block;
mod error;
mod like;
mod matching;
mod message;
mod profile;
mod report;

pub use block::PgBlockRepository;
pub use like::PgLikeRepository;
pub use matching::PgMatchRepository;
pub use message::PgMessageRepository;
pub use profile::PgProfileDirectory;
pub use report::PgReportRepository;
