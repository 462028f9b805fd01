//! Repository traits (ports)

pub mod repositories;

pub use repositories::{
    BlockRepository, LikeRepository, MatchRepository, MessageRepository, ProfileDirectory,
    RepoResult, ReportRepository,
};
