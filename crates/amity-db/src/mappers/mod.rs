//! Entity to model mappers
//!
//! This module provides conversions between domain entities (amity-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects

mod like;
mod matching;
mod message;
mod moderation;
mod profile;
