//! Integration test utilities for the match-and-conversation engine
//!
//! Provides in-memory repository implementations and helpers for running
//! engine scenarios without PostgreSQL or Redis. The memory repositories
//! enforce the same uniqueness semantics as the SQL schema, so
//! constraint-driven behavior (duplicate likes, unordered-pair match
//! uniqueness) is exercised for real.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
