//! Data transfer objects for service inputs and outputs
//!
//! This module provides:
//! - Request DTOs with validation for caller inputs
//! - Response DTOs for serializing enriched read-side views

pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{ReportProfileRequest, SendMessageRequest};

// Re-export commonly used response types
pub use responses::{LastMessage, LikeOutcome, LikeStatus, MatchSummary};
