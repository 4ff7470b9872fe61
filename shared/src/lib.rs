//! Shared types for Staffdesk
//!
//! Domain models, the unified error system, and the pure policy modules
//! (permission tiers, department hierarchy, polls, leave arithmetic) used by
//! both hr-server and hr-client.

pub mod client;
pub mod error;
pub mod hierarchy;
pub mod leave;
pub mod models;
pub mod permission;
pub mod poll;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use permission::Capabilities;
pub use serde::{Deserialize, Serialize};
