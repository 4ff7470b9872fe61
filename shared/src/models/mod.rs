//! Data models
//!
//! Shared between hr-server and clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64`.

pub mod asset;
pub mod attendance;
pub mod department;
pub mod employee;
pub mod leave;
pub mod poll;

// Re-exports
pub use asset::*;
pub use attendance::*;
pub use department::*;
pub use employee::*;
pub use leave::*;
pub use poll::*;
