//! HR Client - HTTP client for the HR server
//!
//! Session lives in an explicit [`AppContext`]; each view talks to the
//! server through a [`ViewScope`] whose requests are cancelled when the
//! view goes away.

pub mod config;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod scope;

pub use config::ClientConfig;
pub use context::{AppContext, Session};
pub use dashboard::Dashboard;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use scope::ViewScope;

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, UserInfo};
pub use shared::{ApiResponse, Capabilities, ErrorCode};
