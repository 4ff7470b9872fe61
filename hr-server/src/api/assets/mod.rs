//! Asset API 模块
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/employees/{id}/assets | GET | 本人或 can_manage_employees |
//! | /api/employees/{id}/assets | POST | can_manage_employees |
//! | /api/assets/{id}/revoke | POST | can_manage_employees |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/employees/{id}/assets",
            get(handler::list_for_employee).post(handler::allocate),
        )
        .route("/api/assets/{id}/revoke", post(handler::revoke))
}
