//! Staffdesk HR Server
//!
//! # 架构概述
//!
//! REST 服务端，持有持久化并执行全部权限检查：
//!
//! - **数据库** (`db`): SQLite (sqlx) + 嵌入式迁移
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): 员工、部门、请假、投票、考勤、资产
//!
//! 权限规则来自 `shared::permission`，客户端使用同一套规则只做界面控制，
//! 服务端是唯一的强制执行点。
//!
//! # 模块结构
//!
//! ```text
//! hr-server/src/
//! ├── core/          # 配置、状态、错误、服务启动
//! ├── auth/          # JWT 认证、中间件、密码哈希
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 连接池和 repository
//! └── utils/         # 日志、校验、时间
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 .env 并初始化日志
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __        ________    __          __
  / ___// /_____ _/ __/ __/___/ /__  _____/ /__
  \__ \/ __/ __ `/ /_/ /_/ __  / _ \/ ___/ //_/
 ___/ / /_/ /_/ / __/ __/ /_/ /  __(__  ) ,<
/____/\__/\__,_/_/ /_/  \__,_/\___/____/_/|_|
    "#
    );
}
