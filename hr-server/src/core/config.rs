use std::path::PathBuf;

use shared::models::RevotePolicy;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 首次启动时创建的 L4 管理员
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/staffdesk | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | {WORK_DIR}/database/hr.db | SQLite 数据库文件 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 / EnvFilter 表达式 |
/// | LOG_DIR | (无) | 日志目录，设置后按天滚动写文件 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | POLL_REVOTE_POLICY | reject | 重复投票策略: reject / replace |
/// | BOOTSTRAP_ADMIN_EMAIL | (无) | 初始管理员邮箱 |
/// | BOOTSTRAP_ADMIN_PASSWORD | (无) | 初始管理员密码 |
/// | BOOTSTRAP_ADMIN_NAME | Administrator | 初始管理员姓名 |
///
/// JWT 相关变量见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/staffdesk HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据库文件路径
    pub database_path: PathBuf,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 重复投票策略
    pub revote_policy: RevotePolicy,
    /// 初始管理员 (可选)
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 解析重复投票策略，未知值回退到 reject
pub fn parse_revote_policy(value: &str) -> RevotePolicy {
    match value.trim().to_ascii_lowercase().as_str() {
        "replace" => RevotePolicy::Replace,
        "reject" => RevotePolicy::Reject,
        other => {
            tracing::warn!(value = other, "Unknown POLL_REVOTE_POLICY, using reject");
            RevotePolicy::Reject
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Result<Self, ServerError> {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/staffdesk".into());
        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(&work_dir).join("database").join("hr.db"));

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => Some(BootstrapAdmin {
                email,
                password,
                name: std::env::var("BOOTSTRAP_ADMIN_NAME")
                    .unwrap_or_else(|_| "Administrator".into()),
            }),
            _ => None,
        };

        Ok(Self {
            work_dir,
            http_port: env_parse("HTTP_PORT", 3000),
            database_path,
            jwt: JwtConfig::from_env().map_err(|e| ServerError::Config(e.to_string()))?,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30_000),
            revote_policy: std::env::var("POLL_REVOTE_POLICY")
                .map(|v| parse_revote_policy(&v))
                .unwrap_or_default(),
            bootstrap_admin,
        })
    }

    /// 测试用配置：固定 JWT 密钥，不读取环境变量
    pub fn for_tests(work_dir: impl Into<String>) -> Self {
        let work_dir = work_dir.into();
        Self {
            database_path: PathBuf::from(&work_dir).join("hr.db"),
            work_dir,
            http_port: 0,
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-long-enough-for-hs256".into(),
                expiration_minutes: 60,
                issuer: "hr-server".into(),
                audience: "hr-clients".into(),
            },
            environment: "test".into(),
            request_timeout_ms: 30_000,
            revote_policy: RevotePolicy::Reject,
            bootstrap_admin: None,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
