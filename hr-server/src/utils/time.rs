//! 时间工具函数
//!
//! repository 层只接收 `i64` Unix millis 或 `NaiveDate`，
//! 日期字符串由 serde 在请求反序列化时解析。

use chrono::{NaiveDate, Utc};

use super::{AppError, AppResult};

/// 今天 (UTC)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// 校验日期区间，`end < start` 视为无效
pub fn validate_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AppResult<()> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(AppError::validation(format!(
            "End date {} is before start date {}",
            end, start
        )));
    }
    Ok(())
}
