//! 查询请求模型

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// 一次数据获取请求的输入
///
/// 由上游 HTTP 层反序列化后传入，在整个流程中只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    /// 证件号码
    pub subject_id: String,
    /// 出生日期
    pub birth_date: NaiveDate,
    /// 证件签发日期
    pub issue_date: NaiveDate,
    /// 请求方用户编号（仅用于日志关联）
    pub requester_id: u64,
}

/// 日期的日/月/年分量
///
/// 页面上的日期控件是三个独立的下拉列表，按分量逐个选择，
/// 这里只有日历日期语义，不涉及时区。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl From<NaiveDate> for DateParts {
    fn from(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
            year: date.year(),
        }
    }
}
