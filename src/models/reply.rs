//! 对外应答模型
//!
//! 调用方（上游 HTTP 层）永远收到一个结构完整的应答信封，
//! 内部失败原因只进日志，对外只暴露状态码分类。

use serde::Serialize;

/// 提取出的表格数据：有序的行，每行是有序的单元格文本
pub type TableRows = Vec<Vec<String>>;

/// 对外状态码分类（稳定契约）
pub mod status_code {
    /// 成功，附带数据
    pub const SUCCESS: u8 = 0;
    /// 成功（历史遗留代码，调用方同样按成功处理）
    pub const SUCCESS_LEGACY: u8 = 3;
    /// 缓存中没有可用会话
    pub const NO_SESSION: u8 = 1;
    /// 表单填写或验证码识别失败
    pub const PROCESSING_FAILED: u8 = 2;
    /// 未分类的意外错误
    pub const UNEXPECTED: u8 = 99;
}

/// 一次运行的对外应答
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub is_success: bool,
    pub message: String,
    pub status_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TableRows>,
}

impl Reply {
    /// 成功应答
    pub fn ok(message: impl Into<String>, data: TableRows) -> Self {
        Self {
            is_success: true,
            message: message.into(),
            status_code: status_code::SUCCESS,
            data: Some(data),
        }
    }

    /// 失败应答
    pub fn failure(message: impl Into<String>, status_code: u8) -> Self {
        Self {
            is_success: false,
            message: message.into(),
            status_code,
            data: None,
        }
    }

    /// 判断状态码是否属于成功分类
    pub fn is_success_code(code: u8) -> bool {
        matches!(code, status_code::SUCCESS | status_code::SUCCESS_LEGACY)
    }
}
