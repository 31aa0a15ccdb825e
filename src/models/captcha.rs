//! 验证码挑战模型

use serde::Deserialize;

/// 识别服务的挑战状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptchaStatus {
    Pending,
    Completed,
    Failed,
    /// 服务端新增的未知状态，一律按未解出处理
    #[serde(other)]
    Unknown,
}

impl CaptchaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptchaStatus::Pending => "pending",
            CaptchaStatus::Completed => "completed",
            CaptchaStatus::Failed => "failed",
            CaptchaStatus::Unknown => "unknown",
        }
    }
}

/// 识别服务对一次挑战的应答
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaSolution {
    pub status: CaptchaStatus,
    #[serde(default)]
    pub text: Option<String>,
}

impl CaptchaSolution {
    /// 构造一个已完成的应答（主要供测试使用）
    pub fn completed(text: impl Into<String>) -> Self {
        Self {
            status: CaptchaStatus::Completed,
            text: Some(text.into()),
        }
    }

    /// 构造一个指定状态、无文本的应答
    pub fn unsolved(status: CaptchaStatus) -> Self {
        Self { status, text: None }
    }
}
