//! 请求关联上下文
//!
//! 封装"这次调用是谁发起的"这一信息，只服务于日志关联，
//! 不参与任何业务逻辑。不依赖隐式的异步本地存储：上下文作为
//! 显式值传入编排层，再通过 tracing span 附着到整次运行的
//! 每一条日志上。

use std::fmt::Display;

use tracing::{info_span, Span};
use uuid::Uuid;

/// 请求关联上下文
#[derive(Debug, Clone)]
pub struct RequestCtx {
    /// 调用方用户标识
    pub user_id: String,

    /// 调用方客户端标识
    pub client_id: String,

    /// 每次请求生成的唯一标识
    pub request_id: String,
}

impl RequestCtx {
    /// 创建新的请求上下文
    pub fn new(
        user_id: impl Into<String>,
        client_id: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            client_id: client_id.into(),
            request_id: request_id.into(),
        }
    }

    /// 创建上下文并自动生成请求标识
    pub fn with_generated_request_id(
        user_id: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self::new(user_id, client_id, Uuid::new_v4().to_string())
    }

    /// 整次运行的关联 span，三个标识会出现在 span 内的每条日志上
    pub fn span(&self) -> Span {
        info_span!(
            "user_data_request",
            user_id = %self.user_id,
            client_id = %self.client_id,
            request_id = %self.request_id,
        )
    }
}

impl Display for RequestCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[用户#{} 客户端#{} 请求#{}]",
            self.user_id, self.client_id, self.request_id
        )
    }
}
