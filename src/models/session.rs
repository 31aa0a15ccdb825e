//! 登录会话模型
//!
//! 会话由带外的登录流程写入缓存，本系统只读。序列化格式是登录端
//! 导出的 Cookie 数组（camelCase 字段），这里按需解析、容忍未知字段。

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// 缓存中序列化的单条 Cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub expires: Option<f64>,
    #[serde(default)]
    pub http_only: Option<bool>,
    #[serde(default)]
    pub secure: Option<bool>,
    #[serde(default)]
    pub same_site: Option<String>,
}

/// 一套可复用的登录 Cookie
#[derive(Debug, Clone)]
pub struct Session {
    pub cookies: Vec<StoredCookie>,
}

impl Session {
    /// 从缓存中的 JSON 文本解析会话
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let cookies: Vec<StoredCookie> =
            serde_json::from_str(raw).map_err(AppError::session_corrupted)?;
        Ok(Self { cookies })
    }
}
