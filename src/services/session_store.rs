//! 会话读取服务 - 业务能力层
//!
//! 登录 Cookie 由带外的登录流程写入缓存，这里只读。
//! 键不存在是一次运行的正常结局（对外映射为"无会话"状态码），
//! 不走错误路径，编排层据此决定根本不启动浏览器。

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::Session;

/// 会话读取能力
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 按固定键读取会话，键不存在返回 `Ok(None)`
    async fn load(&self, key: &str) -> AppResult<Option<Session>>;
}

/// 基于 Redis 的会话读取服务
pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, key: &str) -> AppResult<Option<Session>> {
        debug!("正在从缓存读取登录 Cookie...");

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(key).await?;

        match raw {
            Some(raw) => {
                let session = Session::from_json(&raw)?;
                debug!("登录 Cookie 读取成功 ({} 条)", session.cookies.len());
                Ok(Some(session))
            }
            None => {
                warn!("⚠️ 缓存中不存在键: {}", key);
                Ok(None)
            }
        }
    }
}
