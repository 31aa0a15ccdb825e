//! 浏览器驱动 - 打开与收尾
//!
//! `close()` 必须幂等，并且无论流程从哪条路径退出都会被调用一次。
//! 浏览器是进程级资源，漏关会在负载下泄漏 OS 进程。

use async_trait::async_trait;
use chromiumoxide::Browser;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::browser::launch;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{CdpPage, PageDriver};
use crate::models::Session;

/// 浏览器生命周期能力
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    type Page: PageDriver;

    /// 用给定会话打开浏览器并返回页面
    async fn open(&self, session: &Session) -> AppResult<Self::Page>;

    /// 关闭浏览器。幂等：未打开或已关闭时是空操作，失败只记日志。
    async fn close(&self);
}

/// 基于 chromiumoxide 的浏览器驱动
pub struct CdpBrowser {
    config: Config,
    inner: Mutex<Option<Browser>>,
}

impl CdpBrowser {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            inner: Mutex::new(None),
        }
    }
}

#[async_trait]
impl BrowserDriver for CdpBrowser {
    type Page = CdpPage;

    async fn open(&self, session: &Session) -> AppResult<CdpPage> {
        let (browser, page) = launch::launch_with_session(&self.config, session).await?;

        let mut guard = self.inner.lock().await;
        if let Some(mut stale) = guard.take() {
            warn!("⚠️ 发现未关闭的浏览器实例, 先行关闭");
            let _ = stale.close().await;
        }
        *guard = Some(browser);

        Ok(CdpPage::new(page))
    }

    async fn close(&self) {
        let mut guard = self.inner.lock().await;
        if let Some(mut browser) = guard.take() {
            debug!("正在关闭浏览器...");
            if let Err(e) = browser.close().await {
                warn!("关闭浏览器失败: {}", e);
            }
            if let Err(e) = browser.wait().await {
                debug!("等待浏览器进程退出失败: {}", e);
            }
            debug!("浏览器已关闭");
        }
    }
}
