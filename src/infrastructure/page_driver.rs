//! 页面操作能力 - 基础设施层
//!
//! `PageDriver` 是流程层对浏览器页面的全部认知：导航、等待、填写、
//! 点击、截图、执行脚本。`CdpPage` 是基于 chromiumoxide 的真实实现，
//! 持有唯一的 Page 资源。

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::Page;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, Instant};

use crate::error::{AppError, AppResult};

/// 元素等待的轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 页面操作能力
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// 导航到指定 URL
    async fn navigate(&self, url: &str) -> AppResult<()>;

    /// 等待元素可见，超时返回错误
    async fn wait_visible(&self, selector: &str, timeout: Duration) -> AppResult<()>;

    /// 向输入框填写文本
    async fn fill(&self, selector: &str, value: &str) -> AppResult<()>;

    /// 点击元素
    async fn click(&self, selector: &str) -> AppResult<()>;

    /// 截取单个元素的 PNG 截图
    async fn screenshot_element(&self, selector: &str) -> AppResult<Vec<u8>>;

    /// 执行 JS 代码并返回 JSON 结果
    async fn eval(&self, js: &str) -> AppResult<JsonValue>;

    /// 等待一次完整的页面跳转
    async fn wait_for_navigation(&self) -> AppResult<()>;

    /// 读取当前渲染后的 HTML
    async fn content(&self) -> AppResult<String>;
}

/// 基于 CDP 的页面驱动
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 实现 `PageDriver` 的全部能力
/// - 不认识查询、会话、流程
pub struct CdpPage {
    page: Page,
}

impl CdpPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他底层操作）
    pub fn page(&self) -> &Page {
        &self.page
    }
}

/// 构建元素可见性探测脚本
fn visibility_probe(selector: &str) -> String {
    // selector 经 JSON 转义后嵌入，避免引号破坏脚本
    let quoted = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"
(() => {{
    const el = document.querySelector({quoted});
    return !!(el && (el.offsetWidth || el.offsetHeight || el.getClientRects().length));
}})()
"#
    )
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn navigate(&self, url: &str) -> AppResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| AppError::navigation_failed(url, e))?;
        Ok(())
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> AppResult<()> {
        let probe = visibility_probe(selector);
        let deadline = Instant::now() + timeout;
        loop {
            let visible = self
                .page
                .evaluate(probe.as_str())
                .await
                .ok()
                .and_then(|result| result.into_value::<bool>().ok())
                .unwrap_or(false);
            if visible {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(AppError::wait_timeout(selector, timeout));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn fill(&self, selector: &str, value: &str) -> AppResult<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| AppError::interaction_failed(selector, e))?;
        element
            .click()
            .await
            .map_err(|e| AppError::interaction_failed(selector, e))?;
        element
            .type_str(value)
            .await
            .map_err(|e| AppError::interaction_failed(selector, e))?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> AppResult<()> {
        self.page
            .find_element(selector)
            .await
            .map_err(|e| AppError::interaction_failed(selector, e))?
            .click()
            .await
            .map_err(|e| AppError::interaction_failed(selector, e))?;
        Ok(())
    }

    async fn screenshot_element(&self, selector: &str) -> AppResult<Vec<u8>> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| AppError::interaction_failed(selector, e))?;
        let bytes = element
            .screenshot(CaptureScreenshotFormat::Png)
            .await
            .map_err(|e| AppError::interaction_failed(selector, e))?;
        Ok(bytes)
    }

    async fn eval(&self, js: &str) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js).await?;
        let value = result
            .into_value::<JsonValue>()
            .map_err(AppError::script_failed)?;
        Ok(value)
    }

    async fn wait_for_navigation(&self) -> AppResult<()> {
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    async fn content(&self) -> AppResult<String> {
        let html = self.page.content().await?;
        Ok(html)
    }
}
