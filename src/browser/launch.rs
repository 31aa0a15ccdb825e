//! 浏览器启动与会话注入

use std::path::Path;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, BrowserError};
use crate::models::Session;

/// 启动浏览器，创建页面并注入登录会话的 Cookie
pub async fn launch_with_session(
    config: &Config,
    session: &Session,
) -> AppResult<(Browser, Page)> {
    info!("🚀 正在启动浏览器...");

    let mut builder = BrowserConfig::builder();
    if config.headless {
        builder = builder.new_headless_mode();
    } else {
        builder = builder.with_head();
    }
    if let Some(path) = &config.chrome_executable {
        builder = builder.chrome_executable(Path::new(path));
    }

    let browser_config = builder
        .args(vec![
            "--disable-gpu",             // 无头模式下禁用 GPU
            "--no-sandbox",              // 禁用沙盒，防止权限问题导致的崩溃
            "--disable-dev-shm-usage",   // 防止共享内存不足
            "--remote-debugging-port=0", // 让浏览器自动选择调试端口
        ])
        .build()
        .map_err(|message| AppError::Browser(BrowserError::ConfigurationFailed { message }))?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .map_err(AppError::launch_failed)?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    let page = browser
        .new_page("about:blank")
        .await
        .map_err(AppError::page_creation_failed)?;

    let cookies = cookie_params(session);
    if !cookies.is_empty() {
        page.set_cookies(cookies)
            .await
            .map_err(AppError::cookie_injection_failed)?;
    }

    info!(
        "✅ 浏览器已就绪, 会话 Cookie 已注入 ({} 条)",
        session.cookies.len()
    );
    Ok((browser, page))
}

/// 把缓存中的会话 Cookie 转成 CDP 的 CookieParam
fn cookie_params(session: &Session) -> Vec<CookieParam> {
    session
        .cookies
        .iter()
        .map(|c| {
            let mut cookie = CookieParam::new(c.name.clone(), c.value.clone());
            cookie.domain = c.domain.clone();
            cookie.path = c.path.clone();
            cookie.secure = c.secure;
            cookie.http_only = c.http_only;
            cookie
        })
        .collect()
}
