//! 用户数据代理 - 编排层
//!
//! 一次请求的完整生命周期：会话 → 浏览器 → 页面流程 → 表格提取。
//! 第一步失败就短路，浏览器收尾无条件执行且只执行一次。

use tracing::{debug, error, info, warn, Instrument};

use crate::browser::BrowserDriver;
use crate::clients::CaptchaApi;
use crate::config::Config;
use crate::error::{AppError, AppResult, FlowError};
use crate::infrastructure::PageDriver;
use crate::models::reply::status_code;
use crate::models::{Reply, TableRows, UserQuery};
use crate::services::{SessionStore, TableExtractor};
use crate::workflow::{FormFlow, RequestCtx};

/// 用户数据代理
pub struct UserDataAgent<S, B, C> {
    config: Config,
    session_store: S,
    browser: B,
    captcha_client: C,
}

impl<S, B, C> UserDataAgent<S, B, C>
where
    S: SessionStore,
    B: BrowserDriver,
    C: CaptchaApi,
{
    /// 创建新的用户数据代理
    pub fn new(config: Config, session_store: S, browser: B, captcha_client: C) -> Self {
        Self {
            config,
            session_store,
            browser,
            captcha_client,
        }
    }

    /// 执行一次完整的数据获取请求
    ///
    /// 上下文中的三个关联标识通过 span 附着到本次运行的每条日志。
    /// 返回值永远是结构完整的应答信封，内部错误不会作为裸错误外泄。
    pub async fn get_user_data(&self, query: &UserQuery, ctx: &RequestCtx) -> Reply {
        async {
            debug!("开始获取用户数据...");
            let reply = self.execute(query).await;

            // 无论从哪条路径退出，浏览器都在这里收尾（close 幂等）
            self.browser.close().await;

            if reply.is_success {
                info!("✓ 用户数据获取成功 (状态码: {})", reply.status_code);
            } else {
                warn!(
                    "⚠️ 用户数据获取失败 (状态码: {}): {}",
                    reply.status_code, reply.message
                );
            }
            reply
        }
        .instrument(ctx.span())
        .await
    }

    async fn execute(&self, query: &UserQuery) -> Reply {
        // ========== 会话 ==========
        let session = match self
            .session_store
            .load(&self.config.session_cookie_key)
            .await
        {
            Ok(Some(session)) => session,
            Ok(None) => {
                // 没有会话是确定失败的运行，不值得浪费一次浏览器启动
                error!("缓存中没有登录 Cookie");
                return Reply::failure("No cookies found.", status_code::NO_SESSION);
            }
            Err(e) => {
                error!("读取会话缓存失败: {}", e);
                return Reply::failure("Failed to access the page.", status_code::UNEXPECTED);
            }
        };

        // ========== 浏览器 ==========
        let page = match self.browser.open(&session).await {
            Ok(page) => page,
            Err(e) => {
                error!("打开浏览器失败: {}", e);
                return Reply::failure("Failed to access the page.", status_code::UNEXPECTED);
            }
        };

        // ========== 流程 + 提取 ==========
        match self.process_user_data(&page, query).await {
            Ok(rows) => {
                debug!("页面流程完成, 共提取 {} 行数据", rows.len());
                Reply::ok("Page accessed successfully.", rows)
            }
            Err(e) => {
                error!("处理用户数据失败: {}", e);
                reply_for_error(&e)
            }
        }
    }

    async fn process_user_data<P: PageDriver>(
        &self,
        page: &P,
        query: &UserQuery,
    ) -> AppResult<TableRows> {
        let flow = FormFlow::new(&self.config, &self.captcha_client);
        flow.run(page, query).await?;

        let extractor = TableExtractor::new(&self.config);
        extractor.extract(page).await
    }
}

/// 把内部失败原因映射为对外状态码
///
/// 表单填写和验证码的一切失败（包括识别服务不可达）都归为
/// "处理失败"；其余原因只进日志，对外统一是未分类错误。
fn reply_for_error(error: &AppError) -> Reply {
    match error {
        AppError::Captcha(_) | AppError::Flow(FlowError::FormFillFailed) => {
            Reply::failure("Failed to process user data.", status_code::PROCESSING_FAILED)
        }
        _ => Reply::failure("Failed to access the page.", status_code::UNEXPECTED),
    }
}
