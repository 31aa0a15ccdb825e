//! 页面流程 - 流程层
//!
//! 核心职责：定义一次查询在目标页面上的完整步骤序列
//!
//! 步骤顺序：
//! 1. 导航到表单入口
//! 2. 并发执行 {表单填写, 验证码识别}，两者操作同一页面上
//!    互不重叠的 DOM 区域（这是本流程的承重假设）
//! 3. 回填验证码答案并提交
//! 4. 等待跳转，等待结果页标志元素
//! 5. 点击触发导出链接渲染的按钮

use std::time::Duration;

use tracing::{debug, error, info};

use crate::clients::CaptchaApi;
use crate::config::Config;
use crate::error::{AppError, AppResult, FlowError};
use crate::infrastructure::PageDriver;
use crate::models::UserQuery;
use crate::selectors;
use crate::services::{CaptchaSolverService, FormFiller};

/// 页面流程
///
/// - 编排一次查询的完整页面步骤
/// - 不持有任何资源（page 由调用方借入）
/// - 只依赖业务能力（services）
pub struct FormFlow<'a, C: CaptchaApi> {
    form_filler: FormFiller,
    captcha_solver: CaptchaSolverService<'a, C>,
    target_url: String,
    wait_timeout: Duration,
}

impl<'a, C: CaptchaApi> FormFlow<'a, C> {
    /// 创建新的页面流程
    pub fn new(config: &Config, captcha_client: &'a C) -> Self {
        Self {
            form_filler: FormFiller::new(config),
            captcha_solver: CaptchaSolverService::new(config, captcha_client),
            target_url: config.target_url.clone(),
            wait_timeout: config.wait_timeout(),
        }
    }

    /// 在给定页面上跑完整个流程，成功后页面停在导出链接已渲染的状态
    pub async fn run<P: PageDriver>(&self, page: &P, query: &UserQuery) -> AppResult<()> {
        // ========== 步骤 1: 导航 ==========
        info!("🧭 正在导航到目标页面...");
        page.navigate(&self.target_url).await?;
        info!("✓ 导航完成");

        // ========== 步骤 2: 并发 {填表, 识别验证码} ==========
        let (fill_result, captcha_result) = tokio::join!(
            self.form_filler.fill_page_details(page, query),
            self.captcha_solver.solve(page),
        );

        let captcha_text = match (fill_result, captcha_result) {
            (Ok(()), Ok(text)) => text,
            (Err(e), _) => {
                error!("表单填写子任务失败: {}", e);
                return Err(AppError::Flow(FlowError::FormFillFailed));
            }
            (_, Err(e)) => {
                error!("验证码子任务失败: {}", e);
                return Err(e);
            }
        };
        info!("✓ 表单填写与验证码识别均已完成");

        // ========== 步骤 3: 提交 ==========
        debug!("正在回填验证码并提交表单...");
        page.fill(selectors::CAPTCHA_INPUT, &captcha_text).await?;
        page.click(selectors::SUBMIT_BUTTON).await?;
        info!("📤 表单已提交");

        // ========== 步骤 4: 等待结果页 ==========
        // 这里的超时和步骤 1 的导航失败是不同的失败原因：站点收下了
        // 提交但没有给出结果视图（例如证件与日期组合在上游无效）
        page.wait_for_navigation()
            .await
            .map_err(result_page_timeout)?;
        page.wait_visible(selectors::RESULTS_MARKER, self.wait_timeout)
            .await
            .map_err(result_page_timeout)?;
        info!("✓ 已到达结果页");

        // ========== 步骤 5: 触发导出 ==========
        page.click(selectors::RESULTS_MARKER).await?;
        debug!("已点击保单列表按钮, 导出链接开始渲染");

        Ok(())
    }
}

fn result_page_timeout(cause: AppError) -> AppError {
    error!("结果页未出现: {}", cause);
    AppError::Flow(FlowError::ResultPageTimeout)
}
