//! 验证码识别服务 - 业务能力层
//!
//! 在页面上定位验证码图片，截图后交给外部识别服务。
//! 本服务内发生的任何失败都归入验证码错误分类，由编排层
//! 映射为"处理失败"状态码。

use std::time::{Duration, Instant};

use base64::engine::general_purpose;
use base64::Engine as _;
use tracing::{debug, warn};

use crate::clients::CaptchaApi;
use crate::config::Config;
use crate::error::{AppError, AppResult, CaptchaError};
use crate::infrastructure::PageDriver;
use crate::models::CaptchaStatus;
use crate::selectors;

/// 验证码识别服务
pub struct CaptchaSolverService<'a, C: CaptchaApi> {
    client: &'a C,
    wait_timeout: Duration,
}

impl<'a, C: CaptchaApi> CaptchaSolverService<'a, C> {
    pub fn new(config: &Config, client: &'a C) -> Self {
        Self {
            client,
            wait_timeout: config.wait_timeout(),
        }
    }

    /// 识别当前页面上的验证码，返回解出的文本
    pub async fn solve<P: PageDriver>(&self, page: &P) -> AppResult<String> {
        let started = Instant::now();
        let result = self.solve_inner(page).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(_) => debug!("验证码识别完成, 耗时 {:.2} 秒", elapsed),
            Err(e) => warn!("验证码识别失败 (耗时 {:.2} 秒): {}", elapsed, e),
        }
        result
    }

    async fn solve_inner<P: PageDriver>(&self, page: &P) -> AppResult<String> {
        debug!("正在识别验证码...");

        page.wait_visible(selectors::CAPTCHA_IMAGE, self.wait_timeout)
            .await
            .map_err(|_| AppError::Captcha(CaptchaError::ImageNotFound))?;

        let image = page
            .screenshot_element(selectors::CAPTCHA_IMAGE)
            .await
            .map_err(|e| {
                AppError::Captcha(CaptchaError::ScreenshotFailed {
                    source: Box::new(e),
                })
            })?;
        let image_b64 = general_purpose::STANDARD.encode(&image);
        debug!("验证码图片已截取 ({} 字节)", image.len());

        let challenge_id = self.client.submit_image(&image_b64).await?;
        let solution = self.client.fetch_result(&challenge_id).await?;

        match solution.status {
            CaptchaStatus::Completed => solution
                .text
                .filter(|text| !text.is_empty())
                .ok_or(AppError::Captcha(CaptchaError::EmptySolution)),
            status => {
                warn!("⚠️ 验证码未解出, 服务状态: {}", status.as_str());
                Err(AppError::Captcha(CaptchaError::Unsolved {
                    status: status.as_str().to_string(),
                }))
            }
        }
    }
}
