//! 验证码识别服务客户端
//!
//! 封装所有与外部识别服务相关的调用逻辑。服务是一个黑盒远程
//! Oracle：提交图片换取挑战 ID，再按 ID 取回识别结果。

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult, CaptchaError};
use crate::models::CaptchaSolution;

/// 识别服务能力
#[async_trait]
pub trait CaptchaApi: Send + Sync {
    /// 提交 base64 编码的验证码图片，返回挑战 ID
    async fn submit_image(&self, image_b64: &str) -> AppResult<String>;

    /// 按挑战 ID 取回识别结果
    ///
    /// 状态不是 completed 属于正常数据，不在这里报错。
    async fn fetch_result(&self, challenge_id: &str) -> AppResult<CaptchaSolution>;
}

/// 识别服务客户端
pub struct BcsCaptchaClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl BcsCaptchaClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.captcha_api_base_url.trim_end_matches('/').to_string(),
            access_token: config.captcha_access_token.clone(),
        }
    }

    /// 图片提交端点
    fn submit_endpoint(&self) -> String {
        format!("{}/captcha/image", self.base_url)
    }

    /// 结果查询端点（不含令牌，可安全进日志）
    fn result_endpoint(&self, challenge_id: &str) -> String {
        format!("{}/captcha/{}", self.base_url, challenge_id)
    }
}

#[async_trait]
impl CaptchaApi for BcsCaptchaClient {
    async fn submit_image(&self, image_b64: &str) -> AppResult<String> {
        let endpoint = self.submit_endpoint();
        debug!("正在提交验证码图片到识别服务...");

        let body = json!({
            "b64image": image_b64,
            "access_token": self.access_token,
            "alphanumeric": 1,
        });

        let response = self
            .http
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::captcha_request_failed(&endpoint, e))?;

        if !response.status().is_success() {
            return Err(AppError::Captcha(CaptchaError::BadResponse {
                endpoint,
                status: response.status().as_u16(),
            }));
        }

        let reply: JsonValue = response
            .json()
            .await
            .map_err(|e| AppError::captcha_request_failed(&endpoint, e))?;

        let challenge_id = match reply.get("id") {
            Some(JsonValue::String(id)) => id.clone(),
            Some(JsonValue::Number(id)) => id.to_string(),
            _ => {
                return Err(AppError::Captcha(CaptchaError::MalformedReply {
                    endpoint,
                    detail: "应答中缺少 id 字段".to_string(),
                }))
            }
        };

        debug!("验证码图片提交成功, 挑战 ID: {}", challenge_id);
        Ok(challenge_id)
    }

    async fn fetch_result(&self, challenge_id: &str) -> AppResult<CaptchaSolution> {
        let endpoint = self.result_endpoint(challenge_id);
        debug!("正在查询识别结果: {}", endpoint);

        let response = self
            .http
            .get(&endpoint)
            .query(&[("access_token", self.access_token.as_str())])
            .send()
            .await
            .map_err(|e| AppError::captcha_request_failed(&endpoint, e))?;

        if !response.status().is_success() {
            return Err(AppError::Captcha(CaptchaError::BadResponse {
                endpoint,
                status: response.status().as_u16(),
            }));
        }

        let solution: CaptchaSolution = response
            .json()
            .await
            .map_err(|e| {
                AppError::Captcha(CaptchaError::MalformedReply {
                    endpoint,
                    detail: e.to_string(),
                })
            })?;

        Ok(solution)
    }
}
