/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 目标页面 URL（表单入口）
    pub target_url: String,
    /// 门户站点根地址，用于解析导出链接的相对 href
    pub portal_base_url: String,
    /// 验证码识别服务 API 根地址
    pub captcha_api_base_url: String,
    /// 验证码识别服务访问令牌
    pub captcha_access_token: String,
    /// 会话缓存（Redis）连接地址
    pub redis_url: String,
    /// 登录 Cookie 在缓存中的固定键名
    pub session_cookie_key: String,
    /// 浏览器可执行文件路径（不设置则自动探测）
    pub chrome_executable: Option<String>,
    /// 是否以无头模式启动浏览器
    pub headless: bool,
    /// 页面元素等待超时（秒）
    pub wait_timeout_secs: u64,
    /// 日志级别
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: "https://harb.cma.gov.il/LocateBeneficiaries".to_string(),
            portal_base_url: "https://harb.cma.gov.il".to_string(),
            captcha_api_base_url: "https://bcsapi.xyz/api".to_string(),
            captcha_access_token: String::new(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            session_cookie_key: "HARB_LOGIN_COOKIES_AFRICA".to_string(),
            chrome_executable: None,
            headless: true,
            wait_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            target_url: std::env::var("HARB_URL").unwrap_or(default.target_url),
            portal_base_url: std::env::var("HARB_BASE_URL").unwrap_or(default.portal_base_url),
            captcha_api_base_url: std::env::var("BCSAPI_URL").unwrap_or(default.captcha_api_base_url),
            captcha_access_token: std::env::var("BCSAPI_ACCESS_TOKEN").unwrap_or(default.captcha_access_token),
            redis_url: std::env::var("REDIS_URL").unwrap_or(default.redis_url),
            session_cookie_key: std::env::var("SESSION_COOKIE_KEY").unwrap_or(default.session_cookie_key),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok(),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            wait_timeout_secs: std::env::var("WAIT_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.wait_timeout_secs),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(default.log_level),
        }
    }

    /// 页面等待超时
    pub fn wait_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.wait_timeout_secs)
    }
}
