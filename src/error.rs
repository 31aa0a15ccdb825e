use std::fmt;
use std::time::Duration;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 浏览器相关错误
    Browser(BrowserError),
    /// 验证码识别错误
    Captcha(CaptchaError),
    /// 会话缓存错误
    Session(SessionError),
    /// 页面流程错误
    Flow(FlowError),
    /// 表格提取错误
    Extraction(ExtractionError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Browser(e) => write!(f, "浏览器错误: {}", e),
            AppError::Captcha(e) => write!(f, "验证码错误: {}", e),
            AppError::Session(e) => write!(f, "会话错误: {}", e),
            AppError::Flow(e) => write!(f, "流程错误: {}", e),
            AppError::Extraction(e) => write!(f, "提取错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Browser(e) => Some(e),
            AppError::Captcha(e) => Some(e),
            AppError::Session(e) => Some(e),
            AppError::Flow(e) => Some(e),
            AppError::Extraction(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 浏览器相关错误
#[derive(Debug)]
pub enum BrowserError {
    /// 浏览器配置失败
    ConfigurationFailed {
        message: String,
    },
    /// 启动浏览器失败
    LaunchFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建页面失败
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 注入会话 Cookie 失败
    CookieInjectionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 等待元素超时
    WaitTimeout {
        selector: String,
        waited_secs: u64,
    },
    /// 页面元素操作失败
    InteractionFailed {
        selector: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 元素不存在
    ElementNotFound {
        selector: String,
    },
    /// 执行脚本失败
    ScriptExecutionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::ConfigurationFailed { message } => {
                write!(f, "浏览器配置失败: {}", message)
            }
            BrowserError::LaunchFailed { source } => {
                write!(f, "启动浏览器失败: {}", source)
            }
            BrowserError::PageCreationFailed { source } => {
                write!(f, "创建页面失败: {}", source)
            }
            BrowserError::CookieInjectionFailed { source } => {
                write!(f, "注入会话 Cookie 失败: {}", source)
            }
            BrowserError::NavigationFailed { url, source } => {
                write!(f, "导航到 {} 失败: {}", url, source)
            }
            BrowserError::WaitTimeout {
                selector,
                waited_secs,
            } => {
                write!(f, "等待元素 {} 超时 ({}秒)", selector, waited_secs)
            }
            BrowserError::InteractionFailed { selector, source } => {
                write!(f, "操作元素 {} 失败: {}", selector, source)
            }
            BrowserError::ElementNotFound { selector } => {
                write!(f, "元素不存在: {}", selector)
            }
            BrowserError::ScriptExecutionFailed { source } => {
                write!(f, "执行脚本失败: {}", source)
            }
        }
    }
}

impl std::error::Error for BrowserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowserError::LaunchFailed { source }
            | BrowserError::PageCreationFailed { source }
            | BrowserError::CookieInjectionFailed { source }
            | BrowserError::NavigationFailed { source, .. }
            | BrowserError::InteractionFailed { source, .. }
            | BrowserError::ScriptExecutionFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 验证码识别错误
///
/// "服务不可用"（RequestFailed / BadResponse）和"未解出"（Unsolved）是
/// 两类不同的终态：前者是基础设施故障，后者是本次运行的正常失败结局。
/// 二者在日志中区分，对外都映射为"处理失败"状态码。
#[derive(Debug)]
pub enum CaptchaError {
    /// 页面上未找到验证码图片
    ImageNotFound,
    /// 截取验证码图片失败
    ScreenshotFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 请求识别服务失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 识别服务返回非 2xx 响应
    BadResponse {
        endpoint: String,
        status: u16,
    },
    /// 识别服务返回无法解析的内容
    MalformedReply {
        endpoint: String,
        detail: String,
    },
    /// 验证码未解出（服务状态不是 completed）
    Unsolved {
        status: String,
    },
    /// 验证码解出但文本为空
    EmptySolution,
}

impl fmt::Display for CaptchaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptchaError::ImageNotFound => write!(f, "页面上未找到验证码图片"),
            CaptchaError::ScreenshotFailed { source } => {
                write!(f, "截取验证码图片失败: {}", source)
            }
            CaptchaError::RequestFailed { endpoint, source } => {
                write!(f, "识别服务不可用 ({}): {}", endpoint, source)
            }
            CaptchaError::BadResponse { endpoint, status } => {
                write!(f, "识别服务返回错误响应 ({}): HTTP {}", endpoint, status)
            }
            CaptchaError::MalformedReply { endpoint, detail } => {
                write!(f, "识别服务返回内容无法解析 ({}): {}", endpoint, detail)
            }
            CaptchaError::Unsolved { status } => {
                write!(f, "验证码未解出 (状态: {})", status)
            }
            CaptchaError::EmptySolution => write!(f, "验证码解出但文本为空"),
        }
    }
}

impl std::error::Error for CaptchaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptchaError::ScreenshotFailed { source }
            | CaptchaError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 会话缓存错误
///
/// 注意：缓存中不存在会话不是错误，`SessionStore::load` 返回 `Ok(None)`。
#[derive(Debug)]
pub enum SessionError {
    /// 会话缓存不可达
    StoreUnavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 会话数据无法解析
    Corrupted {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::StoreUnavailable { source } => {
                write!(f, "会话缓存不可达: {}", source)
            }
            SessionError::Corrupted { source } => {
                write!(f, "会话数据无法解析: {}", source)
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::StoreUnavailable { source } | SessionError::Corrupted { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 页面流程错误
#[derive(Debug)]
pub enum FlowError {
    /// 表单填写子任务失败
    FormFillFailed,
    /// 提交后结果页未出现
    ResultPageTimeout,
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::FormFillFailed => write!(f, "表单填写失败"),
            FlowError::ResultPageTimeout => write!(f, "结果页等待超时"),
        }
    }
}

impl std::error::Error for FlowError {}

/// 表格提取错误
#[derive(Debug)]
pub enum ExtractionError {
    /// 未找到导出链接
    ExportLinkNotFound,
    /// 导出链接无法解析为绝对地址
    InvalidExportHref {
        href: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导出文档中没有表格
    TableNotFound,
    /// 表格行数据无法解析
    MalformedRows {
        detail: String,
    },
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::ExportLinkNotFound => write!(f, "未找到导出链接"),
            ExtractionError::InvalidExportHref { href, source } => {
                write!(f, "导出链接无法解析 ({}): {}", href, source)
            }
            ExtractionError::TableNotFound => write!(f, "导出文档中没有表格"),
            ExtractionError::MalformedRows { detail } => {
                write!(f, "表格行数据无法解析: {}", detail)
            }
        }
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractionError::InvalidExportHref { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Session(SessionError::StoreUnavailable {
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器启动错误
    pub fn launch_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::LaunchFailed {
            source: Box::new(source),
        })
    }

    /// 创建页面创建错误
    pub fn page_creation_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::PageCreationFailed {
            source: Box::new(source),
        })
    }

    /// 创建 Cookie 注入错误
    pub fn cookie_injection_failed(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::CookieInjectionFailed {
            source: Box::new(source),
        })
    }

    /// 创建导航错误
    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建等待超时错误
    pub fn wait_timeout(selector: impl Into<String>, waited: Duration) -> Self {
        AppError::Browser(BrowserError::WaitTimeout {
            selector: selector.into(),
            waited_secs: waited.as_secs(),
        })
    }

    /// 创建元素操作错误
    pub fn interaction_failed(
        selector: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::InteractionFailed {
            selector: selector.into(),
            source: Box::new(source),
        })
    }

    /// 创建脚本执行错误
    pub fn script_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(source),
        })
    }

    /// 创建识别服务请求错误
    pub fn captcha_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Captcha(CaptchaError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建会话缓存不可达错误
    pub fn session_store_unavailable(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Session(SessionError::StoreUnavailable {
            source: Box::new(source),
        })
    }

    /// 创建会话数据解析错误
    pub fn session_corrupted(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Session(SessionError::Corrupted {
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
