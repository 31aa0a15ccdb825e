//! 代理端到端流程测试
//!
//! 用脚本化的伪实现替换浏览器、会话缓存和识别服务，
//! 验证编排层的状态码契约和浏览器收尾保证。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use harb_data_agent::error::{AppError, AppResult};
use harb_data_agent::models::reply::status_code;
use harb_data_agent::models::{CaptchaSolution, CaptchaStatus, Session, StoredCookie};
use harb_data_agent::{
    BrowserDriver, CaptchaApi, Config, PageDriver, RequestCtx, SessionStore, UserDataAgent,
    UserQuery,
};

// ========== 页面伪实现 ==========

/// 脚本化页面行为
struct PageBehavior {
    /// 这些选择器的 wait_visible 直接超时
    fail_wait_selectors: Vec<&'static str>,
    /// 第一次导航（表单入口）直接失败
    fail_navigation: bool,
    /// 导出锚点的 href，None 表示锚点不存在
    export_href: Option<&'static str>,
    /// 表格行数据，Null 表示文档中没有表格
    table_rows: JsonValue,
}

impl Default for PageBehavior {
    fn default() -> Self {
        Self {
            fail_wait_selectors: Vec::new(),
            fail_navigation: false,
            export_href: Some("/files/export?id=1"),
            table_rows: fixture_rows(),
        }
    }
}

/// 页面调用记录
#[derive(Default)]
struct PageLog {
    navigations: Vec<String>,
    fills: Vec<(String, String)>,
    clicks: Vec<String>,
}

#[derive(Clone)]
struct ScriptedPage {
    behavior: Arc<PageBehavior>,
    log: Arc<Mutex<PageLog>>,
}

impl ScriptedPage {
    fn new(behavior: PageBehavior) -> Self {
        Self {
            behavior: Arc::new(behavior),
            log: Arc::new(Mutex::new(PageLog::default())),
        }
    }

    fn clicks(&self) -> Vec<String> {
        self.log.lock().unwrap().clicks.clone()
    }

    fn fills(&self) -> Vec<(String, String)> {
        self.log.lock().unwrap().fills.clone()
    }
}

#[async_trait]
impl PageDriver for ScriptedPage {
    async fn navigate(&self, url: &str) -> AppResult<()> {
        let first = self.log.lock().unwrap().navigations.is_empty();
        if self.behavior.fail_navigation && first {
            return Err(AppError::navigation_failed(
                url,
                std::io::Error::other("net::ERR_CONNECTION_REFUSED"),
            ));
        }
        self.log.lock().unwrap().navigations.push(url.to_string());
        Ok(())
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> AppResult<()> {
        if self.behavior.fail_wait_selectors.contains(&selector) {
            return Err(AppError::wait_timeout(selector, timeout));
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> AppResult<()> {
        self.log
            .lock()
            .unwrap()
            .fills
            .push((selector.to_string(), value.to_string()));
        Ok(())
    }

    async fn click(&self, selector: &str) -> AppResult<()> {
        self.log.lock().unwrap().clicks.push(selector.to_string());
        Ok(())
    }

    async fn screenshot_element(&self, _selector: &str) -> AppResult<Vec<u8>> {
        Ok(vec![0x89, 0x50, 0x4e, 0x47])
    }

    async fn eval(&self, js: &str) -> AppResult<JsonValue> {
        if js.contains("window.print") {
            return Ok(json!(true));
        }
        if js.contains(".k-item") {
            return Ok(json!("selected"));
        }
        if js.contains("cbAproveTerm") {
            return Ok(json!("checked"));
        }
        if js.contains("getAttribute('href')") {
            return Ok(match self.behavior.export_href {
                Some(href) => json!(href),
                None => JsonValue::Null,
            });
        }
        if js.contains("table tbody") {
            return Ok(self.behavior.table_rows.clone());
        }
        Ok(JsonValue::Null)
    }

    async fn wait_for_navigation(&self) -> AppResult<()> {
        Ok(())
    }

    async fn content(&self) -> AppResult<String> {
        Ok("<html><body><table><tbody></tbody></table></body></html>".to_string())
    }
}

// ========== 浏览器伪实现 ==========

#[derive(Clone)]
struct MockBrowser {
    page: ScriptedPage,
    opens: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl MockBrowser {
    fn new(page: ScriptedPage) -> Self {
        Self {
            page,
            opens: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl BrowserDriver for MockBrowser {
    type Page = ScriptedPage;

    async fn open(&self, _session: &Session) -> AppResult<ScriptedPage> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(self.page.clone())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

// ========== 会话缓存伪实现 ==========

#[derive(Clone, Copy)]
enum MockSessionStore {
    Present,
    Absent,
    Broken,
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn load(&self, _key: &str) -> AppResult<Option<Session>> {
        match self {
            MockSessionStore::Present => Ok(Some(sample_session())),
            MockSessionStore::Absent => Ok(None),
            MockSessionStore::Broken => Err(AppError::session_store_unavailable(
                std::io::Error::other("连接被拒绝"),
            )),
        }
    }
}

// ========== 识别服务伪实现 ==========

#[derive(Clone)]
enum MockCaptcha {
    Solved(&'static str),
    StatusFailed,
    Unreachable,
}

#[async_trait]
impl CaptchaApi for MockCaptcha {
    async fn submit_image(&self, _image_b64: &str) -> AppResult<String> {
        match self {
            MockCaptcha::Unreachable => Err(AppError::captcha_request_failed(
                "https://solver.test/captcha/image",
                std::io::Error::other("连接被拒绝"),
            )),
            _ => Ok("42".to_string()),
        }
    }

    async fn fetch_result(&self, _challenge_id: &str) -> AppResult<CaptchaSolution> {
        match self {
            MockCaptcha::Solved(text) => Ok(CaptchaSolution::completed(*text)),
            MockCaptcha::StatusFailed => Ok(CaptchaSolution::unsolved(CaptchaStatus::Failed)),
            MockCaptcha::Unreachable => unreachable!("提交阶段已经失败"),
        }
    }
}

// ========== 测试辅助 ==========

fn sample_session() -> Session {
    Session {
        cookies: vec![StoredCookie {
            name: "ASP.NET_SessionId".to_string(),
            value: "abc123".to_string(),
            domain: Some("harb.cma.gov.il".to_string()),
            path: Some("/".to_string()),
            expires: None,
            http_only: Some(true),
            secure: Some(true),
            same_site: None,
        }],
    }
}

fn sample_query() -> UserQuery {
    serde_json::from_str(
        r#"{"subjectId":"306955741","birthDate":"1987-01-01","issueDate":"2023-10-01","requesterId":7877}"#,
    )
    .unwrap()
}

fn sample_ctx() -> RequestCtx {
    RequestCtx::new("7877", "test-client", "req-1")
}

fn test_config() -> Config {
    Config {
        target_url: "https://portal.test/entry".to_string(),
        portal_base_url: "https://portal.test".to_string(),
        wait_timeout_secs: 1,
        ..Config::default()
    }
}

fn fixture_rows() -> JsonValue {
    json!([["Policy", "Premium"], ["P-1", "100"], ["P-2", "250"]])
}

fn agent_with(
    store: MockSessionStore,
    browser: MockBrowser,
    captcha: MockCaptcha,
) -> UserDataAgent<MockSessionStore, MockBrowser, MockCaptcha> {
    UserDataAgent::new(test_config(), store, browser, captcha)
}

// ========== 测试 ==========

#[tokio::test]
async fn test_successful_run_returns_fixture_rows() {
    let page = ScriptedPage::new(PageBehavior::default());
    let browser = MockBrowser::new(page.clone());
    let agent = agent_with(
        MockSessionStore::Present,
        browser.clone(),
        MockCaptcha::Solved("X7K9QA"),
    );

    let reply = agent.get_user_data(&sample_query(), &sample_ctx()).await;

    assert!(reply.is_success);
    assert_eq!(reply.status_code, status_code::SUCCESS);
    assert_eq!(
        reply.data.unwrap(),
        vec![
            vec!["Policy".to_string(), "Premium".to_string()],
            vec!["P-1".to_string(), "100".to_string()],
            vec!["P-2".to_string(), "250".to_string()],
        ]
    );
    assert_eq!(browser.opens.load(Ordering::SeqCst), 1);
    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_successful_run_fills_and_submits_in_order() {
    let page = ScriptedPage::new(PageBehavior::default());
    let browser = MockBrowser::new(page.clone());
    let agent = agent_with(
        MockSessionStore::Present,
        browser,
        MockCaptcha::Solved("X7K9QA"),
    );

    agent.get_user_data(&sample_query(), &sample_ctx()).await;

    let fills = page.fills();
    assert!(fills.contains(&("#txtId".to_string(), "306955741".to_string())));
    assert!(fills.contains(&("#CaptchaCode".to_string(), "X7K9QA".to_string())));

    // 提交在前，触发导出在后
    let clicks = page.clicks();
    assert_eq!(clicks, vec!["#butIdent".to_string(), "#butInsuranceOf".to_string()]);
}

#[tokio::test]
async fn test_missing_session_skips_browser_entirely() {
    let page = ScriptedPage::new(PageBehavior::default());
    let browser = MockBrowser::new(page);
    let agent = agent_with(
        MockSessionStore::Absent,
        browser.clone(),
        MockCaptcha::Solved("X7K9QA"),
    );

    let reply = agent.get_user_data(&sample_query(), &sample_ctx()).await;

    assert!(!reply.is_success);
    assert_eq!(reply.status_code, status_code::NO_SESSION);
    assert!(reply.data.is_none());
    assert_eq!(browser.opens.load(Ordering::SeqCst), 0);
    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_broken_session_store_is_unexpected_failure() {
    let page = ScriptedPage::new(PageBehavior::default());
    let browser = MockBrowser::new(page);
    let agent = agent_with(
        MockSessionStore::Broken,
        browser.clone(),
        MockCaptcha::Solved("X7K9QA"),
    );

    let reply = agent.get_user_data(&sample_query(), &sample_ctx()).await;

    assert_eq!(reply.status_code, status_code::UNEXPECTED);
    assert_eq!(browser.opens.load(Ordering::SeqCst), 0);
    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_captcha_status_blocks_submission() {
    let page = ScriptedPage::new(PageBehavior::default());
    let browser = MockBrowser::new(page.clone());
    let agent = agent_with(
        MockSessionStore::Present,
        browser.clone(),
        MockCaptcha::StatusFailed,
    );

    let reply = agent.get_user_data(&sample_query(), &sample_ctx()).await;

    assert!(!reply.is_success);
    assert_eq!(reply.status_code, status_code::PROCESSING_FAILED);
    // 验证码失败后不能提交表单
    assert!(!page.clicks().contains(&"#butIdent".to_string()));
    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_captcha_service_is_processing_failure() {
    let page = ScriptedPage::new(PageBehavior::default());
    let browser = MockBrowser::new(page.clone());
    let agent = agent_with(
        MockSessionStore::Present,
        browser.clone(),
        MockCaptcha::Unreachable,
    );

    let reply = agent.get_user_data(&sample_query(), &sample_ctx()).await;

    assert_eq!(reply.status_code, status_code::PROCESSING_FAILED);
    assert!(!page.clicks().contains(&"#butIdent".to_string()));
    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_form_fill_failure_blocks_submission() {
    let page = ScriptedPage::new(PageBehavior {
        fail_wait_selectors: vec!["#txtId"],
        ..PageBehavior::default()
    });
    let browser = MockBrowser::new(page.clone());
    let agent = agent_with(
        MockSessionStore::Present,
        browser.clone(),
        MockCaptcha::Solved("X7K9QA"),
    );

    let reply = agent.get_user_data(&sample_query(), &sample_ctx()).await;

    assert_eq!(reply.status_code, status_code::PROCESSING_FAILED);
    // 即便验证码已解出，填表失败也不允许提交
    assert!(!page.clicks().contains(&"#butIdent".to_string()));
    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_navigation_failure_is_unexpected() {
    let page = ScriptedPage::new(PageBehavior {
        fail_navigation: true,
        ..PageBehavior::default()
    });
    let browser = MockBrowser::new(page);
    let agent = agent_with(
        MockSessionStore::Present,
        browser.clone(),
        MockCaptcha::Solved("X7K9QA"),
    );

    let reply = agent.get_user_data(&sample_query(), &sample_ctx()).await;

    assert_eq!(reply.status_code, status_code::UNEXPECTED);
    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_result_page_timeout_is_unexpected() {
    let page = ScriptedPage::new(PageBehavior {
        fail_wait_selectors: vec!["#butInsuranceOf"],
        ..PageBehavior::default()
    });
    let browser = MockBrowser::new(page.clone());
    let agent = agent_with(
        MockSessionStore::Present,
        browser.clone(),
        MockCaptcha::Solved("X7K9QA"),
    );

    let reply = agent.get_user_data(&sample_query(), &sample_ctx()).await;

    assert_eq!(reply.status_code, status_code::UNEXPECTED);
    // 提交已经发生，但导出没有被触发
    assert_eq!(page.clicks(), vec!["#butIdent".to_string()]);
    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_export_link_is_unexpected() {
    let page = ScriptedPage::new(PageBehavior {
        export_href: None,
        ..PageBehavior::default()
    });
    let browser = MockBrowser::new(page);
    let agent = agent_with(
        MockSessionStore::Present,
        browser.clone(),
        MockCaptcha::Solved("X7K9QA"),
    );

    let reply = agent.get_user_data(&sample_query(), &sample_ctx()).await;

    assert_eq!(reply.status_code, status_code::UNEXPECTED);
    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_table_is_still_success() {
    let page = ScriptedPage::new(PageBehavior {
        table_rows: json!([]),
        ..PageBehavior::default()
    });
    let browser = MockBrowser::new(page);
    let agent = agent_with(
        MockSessionStore::Present,
        browser.clone(),
        MockCaptcha::Solved("X7K9QA"),
    );

    let reply = agent.get_user_data(&sample_query(), &sample_ctx()).await;

    assert!(reply.is_success);
    assert_eq!(reply.status_code, status_code::SUCCESS);
    assert!(reply.data.unwrap().is_empty());
    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
}
