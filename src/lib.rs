//! # Harb Data Agent
//!
//! 一个驱动第三方门户网页流程、取回用户保单数据的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageDriver` - 页面操作能力，`CdpPage` 是唯一的 page owner
//! - `browser/` - 浏览器生命周期（打开/幂等关闭）与会话注入
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单次运行
//! - `FormFiller` - 证件号码 + 两个日期控件 + 条款勾选
//! - `CaptchaSolverService` - 截图验证码并调用外部识别服务
//! - `TableExtractor` - 定位导出链接并读取表格
//! - `SessionStore` - 从缓存读取登录会话
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次查询"的完整页面步骤序列
//! - `RequestCtx` - 请求关联上下文（userId + clientId + requestId）
//! - `FormFlow` - 步骤编排（导航 → 并发{填表, 验证码} → 提交 → 结果页 → 导出）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/agent` - 请求入口，接线、状态码映射、浏览器收尾
//!
//! ## 模块结构

pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod selectors;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{BrowserDriver, CdpBrowser};
pub use clients::{BcsCaptchaClient, CaptchaApi};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{CdpPage, PageDriver};
pub use models::{Reply, Session, TableRows, UserQuery};
pub use orchestrator::UserDataAgent;
pub use services::{RedisSessionStore, SessionStore, TableExtractor};
pub use workflow::{FormFlow, RequestCtx};
