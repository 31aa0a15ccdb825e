//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层是一次请求的入口（由仓库之外的 HTTP 层调用），负责把
//! 各个组件接成一条请求生命周期。
//!
//! ### `agent` - 用户数据代理
//! - 读取会话（没有会话时根本不启动浏览器）
//! - 打开浏览器并注入会话
//! - 委托 workflow::FormFlow 跑页面流程
//! - 委托 services::TableExtractor 提取表格
//! - 把内部失败原因映射为对外状态码分类
//! - 保证浏览器在每条退出路径上都被关闭
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::UserDataAgent (一次请求)
//!     ↓
//! workflow::FormFlow (页面步骤序列)
//!     ↓
//! services (能力层：fill / captcha / extract / session)
//!     ↓
//! infrastructure (基础设施：PageDriver)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层决定浏览器的打开与关闭
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **完整信封**：调用方永远收到结构完整的应答，内部错误不外泄

pub mod agent;

pub use agent::UserDataAgent;
