//! 基础设施层（Infrastructure Layer）
//!
//! 持有稀缺资源（浏览器页面），只向上层暴露页面操作能力。
//! 能力以 `PageDriver` trait 的形式定义，流程层和业务层都只依赖
//! trait，这样状态机可以用固定页面内容的伪实现来测试，
//! 而不需要真实浏览器。

pub mod page_driver;

pub use page_driver::{CdpPage, PageDriver};
