//! 浏览器资源管理
//!
//! 一次运行独占一个浏览器实例和一个浏览上下文，`BrowserDriver`
//! 定义打开/关闭两个生命周期操作，`CdpBrowser` 是真实实现。

pub mod driver;
pub mod launch;

pub use driver::{BrowserDriver, CdpBrowser};
