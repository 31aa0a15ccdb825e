//! 日志初始化
//!
//! 进程级日志配置。优先使用 RUST_LOG 环境变量，否则落到配置的级别。

use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅器
///
/// 重复调用是空操作（测试里可能被多次触发）。
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
