// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 红线: 表格与 CSV 走 stdout, 日志一律走 stderr, 互不污染
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

// 缺省过滤: 依赖库只放行 warn, 本 crate 放行 info
const DEFAULT_FILTER: &str = "warn,oncall_roster=info";

/// 初始化命令行日志
///
/// 输出到 stderr, 紧凑格式 (不带 target / 行号),
/// 便于把 stdout 重定向到文件或管道
///
/// # 环境变量
/// - RUST_LOG: 覆盖缺省过滤器
///   例如: RUST_LOG=oncall_roster=debug
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 初始化测试环境的日志系统
///
/// 仅放行本 crate 的 debug, 输出交给测试框架捕获;
/// 重复调用安全 (后续调用为空操作)
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("oncall_roster=debug"))
        .with_test_writer()
        .try_init();
}
