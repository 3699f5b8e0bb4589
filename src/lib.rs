// ==========================================
// 值班排班系统 - 核心库
// ==========================================
// 技术栈: Rust + good_lp (约束求解)
// 系统定位: 多周值班表生成工具 (可行性求解, 无目标函数)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - YAML 配置加载
pub mod config;

// 导入层 - 不可用时段 CSV
pub mod importer;

// 引擎层 - 日历映射/约束建模/分块求解
pub mod engine;

// 导出层 - CSV / iCal / 控制台表格
pub mod export;

// 应用层 - 命令编排与退出码
pub mod app;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{RuleToggles, SolveStatus};

// 领域实体
pub use domain::{
    Block, BlockAssignment, ConstraintParams, Role, RosterProblem, ScheduleEntry, Shift,
    UnavailabilityRecord, Week,
};

// 引擎
pub use engine::{
    AvailabilityResolver, BlockSolver, CalendarMapper, ConfigValidator, RosterModelBuilder,
    RosterOrchestrator, RosterResult,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "值班排班系统";
