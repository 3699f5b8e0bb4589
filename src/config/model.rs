// ==========================================
// 值班排班系统 - 配置文件模型
// ==========================================
// 职责: YAML 配置的 serde 映射 (字符串原样承载)
// 红线: 日期/时刻/星期/时区在 loader 中转换并逐字段报错
// ==========================================

use crate::domain::types::RuleToggles;
use crate::domain::ConstraintParams;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ==========================================
// AppConfig - 配置文件根结构
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub team: Vec<String>,                     // 工程师名单
    pub schedule: ScheduleSection,             // 排期参数
    pub roles: IndexMap<String, RoleSection>,  // 角色表 (保持声明顺序)
    pub constraints: ConstraintParams,         // 约束参数
    #[serde(default)]
    pub rules: RuleToggles,                    // 规则开关 (缺省全开)
    pub solver: SolverSection,                 // 求解器参数
    pub files: FilesSection,                   // 输入输出文件
}

// ==========================================
// ScheduleSection - 排期参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSection {
    pub start_date: String,     // ISO-8601 日期, loader 转换
    pub num_blocks: u32,        // 块数
    pub weeks_per_block: u32,   // 每块周数
    pub timezone: String,       // IANA 时区名
}

// ==========================================
// RoleSection - 单个角色
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleSection {
    pub name: String,                  // 展示名称
    pub schedule: Vec<EntrySection>,   // 班表条目
}

// ==========================================
// EntrySection - 班表条目
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntrySection {
    pub days: Vec<String>,      // 星期标记 (Mon/.../Sun)
    pub start_time: String,     // HH:MM
    pub end_time: String,       // HH:MM (可早于 start_time, 表示跨午夜)
    #[serde(default = "default_span_days")]
    pub span_days: u32,         // 跨天数, 缺省 1
}

fn default_span_days() -> u32 {
    1
}

// ==========================================
// SolverSection - 求解器参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverSection {
    pub timeout_seconds: f64, // 单块墙钟时限
}

// ==========================================
// ExportFormat - 导出格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Ical,
}

// ==========================================
// FilesSection - 输入输出文件
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesSection {
    #[serde(default)]
    pub availability_csv: Option<String>,   // 不可用时段 CSV (可选)
    pub export_formats: Vec<ExportFormat>,  // 导出格式列表
    #[serde(default = "default_csv_output")]
    pub csv_output: String,                 // 排班表 CSV 输出路径
    #[serde(default = "default_ical_output")]
    pub ical_output: String,                // iCal 输出路径
}

fn default_csv_output() -> String {
    "schedule.csv".to_string()
}

fn default_ical_output() -> String {
    "schedule.ics".to_string()
}
