// ==========================================
// 值班排班系统 - 领域类型定义
// ==========================================
// 职责: 规则开关 / 求解状态 / 星期辅助函数
// ==========================================

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 规则开关 (Rule Toggles)
// ==========================================
// 每条约束可独立启停, 默认全部开启
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleToggles {
    pub roster_completeness: bool, // 每周每角色恰好一人
    pub role_separation: bool,     // 每人每周至多一个角色
    pub availability: bool,        // 不可用周禁止排班
    pub no_consecutive_weeks: bool, // 禁止连续两周值班
    pub max_workload: bool,        // 块内总班次上限
    pub weekend_limit: bool,       // 周末角色班次上限
}

impl Default for RuleToggles {
    fn default() -> Self {
        Self {
            roster_completeness: true,
            role_separation: true,
            availability: true,
            no_consecutive_weeks: true,
            max_workload: true,
            weekend_limit: true,
        }
    }
}

impl RuleToggles {
    /// 列出已启用规则的名称, 用于不可行时的诊断输出
    pub fn enabled_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.roster_completeness {
            names.push("roster_completeness");
        }
        if self.role_separation {
            names.push("role_separation");
        }
        if self.availability {
            names.push("availability");
        }
        if self.no_consecutive_weeks {
            names.push("no_consecutive_weeks");
        }
        if self.max_workload {
            names.push("max_workload");
        }
        if self.weekend_limit {
            names.push("weekend_limit");
        }
        names
    }
}

// ==========================================
// 求解状态 (Solve Status)
// ==========================================
// UNSAT 与超时必须区分, 映射到不同退出码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    Feasible,   // 找到可行解
    Infeasible, // 约束矛盾, 无解
    Timeout,    // 超过墙钟时限
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Feasible => write!(f, "FEASIBLE"),
            SolveStatus::Infeasible => write!(f, "INFEASIBLE"),
            SolveStatus::Timeout => write!(f, "TIMEOUT"),
        }
    }
}

// ==========================================
// 星期辅助函数
// ==========================================

/// 解析配置中的星期标记 (Mon/Tue/.../Sun, 大小写不敏感, 全称亦可)
pub fn parse_weekday(token: &str) -> Option<Weekday> {
    token.parse::<Weekday>().ok()
}

/// 星期的三字母标记, 用于 UID 与展示
pub fn weekday_token(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
