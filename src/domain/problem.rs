// ==========================================
// 值班排班系统 - 排班问题定义
// ==========================================
// 职责: 聚合团队/角色/约束参数/规则开关, 供引擎消费
// 红线: 加载完成后整体不可变
// ==========================================

use crate::domain::team::Role;
use crate::domain::types::RuleToggles;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

// ==========================================
// ConstraintParams - 约束参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintParams {
    pub max_shifts_per_engineer: u32,   // 块内每人总班次上限
    pub max_weekends_per_engineer: u32, // 块内每人周末角色班次上限
    pub weekend_role: Option<String>,   // 计入周末上限的角色 code
}

// ==========================================
// RosterProblem - 排班问题
// ==========================================
#[derive(Debug, Clone)]
pub struct RosterProblem {
    pub team: Vec<String>,          // 工程师名单 (顺序即下标)
    pub roles: Vec<Role>,           // 角色列表 (保持配置声明顺序)
    pub start_date: NaiveDate,      // 全局起始日期
    pub num_blocks: u32,            // 块数
    pub weeks_per_block: u32,       // 每块周数 W
    pub timezone: Tz,               // 班次时刻所在时区
    pub constraints: ConstraintParams,
    pub rules: RuleToggles,
    pub timeout_seconds: f64,       // 单块求解墙钟时限
}

impl RosterProblem {
    /// 工程师名 -> 下标
    pub fn engineer_index(&self, name: &str) -> Option<usize> {
        self.team.iter().position(|e| e == name)
    }

    /// 角色 code -> 下标
    pub fn role_index(&self, code: &str) -> Option<usize> {
        self.roles.iter().position(|r| r.code == code)
    }

    /// 周末角色下标 (配置了 weekend_role 且存在时)
    pub fn weekend_role_index(&self) -> Option<usize> {
        self.constraints
            .weekend_role
            .as_deref()
            .and_then(|code| self.role_index(code))
    }
}
