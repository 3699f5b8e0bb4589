// ==========================================
// 值班排班系统 - 配置校验引擎
// ==========================================
// 职责: 求解前独立复查输入结构与产能可行性
// 输出: 结构化问题列表 (Error / Warning), 含产能分析
// 红线: 存在任一 Error 时 generate 拒绝运行; Warning 仅告警
// ==========================================

use crate::domain::{RosterProblem, UnavailabilityRecord};
use crate::engine::error::EngineError;
use crate::engine::model_builder::{CapacityFigures, RosterModelBuilder};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

// ==========================================
// Severity - 问题级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

// ==========================================
// ValidationProblem - 单个校验问题
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ValidationProblem {
    pub severity: Severity,
    pub code: String,                        // 机器可读标识
    pub message: String,                     // 人类可读描述
    pub details: Option<serde_json::Value>,  // 结构化补充信息
}

impl ValidationProblem {
    fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warning(code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

// ==========================================
// CapacityAnalysis - 产能分析
// ==========================================
// validate 命令的控制台输出数据
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CapacityAnalysis {
    pub engineers: u32,
    pub num_blocks: u32,
    pub weeks_per_block: u32,
    pub roles_per_week: u32,
    pub required_per_block: u32,
    pub available_per_block: u32,
    pub weekend_required: Option<u32>,
    pub weekend_available: Option<u32>,
}

impl CapacityAnalysis {
    fn from_figures(figures: CapacityFigures, num_blocks: u32) -> Self {
        Self {
            engineers: figures.engineers,
            num_blocks,
            weeks_per_block: figures.weeks_per_block,
            roles_per_week: figures.roles_per_week,
            required_per_block: figures.required_per_block,
            available_per_block: figures.available_per_block,
            weekend_required: figures.weekend_required,
            weekend_available: figures.weekend_available,
        }
    }
}

// ==========================================
// ConfigValidator - 配置校验引擎
// ==========================================
// 无状态引擎
pub struct ConfigValidator;

impl ConfigValidator {
    /// 校验排班问题与不可用记录
    ///
    /// 所有问题一次性收集, 不在首个问题处短路
    ///
    /// # 参数
    /// - problem: 排班问题定义
    /// - records: 不可用时段记录
    ///
    /// # 返回
    /// 问题列表 (可能为空)
    pub fn validate(
        problem: &RosterProblem,
        records: &[UnavailabilityRecord],
    ) -> Vec<ValidationProblem> {
        let mut problems = Vec::new();

        Self::check_team(problem, &mut problems);
        Self::check_schedule_params(problem, &mut problems);
        Self::check_roles(problem, &mut problems);
        Self::check_weekend_role(problem, &mut problems);
        Self::check_rule_combination(problem, &mut problems);
        Self::check_capacity(problem, &mut problems);
        Self::check_records(problem, records, &mut problems);

        problems
    }

    /// 产能分析数据 (validate 命令输出)
    pub fn capacity_analysis(problem: &RosterProblem) -> CapacityAnalysis {
        CapacityAnalysis::from_figures(
            RosterModelBuilder::new(problem).capacity_figures(),
            problem.num_blocks,
        )
    }

    /// 是否存在 Error 级问题
    pub fn has_errors(problems: &[ValidationProblem]) -> bool {
        problems.iter().any(|p| p.severity == Severity::Error)
    }

    // ==========================================
    // 各项检查
    // ==========================================

    fn check_team(problem: &RosterProblem, problems: &mut Vec<ValidationProblem>) {
        if problem.team.is_empty() {
            problems.push(ValidationProblem::error("TEAM_EMPTY", "team 不能为空"));
            return;
        }

        let mut seen = HashSet::new();
        for name in &problem.team {
            if name.trim().is_empty() {
                problems.push(ValidationProblem::error(
                    "ENGINEER_NAME_EMPTY",
                    "工程师名不能为空",
                ));
            } else if !seen.insert(name.as_str()) {
                problems.push(ValidationProblem::error(
                    "ENGINEER_NAME_DUPLICATE",
                    format!("工程师名重复: {name}"),
                ));
            }
        }
    }

    fn check_schedule_params(problem: &RosterProblem, problems: &mut Vec<ValidationProblem>) {
        if problem.weeks_per_block < 1 {
            problems.push(ValidationProblem::error(
                "WEEKS_PER_BLOCK_INVALID",
                format!(
                    "schedule.weeks_per_block 必须 >= 1, 实际 {}",
                    problem.weeks_per_block
                ),
            ));
        }
        if problem.num_blocks < 1 {
            problems.push(ValidationProblem::error(
                "NUM_BLOCKS_INVALID",
                format!("schedule.num_blocks 必须 >= 1, 实际 {}", problem.num_blocks),
            ));
        }
        if problem.timeout_seconds <= 0.0 {
            problems.push(ValidationProblem::error(
                "TIMEOUT_INVALID",
                format!(
                    "solver.timeout_seconds 必须 > 0, 实际 {}",
                    problem.timeout_seconds
                ),
            ));
        }
    }

    fn check_roles(problem: &RosterProblem, problems: &mut Vec<ValidationProblem>) {
        if problem.roles.is_empty() {
            problems.push(ValidationProblem::error("ROLES_EMPTY", "roles 不能为空"));
            return;
        }

        for role in &problem.roles {
            if role.entries.is_empty() {
                problems.push(ValidationProblem::error(
                    "ROLE_NO_ENTRIES",
                    format!("角色 {} 没有任何班表条目", role.code),
                ));
            }
            for (i, entry) in role.entries.iter().enumerate() {
                if entry.days.is_empty() {
                    problems.push(ValidationProblem::error(
                        "ENTRY_NO_DAYS",
                        format!("角色 {} 第 {} 个班表条目未指定星期", role.code, i + 1),
                    ));
                }
                if entry.span_days < 1 {
                    problems.push(ValidationProblem::error(
                        "ENTRY_SPAN_INVALID",
                        format!(
                            "角色 {} 第 {} 个班表条目 span_days 必须 >= 1",
                            role.code,
                            i + 1
                        ),
                    ));
                }
            }
        }
    }

    fn check_weekend_role(problem: &RosterProblem, problems: &mut Vec<ValidationProblem>) {
        if let Some(code) = problem.constraints.weekend_role.as_deref() {
            if problem.role_index(code).is_none() {
                problems.push(ValidationProblem::error(
                    "WEEKEND_ROLE_UNKNOWN",
                    format!("constraints.weekend_role 指向不存在的角色: {code}"),
                ));
            }
        } else if problem.rules.weekend_limit {
            problems.push(ValidationProblem::error(
                "WEEKEND_ROLE_MISSING",
                "rules.weekend_limit 开启时必须配置 constraints.weekend_role",
            ));
        }
    }

    fn check_rule_combination(problem: &RosterProblem, problems: &mut Vec<ValidationProblem>) {
        // 完整性与总量上限同时关闭会产生平凡空排班, 直接拒绝
        if !problem.rules.roster_completeness && !problem.rules.max_workload {
            problems.push(ValidationProblem::error(
                "RULES_DEGENERATE",
                "rules.roster_completeness 与 rules.max_workload 不可同时关闭",
            ));
        }
    }

    fn check_capacity(problem: &RosterProblem, problems: &mut Vec<ValidationProblem>) {
        let builder = RosterModelBuilder::new(problem);
        match builder.check_capacity() {
            Ok(()) => {}
            Err(EngineError::CapacityShortfall {
                required,
                available,
                engineers,
                max_shifts,
            }) => {
                problems.push(
                    ValidationProblem::error(
                        "CAPACITY_SHORTFALL",
                        format!(
                            "总班次产能不足: 每块需求 {required} 人班, 可用上限 {available} 人班"
                        ),
                    )
                    .with_details(serde_json::json!({
                        "required_per_block": required,
                        "available_per_block": available,
                        "engineers": engineers,
                        "max_shifts_per_engineer": max_shifts,
                    })),
                );
            }
            Err(EngineError::WeekendCapacityShortfall {
                required,
                available,
                engineers,
                max_weekends,
            }) => {
                problems.push(
                    ValidationProblem::error(
                        "WEEKEND_CAPACITY_SHORTFALL",
                        format!(
                            "周末角色产能不足: 每块需求 {required} 个周末班, 可用上限 {available}"
                        ),
                    )
                    .with_details(serde_json::json!({
                        "weekend_required": required,
                        "weekend_available": available,
                        "engineers": engineers,
                        "max_weekends_per_engineer": max_weekends,
                    })),
                );
            }
            Err(other) => {
                problems.push(ValidationProblem::error("CAPACITY_CHECK_FAILED", other.to_string()));
            }
        }
    }

    fn check_records(
        problem: &RosterProblem,
        records: &[UnavailabilityRecord],
        problems: &mut Vec<ValidationProblem>,
    ) {
        let known: HashSet<&str> = problem.team.iter().map(String::as_str).collect();
        for record in records {
            if !known.contains(record.engineer.as_str()) {
                problems.push(ValidationProblem::warning(
                    "UNKNOWN_ENGINEER",
                    format!("不可用记录指向名单外工程师: {}", record.engineer),
                ));
            }
        }
    }
}
