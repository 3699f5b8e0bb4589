// ==========================================
// 值班排班系统 - 约束模型构建引擎
// ==========================================
// 职责: 为单个块构建 0/1 决策变量与约束集
// 变量: x[e,w,r] = 工程师 e 在第 w 周担任角色 r
// 红线: 纯可行性建模, 不设目标函数; 产能校验先于求解, 与无解区分
// ==========================================

use crate::domain::RosterProblem;
use crate::engine::error::{EngineError, EngineResult};
use good_lp::{constraint, variable, variables, Constraint, Expression, ProblemVariables, Variable};
use std::collections::HashSet;
use tracing::debug;

// ==========================================
// BlockModel - 单块约束模型
// ==========================================
// 变量按 (e, w, r) 字典序编号, 顺序固定保证结果可复现
pub struct BlockModel {
    pub vars: ProblemVariables,
    pub x: Vec<Variable>,
    pub constraints: Vec<Constraint>,
    pub num_engineers: usize,
    pub num_weeks: usize,
    pub num_roles: usize,
    pub roster_completeness: bool,
}

impl BlockModel {
    /// (e, w, r) -> 变量下标
    pub fn var_index(&self, engineer: usize, week: usize, role: usize) -> usize {
        (engineer * self.num_weeks + week) * self.num_roles + role
    }
}

// ==========================================
// CapacityFigures - 产能校验数据
// ==========================================
// 不等式两侧的具体数字, 供校验输出与不可行诊断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityFigures {
    pub engineers: u32,
    pub roles_per_week: u32,
    pub weeks_per_block: u32,
    pub required_per_block: u32,  // W x R
    pub available_per_block: u32, // E x max_shifts
    pub weekend_required: Option<u32>,  // 周末角色有班表时 = W
    pub weekend_available: Option<u32>, // E x max_weekends
}

// ==========================================
// RosterModelBuilder - 约束模型构建引擎
// ==========================================
pub struct RosterModelBuilder<'a> {
    problem: &'a RosterProblem,
}

impl<'a> RosterModelBuilder<'a> {
    /// 构造函数
    ///
    /// # 参数
    /// - problem: 排班问题定义
    pub fn new(problem: &'a RosterProblem) -> Self {
        Self { problem }
    }

    // ==========================================
    // 产能预校验
    // ==========================================

    /// 计算产能不等式两侧数字
    pub fn capacity_figures(&self) -> CapacityFigures {
        let engineers = self.problem.team.len() as u32;
        let roles_per_week = self.problem.roles.len() as u32;
        let weeks = self.problem.weeks_per_block;

        let weekend = self.problem.weekend_role_index().map(|role_index| {
            let weekend_weeks = if self.problem.roles[role_index].has_entries() {
                weeks
            } else {
                0
            };
            (
                weekend_weeks,
                engineers * self.problem.constraints.max_weekends_per_engineer,
            )
        });

        CapacityFigures {
            engineers,
            roles_per_week,
            weeks_per_block: weeks,
            required_per_block: weeks * roles_per_week,
            available_per_block: engineers * self.problem.constraints.max_shifts_per_engineer,
            weekend_required: weekend.map(|(required, _)| required),
            weekend_available: weekend.map(|(_, available)| available),
        }
    }

    /// 求解前的产能校验
    ///
    /// 不满足即返回产能错误, 与求解器报告的无解严格区分
    pub fn check_capacity(&self) -> EngineResult<()> {
        let figures = self.capacity_figures();

        if self.problem.rules.max_workload
            && figures.available_per_block < figures.required_per_block
        {
            return Err(EngineError::CapacityShortfall {
                required: figures.required_per_block,
                available: figures.available_per_block,
                engineers: figures.engineers,
                max_shifts: self.problem.constraints.max_shifts_per_engineer,
            });
        }

        if self.problem.rules.weekend_limit {
            if let (Some(required), Some(available)) =
                (figures.weekend_required, figures.weekend_available)
            {
                if available < required {
                    return Err(EngineError::WeekendCapacityShortfall {
                        required,
                        available,
                        engineers: figures.engineers,
                        max_weekends: self.problem.constraints.max_weekends_per_engineer,
                    });
                }
            }
        }

        Ok(())
    }

    // ==========================================
    // 建模
    // ==========================================

    /// 构建单块模型
    ///
    /// # 参数
    /// - forbidden: 禁排 (工程师下标, 周号) 集合, 由编排器按规则开关组装
    ///
    /// # 返回
    /// 含决策变量与约束集的模型, 交由 BlockSolver 求解
    pub fn build(&self, forbidden: &HashSet<(usize, usize)>) -> BlockModel {
        let num_engineers = self.problem.team.len();
        let num_weeks = self.problem.weeks_per_block as usize;
        let num_roles = self.problem.roles.len();
        let rules = &self.problem.rules;

        let mut vars = variables!();
        let mut x = Vec::with_capacity(num_engineers * num_weeks * num_roles);
        for _ in 0..num_engineers * num_weeks * num_roles {
            x.push(vars.add(variable().binary()));
        }
        let idx = |e: usize, w: usize, r: usize| (e * num_weeks + w) * num_roles + r;

        let mut constraints = Vec::new();

        // 约束1: 排班完整性 - 每周每角色恰好一人
        if rules.roster_completeness {
            for w in 0..num_weeks {
                for r in 0..num_roles {
                    let filled = sum((0..num_engineers).map(|e| x[idx(e, w, r)]));
                    constraints.push(constraint!(filled == 1.0));
                }
            }
        }

        // 约束2: 角色分离 - 每人每周至多一个角色
        if rules.role_separation {
            for e in 0..num_engineers {
                for w in 0..num_weeks {
                    let load = sum((0..num_roles).map(|r| x[idx(e, w, r)]));
                    constraints.push(constraint!(load <= 1.0));
                }
            }
        }

        // 约束3: 禁排对 - 对应周全部角色置零
        for &(e, w) in forbidden {
            for r in 0..num_roles {
                let slot = x[idx(e, w, r)];
                constraints.push(constraint!(slot == 0.0));
            }
        }

        // 约束4: 禁止连续两周 (块内; 跨块由编排器经禁排对处理)
        if rules.no_consecutive_weeks {
            for e in 0..num_engineers {
                for w in 0..num_weeks.saturating_sub(1) {
                    let adjacent = sum(
                        (0..num_roles)
                            .map(|r| x[idx(e, w, r)])
                            .chain((0..num_roles).map(|r| x[idx(e, w + 1, r)])),
                    );
                    constraints.push(constraint!(adjacent <= 1.0));
                }
            }
        }

        // 约束5: 块内总班次上限
        if rules.max_workload {
            let cap = self.problem.constraints.max_shifts_per_engineer as f64;
            for e in 0..num_engineers {
                let mut total = Expression::from(0.0);
                for w in 0..num_weeks {
                    for r in 0..num_roles {
                        total = total + x[idx(e, w, r)];
                    }
                }
                constraints.push(constraint!(total <= cap));
            }
        }

        // 约束6: 周末角色班次上限
        if rules.weekend_limit {
            if let Some(weekend_role) = self.problem.weekend_role_index() {
                let cap = self.problem.constraints.max_weekends_per_engineer as f64;
                for e in 0..num_engineers {
                    let weekends = sum((0..num_weeks).map(|w| x[idx(e, w, weekend_role)]));
                    constraints.push(constraint!(weekends <= cap));
                }
            }
        }

        debug!(
            variables = x.len(),
            constraints = constraints.len(),
            forbidden = forbidden.len(),
            "约束模型构建完成"
        );

        BlockModel {
            vars,
            x,
            constraints,
            num_engineers,
            num_weeks,
            num_roles,
            roster_completeness: rules.roster_completeness,
        }
    }
}

/// 变量求和表达式
fn sum(terms: impl Iterator<Item = Variable>) -> Expression {
    terms.fold(Expression::from(0.0), |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RuleToggles;
    use crate::domain::{ConstraintParams, Role, ScheduleEntry};
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn day_role(code: &str) -> Role {
        Role::new(code, code).with_entry(ScheduleEntry::new(
            vec![Weekday::Mon],
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        ))
    }

    fn problem(team: usize, roles: usize, weeks: u32, max_shifts: u32) -> RosterProblem {
        RosterProblem {
            team: (0..team).map(|i| format!("E{i}")).collect(),
            roles: (0..roles).map(|i| day_role(&format!("R{i}"))).collect(),
            start_date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
            num_blocks: 1,
            weeks_per_block: weeks,
            timezone: chrono_tz::UTC,
            constraints: ConstraintParams {
                max_shifts_per_engineer: max_shifts,
                max_weekends_per_engineer: 1,
                weekend_role: None,
            },
            rules: RuleToggles::default(),
            timeout_seconds: 10.0,
        }
    }

    #[test]
    fn test_variable_count() {
        let p = problem(4, 2, 3, 2);
        let model = RosterModelBuilder::new(&p).build(&HashSet::new());
        assert_eq!(model.x.len(), 4 * 3 * 2);
        assert_eq!(model.var_index(0, 0, 0), 0);
        assert_eq!(model.var_index(3, 2, 1), 23);
    }

    #[test]
    fn test_capacity_ok() {
        // 3 人 x 3 班 = 9 >= 3 周 x 2 角色 = 6
        let p = problem(3, 2, 3, 3);
        assert!(RosterModelBuilder::new(&p).check_capacity().is_ok());
    }

    #[test]
    fn test_capacity_shortfall() {
        // 3 人 x 3 班 = 9 < 6 周 x 2 角色 = 12
        let p = problem(3, 2, 6, 3);
        let err = RosterModelBuilder::new(&p).check_capacity().unwrap_err();
        match err {
            EngineError::CapacityShortfall {
                required,
                available,
                ..
            } => {
                assert_eq!(required, 12);
                assert_eq!(available, 9);
            }
            other => panic!("意外错误: {other}"),
        }
    }

    #[test]
    fn test_capacity_not_checked_when_workload_rule_off() {
        let mut p = problem(3, 2, 6, 3);
        p.rules.max_workload = false;
        assert!(RosterModelBuilder::new(&p).check_capacity().is_ok());
    }

    #[test]
    fn test_weekend_capacity_shortfall() {
        // 2 人 x 1 周末班 = 2 < 3 周
        let mut p = problem(2, 1, 3, 3);
        p.constraints.weekend_role = Some("R0".to_string());
        let err = RosterModelBuilder::new(&p).check_capacity().unwrap_err();
        match err {
            EngineError::WeekendCapacityShortfall {
                required,
                available,
                ..
            } => {
                assert_eq!(required, 3);
                assert_eq!(available, 2);
            }
            other => panic!("意外错误: {other}"),
        }
    }

    #[test]
    fn test_constraint_counts_all_rules_on() {
        let p = problem(4, 2, 3, 2);
        let forbidden = HashSet::from([(0, 1)]);
        let model = RosterModelBuilder::new(&p).build(&forbidden);

        // 完整性 3x2 + 角色分离 4x3 + 禁排 1x2
        // + 连续周 4x2 + 总量 4 (无周末角色)
        assert_eq!(model.constraints.len(), 6 + 12 + 2 + 8 + 4);
    }

    #[test]
    fn test_rules_off_skip_constraints() {
        let mut p = problem(4, 2, 3, 2);
        p.rules = RuleToggles {
            roster_completeness: true,
            role_separation: false,
            availability: false,
            no_consecutive_weeks: false,
            max_workload: false,
            weekend_limit: false,
        };
        let model = RosterModelBuilder::new(&p).build(&HashSet::new());
        // 仅剩完整性约束
        assert_eq!(model.constraints.len(), 6);
    }
}
