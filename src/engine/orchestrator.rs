// ==========================================
// 值班排班系统 - 分块编排引擎
// ==========================================
// 职责: 按块号顺序驱动 可用性解析 -> 建模 -> 求解, 拼接结果
// 红线: 块 k+1 的禁排依赖块 k 的结果, 严格串行;
//       任一块无解或超时即整体中止, 不输出部分排班
// ==========================================

use crate::domain::{Block, BlockAssignment, RosterProblem, Shift, UnavailabilityRecord};
use crate::engine::availability::AvailabilityResolver;
use crate::engine::calendar::CalendarMapper;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::model_builder::RosterModelBuilder;
use crate::engine::solver::{BlockSolver, SolveOutcome};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

// ==========================================
// RosterResult - 完整排班结果
// ==========================================
#[derive(Debug, Clone)]
pub struct RosterResult {
    pub assignments: Vec<BlockAssignment>, // 按块号排列
    pub shifts: Vec<Shift>,                // (块, 周, 角色, 条目, 星期) 序
}

// ==========================================
// RosterOrchestrator - 分块编排引擎
// ==========================================
pub struct RosterOrchestrator<'a> {
    problem: &'a RosterProblem,
    records: &'a [UnavailabilityRecord],
}

impl<'a> RosterOrchestrator<'a> {
    /// 构造函数
    ///
    /// # 参数
    /// - problem: 排班问题定义
    /// - records: 不可用时段记录
    pub fn new(problem: &'a RosterProblem, records: &'a [UnavailabilityRecord]) -> Self {
        Self { problem, records }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行完整排班流程
    ///
    /// # 返回
    /// 全部块的排班与具体班次列表; 无解 / 超时 / 产能不足时返回对应错误
    pub fn run(&self) -> EngineResult<RosterResult> {
        let builder = RosterModelBuilder::new(self.problem);

        // 产能预校验, 先于任何求解
        builder.check_capacity()?;

        let solver = BlockSolver::new(self.problem.timeout_seconds);
        let mut assignments: Vec<BlockAssignment> = Vec::new();

        info!(
            blocks = self.problem.num_blocks,
            weeks_per_block = self.problem.weeks_per_block,
            team = self.problem.team.len(),
            roles = self.problem.roles.len(),
            "开始分块排班"
        );

        for block_index in 0..self.problem.num_blocks as usize {
            let block = Block::nth(
                self.problem.start_date,
                block_index,
                self.problem.weeks_per_block,
            );

            // 步骤1: 不可用时段 -> 禁排对 (availability 规则关闭时不生效)
            let mut forbidden = if self.problem.rules.availability {
                AvailabilityResolver::forbidden_pairs(self.records, &self.problem.team, &block)
            } else {
                HashSet::new()
            };

            // 步骤2: 跨块连续性 - 上一块末周的值班人禁排本块第 0 周
            if block_index > 0 && self.problem.rules.no_consecutive_weeks {
                if let Some(previous) = assignments.last() {
                    let last_week = self.problem.weeks_per_block as usize - 1;
                    for engineer in previous.engineers_in_week(last_week) {
                        forbidden.insert((engineer, 0));
                    }
                }
            }

            // 步骤3: 建模
            let model = builder.build(&forbidden);
            debug!(
                block = block_index,
                start = %block.start,
                forbidden = forbidden.len(),
                "单块模型就绪"
            );

            // 步骤4: 求解; 无解或超时即中止整个流程
            let outcome = solver.solve(block_index, model)?;
            info!(block = block_index, status = %outcome.status(), "单块求解结束");
            match outcome {
                SolveOutcome::Feasible(assignment) => assignments.push(assignment),
                SolveOutcome::Infeasible => {
                    self.log_infeasible(&builder, block_index);
                    return Err(EngineError::Infeasible);
                }
                SolveOutcome::Timeout => {
                    warn!(
                        block = block_index,
                        timeout_seconds = self.problem.timeout_seconds,
                        "可尝试提高 solver.timeout_seconds 或放宽规则开关"
                    );
                    return Err(EngineError::Timeout {
                        seconds: self.problem.timeout_seconds,
                    });
                }
            }
        }

        let shifts = self.derive_shifts(&assignments)?;
        info!(shifts = shifts.len(), "排班流程完成");

        Ok(RosterResult {
            assignments,
            shifts,
        })
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 从排班结果展开具体班次
    ///
    /// 输出顺序: 块 -> 周 -> 角色 (配置声明序) -> 条目 -> 星期
    fn derive_shifts(&self, assignments: &[BlockAssignment]) -> EngineResult<Vec<Shift>> {
        let mapper = CalendarMapper::new(self.problem.timezone);
        let weeks_per_block = self.problem.weeks_per_block as usize;
        let mut shifts = Vec::new();

        for assignment in assignments {
            let block = Block::nth(
                self.problem.start_date,
                assignment.block_index,
                self.problem.weeks_per_block,
            );
            for week in block.weeks_iter() {
                let global_week = assignment.block_index * weeks_per_block + week.week_index + 1;
                for (role_index, role) in self.problem.roles.iter().enumerate() {
                    if let Some(engineer_index) = assignment.slots[week.week_index][role_index] {
                        shifts.extend(mapper.shifts_for(
                            &week,
                            role,
                            &self.problem.team[engineer_index],
                            global_week,
                        )?);
                    }
                }
            }
        }

        Ok(shifts)
    }

    /// 无解诊断: 输出启用的规则与产能数字
    fn log_infeasible(&self, builder: &RosterModelBuilder<'_>, block_index: usize) {
        let figures = builder.capacity_figures();
        error!(
            block = block_index,
            enabled_rules = ?self.problem.rules.enabled_names(),
            required_per_block = figures.required_per_block,
            available_per_block = figures.available_per_block,
            weekend_required = ?figures.weekend_required,
            weekend_available = ?figures.weekend_available,
            "约束矛盾, 无可行排班"
        );
    }
}
