// ==========================================
// 值班排班系统 - 分块求解引擎
// ==========================================
// 职责: 在墙钟时限内求解单块模型并抽取排班结果
// 红线: 无解与超时必须区分; 后端无随机源, 同输入必同输出
// 红线: 后端必须对 0/1 变量做分支定界 (HiGHS),
//       纯 LP 松弛可能返回分数顶点, 不可接受
// ==========================================

use crate::domain::types::SolveStatus;
use crate::domain::BlockAssignment;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::model_builder::BlockModel;
use good_lp::{default_solver, Expression, ResolutionError, Solution, SolverModel};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

// ==========================================
// SolveOutcome - 单块求解结果
// ==========================================
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Feasible(BlockAssignment),
    Infeasible,
    Timeout,
}

impl SolveOutcome {
    /// 无负载的状态标识 (日志与诊断用)
    pub fn status(&self) -> SolveStatus {
        match self {
            SolveOutcome::Feasible(_) => SolveStatus::Feasible,
            SolveOutcome::Infeasible => SolveStatus::Infeasible,
            SolveOutcome::Timeout => SolveStatus::Timeout,
        }
    }
}

// ==========================================
// BlockSolver - 分块求解引擎
// ==========================================
pub struct BlockSolver {
    timeout: Duration,
}

impl BlockSolver {
    /// 构造函数
    ///
    /// # 参数
    /// - timeout_seconds: 单块墙钟时限 (秒)
    pub fn new(timeout_seconds: f64) -> Self {
        Self {
            timeout: Duration::from_secs_f64(timeout_seconds.max(0.001)),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 求解单块模型
    ///
    /// 求解在工作线程上执行, 主线程按时限等待结果;
    /// 超时后工作线程被放弃, 进程随即退出, 无需回收
    ///
    /// # 参数
    /// - block_index: 块号 (日志定位用)
    /// - model: 已构建的约束模型
    pub fn solve(&self, block_index: usize, model: BlockModel) -> EngineResult<SolveOutcome> {
        let num_engineers = model.num_engineers;
        let num_weeks = model.num_weeks;
        let num_roles = model.num_roles;
        let roster_completeness = model.roster_completeness;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let BlockModel {
                vars,
                x,
                constraints,
                ..
            } = model;

            // 纯可行性: 常数零目标
            let mut lp = vars.minimise(Expression::from(0.0)).using(default_solver);
            for c in constraints {
                lp = lp.with(c);
            }

            let outcome = match lp.solve() {
                Ok(solution) => Ok(x.iter().map(|v| solution.value(*v)).collect::<Vec<f64>>()),
                Err(e) => Err(e),
            };
            let _ = tx.send(outcome);
        });

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(values)) => {
                debug!(block = block_index, "求解完成, 开始抽取排班");
                let assignment = extract_assignment(
                    block_index,
                    num_engineers,
                    num_weeks,
                    num_roles,
                    roster_completeness,
                    &values,
                )?;
                Ok(SolveOutcome::Feasible(assignment))
            }
            Ok(Err(ResolutionError::Infeasible)) => Ok(SolveOutcome::Infeasible),
            Ok(Err(other)) => Err(EngineError::Solver(other.to_string())),
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    block = block_index,
                    timeout_seconds = self.timeout.as_secs_f64(),
                    "求解超时"
                );
                Ok(SolveOutcome::Timeout)
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(EngineError::Internal("求解线程异常退出".to_string()))
            }
        }
    }
}

/// 从变量取值抽取排班
///
/// 后端保证整数解, 0.5 阈值只是对 0/1 取值的浮点容差读取.
/// 每个 (周, 角色) 槽位应恰有一个取 1 的工程师;
/// 多于一个违反角色分离, 为内部错误; 完整性开启时缺人同样是内部错误
fn extract_assignment(
    block_index: usize,
    num_engineers: usize,
    num_weeks: usize,
    num_roles: usize,
    roster_completeness: bool,
    values: &[f64],
) -> EngineResult<BlockAssignment> {
    let idx = |e: usize, w: usize, r: usize| (e * num_weeks + w) * num_roles + r;
    let mut slots = vec![vec![None; num_roles]; num_weeks];

    for w in 0..num_weeks {
        for r in 0..num_roles {
            let assigned: Vec<usize> = (0..num_engineers)
                .filter(|&e| values[idx(e, w, r)] > 0.5)
                .collect();

            match assigned.as_slice() {
                [engineer] => slots[w][r] = Some(*engineer),
                [] if !roster_completeness => {}
                [] => {
                    return Err(EngineError::Internal(format!(
                        "块 {block_index} 第 {w} 周角色 {r} 无人被选中"
                    )))
                }
                many => {
                    return Err(EngineError::Internal(format!(
                        "块 {block_index} 第 {w} 周角色 {r} 被选中 {} 人",
                        many.len()
                    )))
                }
            }
        }
    }

    Ok(BlockAssignment {
        block_index,
        slots,
    })
}
