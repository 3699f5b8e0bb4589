// ==========================================
// 值班排班系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 产能错误 / 无解 / 超时三者必须可区分, 映射不同退出码
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 求解前产能校验 =====
    #[error("总班次产能不足: 每块需求 {required} 人班, 可用上限 {available} 人班 ({engineers} 人 × {max_shifts} 班)")]
    CapacityShortfall {
        required: u32,
        available: u32,
        engineers: u32,
        max_shifts: u32,
    },

    #[error("周末角色产能不足: 每块需求 {required} 个周末班, 可用上限 {available} ({engineers} 人 × {max_weekends} 班)")]
    WeekendCapacityShortfall {
        required: u32,
        available: u32,
        engineers: u32,
        max_weekends: u32,
    },

    // ===== 求解结果 =====
    #[error("排班无可行解")]
    Infeasible,

    #[error("求解超时 ({seconds} 秒)")]
    Timeout { seconds: f64 },

    // ===== 后端与内部错误 =====
    #[error("求解器错误: {0}")]
    Solver(String),

    #[error("本地时刻无法映射到时区: {0}")]
    LocalTime(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl EngineError {
    /// 是否为求解前的产能错误 (归入配置错误退出码)
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            EngineError::CapacityShortfall { .. } | EngineError::WeekendCapacityShortfall { .. }
        )
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
