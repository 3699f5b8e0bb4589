// ==========================================
// 值班排班系统 - 领域层
// ==========================================
// 职责: 实体与类型定义, 不含求解逻辑
// 红线: 领域对象加载后不可变, 求解产物按块生成
// ==========================================

pub mod problem;
pub mod roster;
pub mod team;
pub mod types;

// 重导出核心实体
pub use problem::{ConstraintParams, RosterProblem};
pub use roster::{Block, BlockAssignment, Shift, UnavailabilityRecord, Week};
pub use team::{Role, ScheduleEntry};
