// ==========================================
// 值班排班系统 - 可用性解析引擎
// ==========================================
// 职责: 不可用日期区间 x 周窗口 -> 禁排 (工程师, 周) 对
// 红线: 闭区间记录与半开周窗口相交, 单日重叠即禁排整周
// ==========================================

use crate::domain::{Block, UnavailabilityRecord};
use std::collections::HashSet;

// ==========================================
// AvailabilityResolver - 可用性解析引擎
// ==========================================
// 无状态引擎
pub struct AvailabilityResolver;

impl AvailabilityResolver {
    /// 计算一个块的禁排对集合
    ///
    /// 名单外工程师的记录直接跳过 (导入后已在校验层告警)
    ///
    /// # 参数
    /// - records: 全部不可用时段记录
    /// - team: 工程师名单 (顺序即下标)
    /// - block: 目标块
    ///
    /// # 返回
    /// (工程师下标, 块内周号) 集合
    pub fn forbidden_pairs(
        records: &[UnavailabilityRecord],
        team: &[String],
        block: &Block,
    ) -> HashSet<(usize, usize)> {
        let mut pairs = HashSet::new();

        for record in records {
            let Some(engineer_index) = team.iter().position(|name| name == &record.engineer)
            else {
                continue;
            };

            for week in block.weeks_iter() {
                if record.overlaps_week(&week) {
                    pairs.insert((engineer_index, week.week_index));
                }
            }
        }

        pairs
    }
}
