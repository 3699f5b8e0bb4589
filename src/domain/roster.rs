// ==========================================
// 值班排班系统 - 排班领域模型
// ==========================================
// 职责: 块/周/不可用记录/排班结果/具体班次
// 红线: 块按序求解, 后块不得约束前块
// ==========================================

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

// ==========================================
// Block - 排班块
// ==========================================
// 一个块包含 weeks 个连续周, 作为单次求解实例
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: usize,      // 0 起始块号
    pub start: NaiveDate,  // 块起始日期 (含)
    pub weeks: u32,        // 周数 W
}

impl Block {
    /// 全局起始日期 + 块号推算块起始
    pub fn nth(global_start: NaiveDate, index: usize, weeks_per_block: u32) -> Self {
        let offset_days = index as i64 * weeks_per_block as i64 * 7;
        Self {
            index,
            start: global_start + Duration::days(offset_days),
            weeks: weeks_per_block,
        }
    }

    /// 块内第 week_index 周
    pub fn week(&self, week_index: usize) -> Week {
        Week {
            block_index: self.index,
            week_index,
            start: self.start + Duration::days(week_index as i64 * 7),
        }
    }

    /// 按序迭代块内所有周
    pub fn weeks_iter(&self) -> impl Iterator<Item = Week> + '_ {
        (0..self.weeks as usize).map(|w| self.week(w))
    }
}

// ==========================================
// Week - 周窗口
// ==========================================
// 7 天半开窗口 [start, start + 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub block_index: usize,
    pub week_index: usize,
    pub start: NaiveDate,
}

impl Week {
    /// 窗口右端 (不含)
    pub fn window_end(&self) -> NaiveDate {
        self.start + Duration::days(7)
    }

    /// 日期是否落在本周窗口内
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.window_end()
    }
}

// ==========================================
// UnavailabilityRecord - 不可用时段记录
// ==========================================
// 两端日期均为闭区间
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailabilityRecord {
    pub engineer: String,
    pub start: NaiveDate, // 起始日期 (含)
    pub end: NaiveDate,   // 结束日期 (含)
}

impl UnavailabilityRecord {
    /// 与一个周窗口是否有任意重叠 (闭区间 vs 半开窗口)
    pub fn overlaps_week(&self, week: &Week) -> bool {
        self.start < week.window_end() && self.end >= week.start
    }
}

// ==========================================
// BlockAssignment - 单块排班结果
// ==========================================
// slots[week_index][role_index] = 工程师下标
// roster_completeness 开启时每个槽位必有人
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAssignment {
    pub block_index: usize,
    pub slots: Vec<Vec<Option<usize>>>,
}

impl BlockAssignment {
    /// 块内某周被排到任意角色的工程师下标集合 (去重, 升序)
    pub fn engineers_in_week(&self, week_index: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self.slots[week_index].iter().flatten().copied().collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// 某工程师在块内的总班次数
    pub fn assigned_count(&self, engineer_index: usize) -> usize {
        self.slots
            .iter()
            .flat_map(|week| week.iter())
            .filter(|slot| **slot == Some(engineer_index))
            .count()
    }

    /// 某工程师在块内担任指定角色的次数
    pub fn role_count(&self, engineer_index: usize, role_index: usize) -> usize {
        self.slots
            .iter()
            .filter(|week| week[role_index] == Some(engineer_index))
            .count()
    }
}

// ==========================================
// Shift - 具体班次
// ==========================================
// 由排班结果 + 日历映射推导, 携带溯源字段以生成稳定 UID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shift {
    pub engineer: String,        // 值班工程师
    pub role_code: String,       // 角色短标识
    pub role_name: String,       // 角色展示名称
    pub global_week: usize,      // 1 起始全局周号
    pub start: DateTime<Tz>,     // 绝对开始时刻 (配置时区)
    pub end: DateTime<Tz>,       // 绝对结束时刻 (配置时区)

    // ===== 溯源字段 (UID 稳定性) =====
    pub block_index: usize,
    pub week_index: usize,
    pub entry_index: usize,
    pub weekday: chrono::Weekday,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_block_nth_start_dates() {
        let b0 = Block::nth(date(2025, 11, 3), 0, 2);
        let b1 = Block::nth(date(2025, 11, 3), 1, 2);
        assert_eq!(b0.start, date(2025, 11, 3));
        assert_eq!(b1.start, date(2025, 11, 17));
    }

    #[test]
    fn test_week_window() {
        let week = Block::nth(date(2025, 11, 3), 0, 2).week(1);
        assert_eq!(week.start, date(2025, 11, 10));
        assert!(week.contains(date(2025, 11, 10)));
        assert!(week.contains(date(2025, 11, 16)));
        assert!(!week.contains(date(2025, 11, 17)));
    }

    #[test]
    fn test_overlap_single_day() {
        let week = Block::nth(date(2025, 11, 3), 0, 1).week(0);
        // 单日重叠即禁排整周
        let rec = UnavailabilityRecord {
            engineer: "Alice".into(),
            start: date(2025, 11, 9),
            end: date(2025, 11, 9),
        };
        assert!(rec.overlaps_week(&week));
        // 恰好落在窗口右端之外
        let rec2 = UnavailabilityRecord {
            engineer: "Alice".into(),
            start: date(2025, 11, 10),
            end: date(2025, 11, 12),
        };
        assert!(!rec2.overlaps_week(&week));
    }

    #[test]
    fn test_assignment_counters() {
        let assignment = BlockAssignment {
            block_index: 0,
            slots: vec![vec![Some(0), Some(1)], vec![Some(2), Some(0)]],
        };
        assert_eq!(assignment.engineers_in_week(0), vec![0, 1]);
        assert_eq!(assignment.assigned_count(0), 2);
        assert_eq!(assignment.role_count(0, 1), 1);
    }
}
