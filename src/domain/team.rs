// ==========================================
// 值班排班系统 - 团队与角色领域模型
// ==========================================
// 职责: 角色及其班表条目定义
// 红线: 配置加载后不可变
// ==========================================

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

// ==========================================
// ScheduleEntry - 班表条目
// ==========================================
// end_time <= start_time 表示跨午夜; span_days 允许进一步延长
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub days: Vec<Weekday>,    // 适用星期集合
    pub start_time: NaiveTime, // 当日开始时刻
    pub end_time: NaiveTime,   // 结束时刻 (可早于开始时刻)
    pub span_days: u32,        // 跨天数, >= 1
}

impl ScheduleEntry {
    /// 构造单日条目 (span_days = 1)
    pub fn new(days: Vec<Weekday>, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            days,
            start_time,
            end_time,
            span_days: 1,
        }
    }

    /// 构造跨天条目
    pub fn spanning(
        days: Vec<Weekday>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        span_days: u32,
    ) -> Self {
        Self {
            days,
            start_time,
            end_time,
            span_days,
        }
    }
}

// ==========================================
// Role - 值班角色
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub code: String,                // 角色短标识 (如 D / NP / NS)
    pub name: String,                // 展示名称
    pub entries: Vec<ScheduleEntry>, // 班表条目, >= 1
}

impl Role {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// 构建器: 追加一个班表条目
    pub fn with_entry(mut self, entry: ScheduleEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// 该角色每周是否有任何班表条目 (周末产能校验用)
    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_builder() {
        let role = Role::new("D", "Day").with_entry(ScheduleEntry::new(
            vec![Weekday::Mon],
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        ));
        assert_eq!(role.code, "D");
        assert!(role.has_entries());
        assert_eq!(role.entries[0].span_days, 1);
    }
}
