// ==========================================
// 值班排班系统 - 日历映射引擎
// ==========================================
// 职责: (周, 角色, 值班人) -> 具体班次列表
// 输入: 周窗口 + 角色班表条目
// 输出: 配置时区下的绝对起止时刻
// 红线: 星期名指向周窗口内的真实日历星期, 而非相对偏移
// ==========================================

use crate::domain::{Role, ScheduleEntry, Shift, Week};
use crate::engine::error::{EngineError, EngineResult};
use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use chrono_tz::Tz;

// ==========================================
// CalendarMapper - 日历映射引擎
// ==========================================
// 无状态引擎, 假定输入已通过校验
pub struct CalendarMapper {
    tz: Tz,
}

impl CalendarMapper {
    /// 构造函数
    ///
    /// # 参数
    /// - tz: 班次时刻所在时区
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 展开一个 (周, 角色) 的全部班次
    ///
    /// 条目内的星期按 Mon..Sun 顺序展开; 跨午夜条目 (end <= start)
    /// 延伸到次日, span_days 进一步延长 (span_days - 1) 天
    ///
    /// # 参数
    /// - week: 周窗口
    /// - role: 角色及其班表条目
    /// - engineer: 值班工程师名
    /// - global_week: 1 起始全局周号
    pub fn shifts_for(
        &self,
        week: &Week,
        role: &Role,
        engineer: &str,
        global_week: usize,
    ) -> EngineResult<Vec<Shift>> {
        let mut shifts = Vec::new();

        for (entry_index, entry) in role.entries.iter().enumerate() {
            let mut days = entry.days.clone();
            days.sort_by_key(|d| d.num_days_from_monday());
            days.dedup();

            for day in days {
                let date = resolve_weekday_date(week.start, day);
                let start = self.localize(date.and_time(entry.start_time))?;
                let end =
                    start + Duration::days(entry.span_days as i64 - 1) + wrapped_duration(entry);

                shifts.push(Shift {
                    engineer: engineer.to_string(),
                    role_code: role.code.clone(),
                    role_name: role.name.clone(),
                    global_week,
                    start,
                    end,
                    block_index: week.block_index,
                    week_index: week.week_index,
                    entry_index,
                    weekday: day,
                });
            }
        }

        Ok(shifts)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 本地时刻映射到时区
    ///
    /// 秋季回拨产生的歧义时刻取较早一次; 春季跳变落空的时刻视为内部错误
    fn localize(&self, naive: NaiveDateTime) -> EngineResult<DateTime<Tz>> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt),
            LocalResult::Ambiguous(earlier, _) => Ok(earlier),
            LocalResult::None => Err(EngineError::LocalTime(format!(
                "{} 在时区 {} 中不存在",
                naive, self.tz
            ))),
        }
    }
}

/// 周窗口 [start, start + 7) 中指定星期的唯一日期
pub fn resolve_weekday_date(week_start: NaiveDate, day: Weekday) -> NaiveDate {
    let offset = (day.num_days_from_monday() + 7
        - week_start.weekday().num_days_from_monday())
        % 7;
    week_start + Duration::days(offset as i64)
}

/// 条目的单日时长: end > start 取差值, 否则跨午夜补 24 小时 (相等即 24h)
fn wrapped_duration(entry: &ScheduleEntry) -> Duration {
    let raw = entry.end_time.signed_duration_since(entry.start_time);
    if raw > Duration::zero() {
        raw
    } else {
        raw + Duration::hours(24)
    }
}
