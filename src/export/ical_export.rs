// ==========================================
// 值班排班系统 - iCal 导出
// ==========================================
// 职责: 班次列表 -> VCALENDAR 文本 (每班次一个 VEVENT)
// 红线: UID 由 (块, 周, 角色, 条目, 星期) 推导, 同输入跨运行稳定
// ==========================================

use crate::domain::types::weekday_token;
use crate::domain::Shift;
use crate::export::error::ExportResult;
use chrono::Utc;
use chrono_tz::Tz;

/// VEVENT 本地时刻格式 (配合 TZID 参数)
const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";

/// 生成 iCal 文本
///
/// 行尾按 RFC 5545 使用 CRLF; DTSTAMP 取班次开始时刻的 UTC 表示,
/// 保证输出不随运行时刻变化
///
/// # 参数
/// - shifts: 班次列表 (已按输出顺序排列)
/// - tz: 配置时区 (写入 TZID 参数)
pub fn ical_string(shifts: &[Shift], tz: Tz) -> ExportResult<String> {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        "PRODID:-//oncall-roster//CN".into(),
        "CALSCALE:GREGORIAN".into(),
    ];

    for shift in shifts {
        lines.push("BEGIN:VEVENT".into());
        lines.push(format!("UID:{}", event_uid(shift)));
        lines.push(format!(
            "DTSTAMP:{}",
            shift.start.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ")
        ));
        lines.push(format!(
            "DTSTART;TZID={}:{}",
            tz.name(),
            shift.start.format(LOCAL_FORMAT)
        ));
        lines.push(format!(
            "DTEND;TZID={}:{}",
            tz.name(),
            shift.end.format(LOCAL_FORMAT)
        ));
        lines.push(format!("SUMMARY:{} — {}", shift.role_name, shift.engineer));
        lines.push("END:VEVENT".into());
    }

    lines.push("END:VCALENDAR".into());

    // RFC 5545: CRLF 行尾, 文件以换行结束
    Ok(lines.join("\r\n") + "\r\n")
}

/// 跨运行稳定的事件 UID
fn event_uid(shift: &Shift) -> String {
    format!(
        "oncall-b{}-w{}-{}-e{}-{}@oncall-roster",
        shift.block_index,
        shift.week_index,
        shift.role_code,
        shift.entry_index,
        weekday_token(shift.weekday)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};
    use chrono_tz::UTC;

    fn shift() -> Shift {
        Shift {
            engineer: "Alice".into(),
            role_code: "NP".into(),
            role_name: "Night Primary".into(),
            global_week: 1,
            start: UTC.with_ymd_and_hms(2025, 11, 7, 17, 0, 0).unwrap(),
            end: UTC.with_ymd_and_hms(2025, 11, 10, 9, 0, 0).unwrap(),
            block_index: 0,
            week_index: 0,
            entry_index: 0,
            weekday: Weekday::Fri,
        }
    }

    #[test]
    fn test_vevent_fields() {
        let ics = ical_string(&[shift()], UTC).unwrap();
        assert!(ics.contains("UID:oncall-b0-w0-NP-e0-Fri@oncall-roster\r\n"));
        assert!(ics.contains("DTSTART;TZID=UTC:20251107T170000\r\n"));
        assert!(ics.contains("DTEND;TZID=UTC:20251110T090000\r\n"));
        assert!(ics.contains("SUMMARY:Night Primary — Alice\r\n"));
    }

    #[test]
    fn test_calendar_wrapper() {
        let ics = ical_string(&[], UTC).unwrap();
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_uid_stable_across_runs() {
        let a = ical_string(&[shift()], UTC).unwrap();
        let b = ical_string(&[shift()], UTC).unwrap();
        assert_eq!(a, b);
    }
}
