// ==========================================
// 值班排班系统 - 配置加载器
// ==========================================
// 职责: 读取 YAML -> AppConfig -> RosterProblem
// 输入: 配置文件路径
// 输出: 类型化领域对象, 逐字段转换错误
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::model::AppConfig;
use crate::domain::types::parse_weekday;
use crate::domain::{Role, RosterProblem, ScheduleEntry};
use chrono::{NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use std::fs;
use std::path::Path;
use tracing::debug;

/// 读取并解析配置文件
///
/// # 参数
/// - path: YAML 配置文件路径
///
/// # 返回
/// 原始配置结构 (字符串字段未转换)
pub fn load_config(path: &Path) -> ConfigResult<AppConfig> {
    let text = fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&text)?;
    debug!(
        path = %path.display(),
        team_size = config.team.len(),
        roles = config.roles.len(),
        "配置文件解析完成"
    );
    Ok(config)
}

impl AppConfig {
    /// 转换为排班问题领域对象
    ///
    /// 逐字段解析日期/时刻/星期/时区, 任一失败即返回对应错误
    pub fn to_problem(&self) -> ConfigResult<RosterProblem> {
        let start_date = parse_iso_date(&self.schedule.start_date, "schedule.start_date")?;

        let timezone: Tz = self
            .schedule
            .timezone
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone(self.schedule.timezone.clone()))?;

        let mut roles = Vec::with_capacity(self.roles.len());
        for (code, section) in &self.roles {
            let mut entries = Vec::with_capacity(section.schedule.len());
            for entry in &section.schedule {
                if entry.span_days < 1 {
                    return Err(ConfigError::InvalidSpanDays {
                        role: code.clone(),
                        value: entry.span_days,
                    });
                }
                let days = parse_days(code, &entry.days)?;
                let start_time = parse_time(code, "start_time", &entry.start_time)?;
                let end_time = parse_time(code, "end_time", &entry.end_time)?;
                entries.push(ScheduleEntry::spanning(
                    days,
                    start_time,
                    end_time,
                    entry.span_days,
                ));
            }
            roles.push(Role {
                code: code.clone(),
                name: section.name.clone(),
                entries,
            });
        }

        Ok(RosterProblem {
            team: self.team.clone(),
            roles,
            start_date,
            num_blocks: self.schedule.num_blocks,
            weeks_per_block: self.schedule.weeks_per_block,
            timezone,
            constraints: self.constraints.clone(),
            rules: self.rules,
            timeout_seconds: self.solver.timeout_seconds,
        })
    }
}

/// 解析 ISO-8601 日期
fn parse_iso_date(value: &str, field: &str) -> ConfigResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ConfigError::DateFormatError {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// 解析 HH:MM 时刻 (兼容 HH:MM:SS)
fn parse_time(role: &str, field: &str, value: &str) -> ConfigResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ConfigError::TimeFormatError {
            role: role.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// 解析星期标记列表
fn parse_days(role: &str, tokens: &[String]) -> ConfigResult<Vec<Weekday>> {
    let mut days = Vec::with_capacity(tokens.len());
    for token in tokens {
        let day = parse_weekday(token).ok_or_else(|| ConfigError::UnknownWeekday {
            role: role.to_string(),
            token: token.clone(),
        })?;
        days.push(day);
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r#"
team: [Alice, Bob, Charlie, Diana]
schedule:
  start_date: 2025-11-03
  num_blocks: 1
  weeks_per_block: 2
  timezone: UTC
roles:
  D:
    name: Day
    schedule:
      - days: [Mon]
        start_time: "09:00"
        end_time: "17:00"
constraints:
  max_shifts_per_engineer: 1
  max_weekends_per_engineer: 1
solver:
  timeout_seconds: 10
files:
  export_formats: [csv]
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config: AppConfig = serde_yaml::from_str(MINIMAL_YAML).unwrap();
        let problem = config.to_problem().unwrap();

        assert_eq!(problem.team.len(), 4);
        assert_eq!(problem.roles.len(), 1);
        assert_eq!(problem.roles[0].code, "D");
        assert_eq!(
            problem.start_date,
            NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
        );
        assert_eq!(problem.roles[0].entries[0].days, vec![Weekday::Mon]);
        // rules 缺省全开
        assert!(problem.rules.roster_completeness);
        assert!(problem.rules.no_consecutive_weeks);
    }

    #[test]
    fn test_role_order_preserved() {
        let yaml = MINIMAL_YAML.replace(
            "roles:\n  D:",
            "roles:\n  NP:\n    name: Night Primary\n    schedule:\n      - days: [Fri]\n        start_time: \"17:00\"\n        end_time: \"09:00\"\n  D:",
        );
        let config: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        let problem = config.to_problem().unwrap();
        // 声明顺序 NP, D 被保留
        assert_eq!(problem.roles[0].code, "NP");
        assert_eq!(problem.roles[1].code, "D");
    }

    #[test]
    fn test_unknown_weekday_token() {
        let yaml = MINIMAL_YAML.replace("[Mon]", "[Funday]");
        let config: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        let err = config.to_problem().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownWeekday { .. }));
    }

    #[test]
    fn test_bad_time_format() {
        let yaml = MINIMAL_YAML.replace("\"09:00\"", "\"9 am\"");
        let config: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        let err = config.to_problem().unwrap_err();
        assert!(matches!(err, ConfigError::TimeFormatError { .. }));
    }

    #[test]
    fn test_unknown_timezone() {
        let yaml = MINIMAL_YAML.replace("timezone: UTC", "timezone: Mars/Olympus");
        let config: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        let err = config.to_problem().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTimezone(_)));
    }

    #[test]
    fn test_bad_date() {
        let yaml = MINIMAL_YAML.replace("2025-11-03", "03/11/2025");
        let config: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        let err = config.to_problem().unwrap_err();
        assert!(matches!(err, ConfigError::DateFormatError { .. }));
    }

    #[test]
    fn test_missing_required_section() {
        let yaml = MINIMAL_YAML.replace("constraints:\n  max_shifts_per_engineer: 1\n  max_weekends_per_engineer: 1\n", "");
        let err = serde_yaml::from_str::<AppConfig>(&yaml).unwrap_err();
        assert!(err.to_string().contains("constraints"));
    }

    #[test]
    fn test_span_days_zero_rejected() {
        let yaml = MINIMAL_YAML.replace(
            "end_time: \"17:00\"",
            "end_time: \"17:00\"\n        span_days: 0",
        );
        let config: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        let err = config.to_problem().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSpanDays { .. }));
    }
}
