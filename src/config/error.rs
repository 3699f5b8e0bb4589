// ==========================================
// 值班排班系统 - 配置模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置模块错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 文件相关错误 =====
    #[error("配置文件不存在: {0}")]
    FileNotFound(String),

    #[error("配置文件读取失败: {0}")]
    FileReadError(String),

    #[error("YAML 解析失败: {0}")]
    YamlParseError(String),

    // ===== 字段转换错误 =====
    #[error("日期格式错误 (字段 {field}): 期望 YYYY-MM-DD, 实际 {value}")]
    DateFormatError { field: String, value: String },

    #[error("时刻格式错误 (角色 {role}, 字段 {field}): 期望 HH:MM, 实际 {value}")]
    TimeFormatError {
        role: String,
        field: String,
        value: String,
    },

    #[error("未知星期标记 (角色 {role}): {token}")]
    UnknownWeekday { role: String, token: String },

    #[error("未知时区: {0}")]
    UnknownTimezone(String),

    #[error("跨天数非法 (角色 {role}): span_days = {value}, 必须 >= 1")]
    InvalidSpanDays { role: String, value: u32 },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(err.to_string()),
            _ => ConfigError::FileReadError(err.to_string()),
        }
    }
}

// 实现 From<serde_yaml::Error>
impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::YamlParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
