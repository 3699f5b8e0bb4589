// ==========================================
// 值班排班系统 - 排班表 CSV 导出
// ==========================================
// 职责: 班次列表 -> CSV (Week,Role,Engineer,Start DateTime,End DateTime)
// 红线: 行序与班次推导顺序一致, 时间为配置时区本地时刻
// ==========================================

use crate::domain::Shift;
use crate::export::error::{ExportError, ExportResult};

const HEADERS: [&str; 5] = ["Week", "Role", "Engineer", "Start DateTime", "End DateTime"];

/// 时间戳列格式
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 生成排班表 CSV 文本
///
/// # 参数
/// - shifts: 班次列表 (已按输出顺序排列)
pub fn schedule_csv_string(shifts: &[Shift]) -> ExportResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for shift in shifts {
        writer.write_record([
            shift.global_week.to_string(),
            shift.role_code.clone(),
            shift.engineer.clone(),
            shift.start.format(DATETIME_FORMAT).to_string(),
            shift.end.format(DATETIME_FORMAT).to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::CsvError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::CsvError(e.to_string()))
}
