// ==========================================
// 值班排班系统 - 导出层
// ==========================================
// 职责: 排班结果的 CSV / iCal 文件输出与控制台表格
// 红线: 同一输入两次运行输出逐字节一致
// ==========================================

pub mod csv_export;
pub mod error;
pub mod ical_export;
pub mod table;

// 重导出
pub use csv_export::schedule_csv_string;
pub use error::{ExportError, ExportResult};
pub use ical_export::ical_string;
pub use table::{format_capacity_analysis, format_roster_table};
