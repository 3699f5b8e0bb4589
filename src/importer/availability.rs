// ==========================================
// 值班排班系统 - 不可用时段导入器
// ==========================================
// 职责: 解析 availability CSV (engineer,start_date,end_date)
// 输入: CSV 文件路径, 日期两端均为闭区间
// 输出: UnavailabilityRecord 列表, 逐行定位错误
// ==========================================

use crate::domain::UnavailabilityRecord;
use crate::importer::error::{ImportError, ImportResult};
use chrono::NaiveDate;
use std::path::Path;
use tracing::debug;

const EXPECTED_HEADERS: [&str; 3] = ["engineer", "start_date", "end_date"];

/// 读取不可用时段 CSV
///
/// # 参数
/// - path: CSV 文件路径
///
/// # 返回
/// 全部记录 (未知工程师在校验层以告警形式报告)
pub fn load_availability_csv(path: &Path) -> ImportResult<Vec<UnavailabilityRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| match e.kind() {
        csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            ImportError::FileNotFound(path.display().to_string())
        }
        _ => ImportError::CsvParseError(e.to_string()),
    })?;

    // 表头校验
    let headers = reader.headers()?.clone();
    let actual: Vec<&str> = headers.iter().map(|h| h.trim()).collect();
    if actual != EXPECTED_HEADERS {
        return Err(ImportError::HeaderMismatch(actual.join(",")));
    }

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        // 数据行号从 2 起 (第 1 行是表头)
        let row = i + 2;
        let record = result?;

        let engineer = field(&record, 0, row, "engineer")?.to_string();
        let start = parse_date(field(&record, 1, row, "start_date")?, row, "start_date")?;
        let end = parse_date(field(&record, 2, row, "end_date")?, row, "end_date")?;

        if start > end {
            return Err(ImportError::InvalidRange {
                row,
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        records.push(UnavailabilityRecord {
            engineer,
            start,
            end,
        });
    }

    debug!(path = %path.display(), count = records.len(), "不可用时段导入完成");
    Ok(records)
}

/// 取出一个非空字段
fn field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    row: usize,
    name: &str,
) -> ImportResult<&'a str> {
    match record.get(index).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ImportError::MissingField {
            row,
            field: name.to_string(),
        }),
    }
}

/// 解析 ISO-8601 日期字段
fn parse_date(value: &str, row: usize, name: &str) -> ImportResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ImportError::DateFormatError {
        row,
        field: name.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_csv() {
        let file = write_csv(
            "engineer,start_date,end_date\nAlice,2025-11-20,2025-11-26\nBob,2025-12-15,2025-12-15\n",
        );
        let records = load_availability_csv(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].engineer, "Alice");
        assert_eq!(
            records[1].start,
            NaiveDate::from_ymd_opt(2025, 12, 15).unwrap()
        );
        // 单日记录: start == end 合法
        assert_eq!(records[1].start, records[1].end);
    }

    #[test]
    fn test_header_mismatch() {
        let file = write_csv("name,from,to\nAlice,2025-11-20,2025-11-26\n");
        let err = load_availability_csv(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::HeaderMismatch(_)));
    }

    #[test]
    fn test_bad_date_reports_row() {
        let file = write_csv(
            "engineer,start_date,end_date\nAlice,2025-11-20,2025-11-26\nBob,20-12-2025,2025-12-15\n",
        );
        let err = load_availability_csv(file.path()).unwrap_err();
        match err {
            ImportError::DateFormatError { row, field, .. } => {
                assert_eq!(row, 3);
                assert_eq!(field, "start_date");
            }
            other => panic!("意外错误: {other}"),
        }
    }

    #[test]
    fn test_inverted_range() {
        let file = write_csv("engineer,start_date,end_date\nAlice,2025-11-26,2025-11-20\n");
        let err = load_availability_csv(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRange { row: 2, .. }));
    }

    #[test]
    fn test_file_not_found() {
        let err = load_availability_csv(Path::new("/no/such/file.csv")).unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }
}
