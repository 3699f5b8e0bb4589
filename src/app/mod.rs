// ==========================================
// 值班排班系统 - 应用层
// ==========================================
// 职责: 命令编排 (validate / generate), 错误到退出码的映射
// 退出码: 0 成功; 1 配置/校验错误; 2 无解; 3 超时; 4 输出 I/O 错误
// ==========================================

use crate::config::{load_config, ConfigError, ExportFormat, FilesSection};
use crate::domain::UnavailabilityRecord;
use crate::engine::{ConfigValidator, EngineError, RosterOrchestrator, ValidationProblem};
use crate::export::{
    format_capacity_analysis, format_roster_table, ical_string, schedule_csv_string, ExportError,
};
use crate::importer::{load_availability_csv, ImportError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

// ==========================================
// RunError - 运行错误
// ==========================================
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("配置校验未通过: {errors} 个错误")]
    Validation { errors: usize },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl RunError {
    /// 映射到进程退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Config(_) | RunError::Import(_) | RunError::Validation { .. } => 1,
            RunError::Engine(EngineError::Infeasible) => 2,
            RunError::Engine(EngineError::Timeout { .. }) => 3,
            // 产能错误与其余引擎错误归入配置类
            RunError::Engine(_) => 1,
            RunError::Export(_) => 4,
        }
    }
}

// ==========================================
// validate 命令
// ==========================================

/// 校验配置与不可用时段数据
///
/// # 参数
/// - config_path: YAML 配置文件路径
pub fn run_validate(config_path: &Path) -> Result<(), RunError> {
    println!("校验配置: {}", config_path.display());

    let config = load_config(config_path)?;
    let problem = config.to_problem()?;
    let records = load_records(&config.files, config_dir(config_path))?;

    let problems = ConfigValidator::validate(&problem, &records);
    print_problems(&problems);

    println!();
    print!(
        "{}",
        format_capacity_analysis(&ConfigValidator::capacity_analysis(&problem))
    );

    let errors = error_count(&problems);
    if errors > 0 {
        println!("\n配置校验未通过");
        return Err(RunError::Validation { errors });
    }

    println!("\n配置校验通过");
    Ok(())
}

// ==========================================
// generate 命令
// ==========================================

/// 生成值班表并按配置导出
///
/// # 参数
/// - config_path: YAML 配置文件路径
/// - output_dir: 输出目录覆盖 (保留配置中的文件名部分)
pub fn run_generate(config_path: &Path, output_dir: Option<&Path>) -> Result<(), RunError> {
    println!("加载配置: {}", config_path.display());

    let config = load_config(config_path)?;
    let problem = config.to_problem()?;
    let records = load_records(&config.files, config_dir(config_path))?;

    // 求解前校验: 任一 Error 即拒绝运行
    let problems = ConfigValidator::validate(&problem, &records);
    if ConfigValidator::has_errors(&problems) {
        print_problems(&problems);
        return Err(RunError::Validation {
            errors: error_count(&problems),
        });
    }
    for problem_item in &problems {
        warn!(code = %problem_item.code, "{}", problem_item.message);
    }

    let result = RosterOrchestrator::new(&problem, &records).run()?;

    println!();
    print!("{}", format_roster_table(&problem, &result.assignments));
    println!();

    // 导出
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir).map_err(|e| ExportError::CreateDir(e.to_string()))?;
    }
    for format in &config.files.export_formats {
        match format {
            ExportFormat::Csv => {
                let path = resolve_output(&config.files.csv_output, output_dir, config_path);
                let text = schedule_csv_string(&result.shifts)?;
                fs::write(&path, text).map_err(ExportError::from)?;
                info!(path = %path.display(), "排班表 CSV 已写出");
            }
            ExportFormat::Ical => {
                let path = resolve_output(&config.files.ical_output, output_dir, config_path);
                let text = ical_string(&result.shifts, problem.timezone)?;
                fs::write(&path, text).map_err(ExportError::from)?;
                info!(path = %path.display(), "iCal 已写出");
            }
        }
    }

    println!("值班表生成完成");
    Ok(())
}

// ==========================================
// 辅助函数
// ==========================================

/// 配置文件所在目录 (相对路径的解析基准)
fn config_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// 读取配置指定的不可用时段 CSV (未配置则为空)
fn load_records(
    files: &FilesSection,
    base_dir: &Path,
) -> Result<Vec<UnavailabilityRecord>, ImportError> {
    match files.availability_csv.as_deref() {
        Some(configured) => {
            let path = resolve_input(configured, base_dir);
            load_availability_csv(&path)
        }
        None => Ok(Vec::new()),
    }
}

/// 输入路径: 相对路径基于配置文件目录
fn resolve_input(configured: &str, base_dir: &Path) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// 输出路径: --output-dir 覆盖目录并保留文件名, 否则同输入规则
fn resolve_output(configured: &str, output_dir: Option<&Path>, config_path: &Path) -> PathBuf {
    let path = Path::new(configured);
    match output_dir {
        Some(dir) => dir.join(path.file_name().unwrap_or(path.as_os_str())),
        None => resolve_input(configured, config_dir(config_path)),
    }
}

/// Error 级问题数
fn error_count(problems: &[ValidationProblem]) -> usize {
    problems
        .iter()
        .filter(|p| p.severity == crate::engine::Severity::Error)
        .count()
}

/// 逐条输出校验问题
fn print_problems(problems: &[ValidationProblem]) {
    for problem in problems {
        println!("   [{}] {}: {}", problem.severity, problem.code, problem.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_output_with_dir_override() {
        let path = resolve_output(
            "out/schedule.csv",
            Some(Path::new("/tmp/exports")),
            Path::new("conf/config.yaml"),
        );
        assert_eq!(path, PathBuf::from("/tmp/exports/schedule.csv"));
    }

    #[test]
    fn test_resolve_output_relative_to_config() {
        let path = resolve_output("schedule.csv", None, Path::new("conf/config.yaml"));
        assert_eq!(path, PathBuf::from("conf/schedule.csv"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            RunError::Engine(EngineError::Infeasible).exit_code(),
            2
        );
        assert_eq!(
            RunError::Engine(EngineError::Timeout { seconds: 1.0 }).exit_code(),
            3
        );
        assert_eq!(
            RunError::Engine(EngineError::CapacityShortfall {
                required: 12,
                available: 9,
                engineers: 3,
                max_shifts: 3,
            })
            .exit_code(),
            1
        );
        assert_eq!(
            RunError::Export(ExportError::WriteError("disk".into())).exit_code(),
            4
        );
    }
}
