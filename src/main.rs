// ==========================================
// 值班排班系统 - 命令行入口
// ==========================================
// 命令: validate / generate
// 退出码: 0 成功; 1 配置/校验错误; 2 无解; 3 超时; 4 输出 I/O 错误
// ==========================================

use clap::{Parser, Subcommand};
use oncall_roster::app;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "oncall-roster")]
#[command(version)]
#[command(about = "值班排班系统 - 基于约束求解的多周值班表生成", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 校验配置与不可用时段数据
    Validate {
        /// 配置文件路径
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,
    },
    /// 生成值班表并按配置导出
    Generate {
        /// 配置文件路径
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// 输出目录 (覆盖配置中的输出路径目录部分)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // 初始化日志系统
    oncall_roster::logging::init();

    tracing::info!(
        "{} v{} 启动",
        oncall_roster::APP_NAME,
        oncall_roster::VERSION
    );

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Validate { config } => app::run_validate(&config),
        Commands::Generate { config, output_dir } => {
            app::run_generate(&config, output_dir.as_deref())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("错误: {err}");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
