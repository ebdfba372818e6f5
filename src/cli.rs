use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use crate::batch::{matching_files, process_all_files};
use crate::config::{DEFAULT_FOLDER, FormatConfig};
use crate::format::usable_plans;
use crate::plan::{column_number_to_name, plan_workbook};

#[derive(Debug, Parser)]
#[command(name = "dtformat")]
#[command(about = "批量设置部门拆分表格式：标记列下拉、锁定、填充色、列宽")]
#[command(version)]
pub struct Cli {
    /// 存放 .xlsx 文件的文件夹
    #[arg(default_value = DEFAULT_FOLDER)]
    pub folder: PathBuf,

    /// YAML 配置文件，覆盖默认的标记文字、选项、密码、颜色等
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 只扫描并输出计划，不写入文件
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "dtformat=debug" } else { "dtformat=info" };
    // 测试里可能重复调用，已初始化时忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_target(false)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<FormatConfig> {
    match path {
        Some(path) => FormatConfig::load(path)
            .with_context(|| format!("无法加载配置: {}", path.display())),
        None => Ok(FormatConfig::default()),
    }
}

fn dry_run(folder: &Path, config: &FormatConfig) -> Result<()> {
    for file_path in matching_files(folder, &config.extension)? {
        info!("扫描文件: {}", file_path.display());
        let plans = match plan_workbook(&file_path, config) {
            Ok(plans) => plans,
            Err(err) => {
                error!("扫描文件 {} 时出错: {err}", file_path.display());
                continue;
            }
        };
        let (plans, _) = usable_plans(plans, config);
        for plan in plans {
            let widths: Vec<String> = (1..=plan.max_column)
                .map(|col| {
                    format!(
                        "{}={}",
                        column_number_to_name(col),
                        plan.column_width(col, config)
                    )
                })
                .collect();
            info!(
                "工作表 {}: 标记列 {}, {} 行, 下拉范围 {}, 列宽 [{}]",
                plan.sheet_name,
                column_number_to_name(plan.marker_column),
                plan.max_row,
                plan.validation_range(),
                widths.join(", ")
            );
        }
    }
    Ok(())
}

pub fn run(args: impl IntoIterator<Item = OsString>) -> Result<()> {
    let cli = Cli::parse_from(args);
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    if cli.dry_run {
        return dry_run(&cli.folder, &config);
    }

    // 单个文件失败只记录日志，不影响退出码
    process_all_files(&cli.folder, &config)?;
    Ok(())
}
