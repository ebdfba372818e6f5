use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::FormatConfig;
use crate::error::FormatError;
use crate::format::{FileOutcome, Palette, format_workbook};

#[derive(Debug, Default)]
pub struct BatchReport {
    pub formatted: Vec<PathBuf>,
    pub untouched: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, FormatError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.formatted.len() + self.untouched.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Entries of `folder` whose file name ends with `extension`, in directory order.
pub fn matching_files(folder: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(folder).with_context(|| format!("无法读取文件夹: {}", folder.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("无法读取文件夹: {}", folder.display()))?;
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(extension));
        if matches {
            files.push(entry.path());
        }
    }
    Ok(files)
}

/// Formats every matching file; one bad file never stops the batch.
pub fn process_all_files(folder: &Path, config: &FormatConfig) -> Result<BatchReport> {
    let palette = Palette::new(config);
    let mut report = BatchReport::default();

    for file_path in matching_files(folder, &config.extension)? {
        let file_name = file_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        info!("处理文件: {file_name}");

        match format_workbook(&file_path, config, &palette) {
            Ok(FileOutcome::Formatted { sheets, skipped }) => {
                info!("成功处理文件: {file_name} (格式化 {sheets} 个工作表, 跳过 {skipped} 个)");
                report.formatted.push(file_path);
            }
            Ok(FileOutcome::Untouched { skipped }) => {
                info!("文件未修改: {file_name} ({skipped} 个工作表均未找到标记列)");
                report.untouched.push(file_path);
            }
            Err(err) => {
                error!("处理文件 {file_name} 时出错: {err}");
                report.failed.push((file_path, err));
            }
        }
    }

    info!(
        "共 {} 个文件: 成功 {}, 未修改 {}, 失败 {}",
        report.total(),
        report.formatted.len(),
        report.untouched.len(),
        report.failed.len()
    );
    Ok(report)
}
