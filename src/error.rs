use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single file; the batch records it and moves on.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("无法打开文件: {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("无法读取工作表: {sheet}: {source}")]
    ReadSheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("无法打开文件(写入模式): {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: umya_spreadsheet::XlsxError,
    },

    #[error("找不到工作表: {0}")]
    MissingSheet(String),

    #[error("无法保存文件: {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: umya_spreadsheet::XlsxError,
    },
}

pub type FormatResult<T> = Result<T, FormatError>;
