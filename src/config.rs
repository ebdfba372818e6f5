use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_FOLDER: &str = "按部门拆分";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无法读取配置文件 {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误 {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("颜色值无效 ({field}): {value}")]
    Color { field: &'static str, value: String },

    #[error("列宽范围无效: min_width={min} > max_width={max}")]
    WidthBounds { min: f64, max: f64 },

    #[error("下拉选项无效: {0}")]
    Options(String),

    #[error("文件扩展名不能为空")]
    EmptyExtension,
}

/// Everything the formatter hard-codes for the 部门拆分 workbooks.
///
/// Every field has a default, so a YAML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    pub marker_phrase: String,
    pub status_options: Vec<String>,
    pub prompt_title: String,
    pub prompt: String,
    pub error_title: String,
    pub error_message: String,
    pub password: String,
    pub header_fill: String,
    pub content_fill: String,
    pub marker_header_fill: String,
    pub min_width: f64,
    pub max_width: f64,
    pub width_padding: f64,
    pub extension: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            marker_phrase: "是否使用（必填）".to_string(),
            status_options: vec![
                "使用".to_string(),
                "禁用（注销）".to_string(),
                "已调离本单位".to_string(),
            ],
            prompt_title: "使用状态选择".to_string(),
            prompt: "请从下拉列表中选择一个选项".to_string(),
            error_title: "输入错误".to_string(),
            error_message: "输入的值无效，请使用下拉列表选择一个有效的选项。".to_string(),
            password: "E5T647kc".to_string(),
            // 深灰 / 浅灰 / 黄
            header_fill: "D9D9D9".to_string(),
            content_fill: "F2F2F2".to_string(),
            marker_header_fill: "FFEB9C".to_string(),
            min_width: 8.0,
            max_width: 50.0,
            width_padding: 2.0,
            extension: ".xlsx".to_string(),
        }
    }
}

impl FormatConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // 空文件等价于全部使用默认值
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("header_fill", &self.header_fill),
            ("content_fill", &self.content_fill),
            ("marker_header_fill", &self.marker_header_fill),
        ] {
            to_argb(value).ok_or_else(|| ConfigError::Color {
                field,
                value: value.clone(),
            })?;
        }

        if self.min_width.is_nan() || self.max_width.is_nan() || self.min_width > self.max_width {
            return Err(ConfigError::WidthBounds {
                min: self.min_width,
                max: self.max_width,
            });
        }

        if self.status_options.is_empty() {
            return Err(ConfigError::Options("至少需要一个选项".to_string()));
        }
        if let Some(bad) = self
            .status_options
            .iter()
            .find(|o| o.is_empty() || o.contains(',') || o.contains('"'))
        {
            return Err(ConfigError::Options(format!(
                "选项不能为空且不能包含逗号或引号: {bad:?}"
            )));
        }

        if self.extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        Ok(())
    }

    /// The `formula1` of the list validation: `"a,b,c"` including the quotes.
    pub fn options_formula(&self) -> String {
        format!("\"{}\"", self.status_options.join(","))
    }
}

/// `D9D9D9`, `#D9D9D9` or `FFD9D9D9` -> `ffd9d9d9`.
///
/// umya-spreadsheet 的 `Color::set_argb()` 遇到与内置 INDEXED_COLORS 相同的大写值时
/// 会改写成 indexed="n"，不同调色板下颜色可能不对；统一转成小写以确保写入 rgb="..."。
pub fn to_argb(value: &str) -> Option<String> {
    let hex = value.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(format!("ff{}", hex.to_ascii_lowercase())),
        8 => Some(hex.to_ascii_lowercase()),
        _ => None,
    }
}
