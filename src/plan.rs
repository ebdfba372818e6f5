use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::config::FormatConfig;
use crate::error::{FormatError, FormatResult};

/// What the formatter will do to one sheet, worked out from a read-only scan.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub sheet_name: String,
    /// 1-based
    pub marker_column: u32,
    pub max_row: u32,
    pub max_column: u32,
    /// Longest line per column, index 0 is column 1.
    pub max_lengths: Vec<usize>,
}

impl SheetPlan {
    pub fn column_width(&self, column: u32, config: &FormatConfig) -> f64 {
        let raw = self
            .max_lengths
            .get(column as usize - 1)
            .copied()
            .unwrap_or(0);
        column_width(column, raw, config)
    }

    /// `C2:C10`
    pub fn validation_range(&self) -> String {
        let letter = column_number_to_name(self.marker_column);
        format!("{letter}2:{letter}{}", self.max_row.max(2))
    }
}

/// Cell text as it is measured for column widths.
///
/// Whole floats drop the `.0`; dates render as `2024-01-01 00:00:00`, the
/// length a user sees once Excel widens the column for them.
pub fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) | Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => {
            s.clone()
        }
        Some(Data::Float(n)) if n.fract() == 0.0 => format!("{n:.0}"),
        Some(Data::Float(n)) => n.to_string(),
        Some(Data::Int(n)) => n.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        Some(Data::DateTime(dt)) => dt
            .as_datetime()
            .map(|dt| dt.to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        // 错误值按 Excel 显示的 #N/A 等计算
        Some(Data::Error(e)) => e.to_string(),
    }
}

/// Column letters for a 1-based index, `28` -> `AB`.
pub fn column_number_to_name(column: u32) -> String {
    let mut letters = Vec::new();
    let mut rest = column;
    while rest > 0 {
        rest -= 1;
        letters.push(char::from(b'A' + (rest % 26) as u8));
        rest /= 26;
    }
    letters.iter().rev().collect()
}

/// First header whose text, with newlines removed, contains `phrase`.
pub fn find_marker_column<'a, I>(headers: I, phrase: &str) -> Option<u32>
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .position(|text| text.replace('\n', "").contains(phrase))
        .map(|idx| idx as u32 + 1)
}

/// Longest `\n`-separated line, counted in characters.
pub fn max_line_len(text: &str) -> usize {
    text.split('\n').map(|line| line.chars().count()).max().unwrap_or(0)
}

/// 第一列(序号列)不设上限，其余列夹在 [min_width, max_width] 之间。
pub fn column_width(column: u32, max_len: usize, config: &FormatConfig) -> f64 {
    let width = max_len as f64 + config.width_padding;
    if column == 1 {
        width
    } else {
        width.min(config.max_width).max(config.min_width)
    }
}

/// Scans a calamine range. Returns `None` when row 1 has no marker header.
pub fn plan_sheet(
    sheet_name: &str,
    range: &Range<Data>,
    config: &FormatConfig,
) -> Option<SheetPlan> {
    // calamine 的 range 不一定从 A1 开始，这里统一用绝对坐标取值
    let (end_row, end_col) = range.end()?;
    let max_row = end_row + 1;
    let max_column = end_col + 1;
    let text_at = |row: u32, col: u32| cell_text(range.get_value((row, col)));

    let headers: Vec<String> = (0..max_column).map(|col| text_at(0, col)).collect();
    let marker_column =
        find_marker_column(headers.iter().map(String::as_str), &config.marker_phrase)?;

    let max_lengths = (0..max_column)
        .map(|col| {
            (0..max_row)
                .map(|row| max_line_len(&text_at(row, col)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    Some(SheetPlan {
        sheet_name: sheet_name.to_string(),
        marker_column,
        max_row,
        max_column,
        max_lengths,
    })
}

/// Sheets without a marker column are reported as `Err(name)` so the caller can warn.
pub fn plan_workbook(
    file_path: &Path,
    config: &FormatConfig,
) -> FormatResult<Vec<Result<SheetPlan, String>>> {
    let mut workbook = open_workbook_auto(file_path).map_err(|source| FormatError::Open {
        path: file_path.to_path_buf(),
        source,
    })?;

    let mut plans = Vec::new();
    for sheet_name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|source| FormatError::ReadSheet {
                sheet: sheet_name.clone(),
                source,
            })?;
        plans.push(plan_sheet(&sheet_name, &range, config).ok_or(sheet_name));
    }
    Ok(plans)
}
