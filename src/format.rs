use std::path::Path;

use tracing::{debug, info, warn};
use umya_spreadsheet::Worksheet;
use umya_spreadsheet::structs::{
    Alignment, DataValidation, DataValidationValues, DataValidations, Fill, PatternValues,
    Protection, SheetViewValues, VerticalAlignmentValues,
};

use crate::config::{FormatConfig, to_argb};
use crate::error::{FormatError, FormatResult};
use crate::plan::{SheetPlan, column_number_to_name, plan_workbook};

/// Styles shared by every cell of every sheet in one run.
#[derive(Debug, Clone)]
pub struct Palette {
    pub header_fill: Fill,
    pub content_fill: Fill,
    pub marker_header_fill: Fill,
    pub wrap: Alignment,
    pub locked: Protection,
    pub unlocked: Protection,
}

fn solid_fill(argb: &str) -> Fill {
    let mut fill = Fill::default();
    fill.get_pattern_fill_mut()
        .set_pattern_type(PatternValues::Solid);
    fill.get_pattern_fill_mut()
        .get_foreground_color_mut()
        .set_argb(argb);
    fill.get_pattern_fill_mut()
        .get_background_color_mut()
        .set_argb(argb);
    fill
}

fn protection(locked: bool) -> Protection {
    let mut protection = Protection::default();
    protection.set_locked(locked);
    protection
}

impl Palette {
    /// Colors are expected to have passed `FormatConfig::validate`; anything
    /// unparsable falls back to the default color.
    pub fn new(config: &FormatConfig) -> Self {
        let defaults = FormatConfig::default();
        let argb = |value: &str, fallback: &str| {
            to_argb(value)
                .or_else(|| to_argb(fallback))
                .unwrap_or_default()
        };

        let mut wrap = Alignment::default();
        wrap.set_wrap_text(true);
        wrap.set_vertical(VerticalAlignmentValues::Center);

        Self {
            header_fill: solid_fill(&argb(&config.header_fill, &defaults.header_fill)),
            content_fill: solid_fill(&argb(&config.content_fill, &defaults.content_fill)),
            marker_header_fill: solid_fill(&argb(
                &config.marker_header_fill,
                &defaults.marker_header_fill,
            )),
            wrap,
            locked: protection(true),
            unlocked: protection(false),
        }
    }
}

/// Where a cell sits relative to the marker column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    /// 分割列之前的标题行
    ReferenceHeader,
    /// 分割列之前的内容
    ReferenceData,
    /// 分割列及之后的标题行
    StatusHeader,
    /// 分割列及之后的内容，允许编辑
    StatusData,
}

impl CellRole {
    pub fn classify(row: u32, column: u32, marker_column: u32) -> Self {
        match (column < marker_column, row == 1) {
            (true, true) => Self::ReferenceHeader,
            (true, false) => Self::ReferenceData,
            (false, true) => Self::StatusHeader,
            (false, false) => Self::StatusData,
        }
    }

    pub fn is_locked(self) -> bool {
        self != Self::StatusData
    }
}

pub fn status_validation(range: &str, config: &FormatConfig) -> DataValidation {
    let mut validation = DataValidation::default();
    validation.set_type(DataValidationValues::List);
    validation.set_allow_blank(true);
    validation.set_show_input_message(true);
    validation.set_show_error_message(true);
    validation.set_prompt_title(config.prompt_title.as_str());
    validation.set_prompt(config.prompt.as_str());
    validation.set_error_title(config.error_title.as_str());
    validation.set_error_message(config.error_message.as_str());
    validation.set_formula1(config.options_formula());
    validation.get_sequence_of_references_mut().set_sqref(range);
    validation
}

fn install_validation(sheet: &mut Worksheet, range: &str, config: &FormatConfig) {
    let formula = config.options_formula();
    let validation = status_validation(range, config);

    match sheet.get_data_validations_mut() {
        Some(validations) => {
            // 重复运行时替换上一次写入的同一规则
            validations
                .get_data_validation_list_mut()
                .retain(|existing| existing.get_formula1() != formula);
            validations.add_data_validation_list(validation);
        }
        None => {
            let mut validations = DataValidations::default();
            validations.add_data_validation_list(validation);
            sheet.set_data_validations(validations);
        }
    }
}

/// Applies one plan to its sheet. `plan` bounds are widened to whatever the
/// sheet itself reports, so styled-but-empty cells are covered too.
pub fn format_sheet(
    sheet: &mut Worksheet,
    plan: &SheetPlan,
    config: &FormatConfig,
    palette: &Palette,
) {
    let (highest_column, highest_row) = sheet.get_highest_column_and_row();
    let mut plan = plan.clone();
    plan.max_row = plan.max_row.max(highest_row);
    plan.max_column = plan.max_column.max(highest_column);
    debug!(?plan, "工作表计划");

    install_validation(sheet, &plan.validation_range(), config);

    let protection = sheet.get_sheet_protection_mut();
    protection.set_sheet(true);
    protection.set_password(&config.password);

    for row in 1..=plan.max_row {
        // 重置行高（使用默认值）
        if sheet.get_row_dimension(&row).is_some() {
            let dimension = sheet.get_row_dimension_mut(&row);
            dimension.set_height(0.0);
            dimension.set_custom_height(false);
        }

        for column in 1..=plan.max_column {
            let role = CellRole::classify(row, column, plan.marker_column);
            let style = sheet.get_cell_mut((column, row)).get_style_mut();
            style.set_alignment(palette.wrap.clone());
            match role {
                CellRole::ReferenceHeader => {
                    style.set_fill(palette.header_fill.clone());
                }
                CellRole::ReferenceData => {
                    style.set_fill(palette.content_fill.clone());
                }
                CellRole::StatusHeader => {
                    style.set_fill(palette.marker_header_fill.clone());
                }
                CellRole::StatusData => {}
            }
            let lock = if role.is_locked() {
                &palette.locked
            } else {
                &palette.unlocked
            };
            style.set_protection(lock.clone());
        }
    }

    for column in 1..=plan.max_column {
        let width = plan.column_width(column, config);
        sheet
            .get_column_dimension_mut(&column_number_to_name(column))
            .set_width(width);
    }

    for view in sheet.get_sheet_views_mut().get_sheet_view_list_mut().iter_mut() {
        view.set_view(SheetViewValues::Normal);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// At least one sheet formatted; the file was rewritten.
    Formatted { sheets: usize, skipped: usize },
    /// No sheet had a marker column; the file was left as is.
    Untouched { skipped: usize },
}

/// Warns about every sheet without a marker column and keeps the rest.
pub fn usable_plans(
    plans: Vec<Result<SheetPlan, String>>,
    config: &FormatConfig,
) -> (Vec<SheetPlan>, usize) {
    let mut usable = Vec::with_capacity(plans.len());
    let mut skipped = 0;
    for plan in plans {
        match plan {
            Ok(plan) => usable.push(plan),
            Err(sheet_name) => {
                warn!(
                    "Warning: 在工作表 {sheet_name} 中未找到包含'{}'的列",
                    config.marker_phrase
                );
                skipped += 1;
            }
        }
    }
    (usable, skipped)
}

/// 读取 → 逐表格式化 → 原地保存。保存是唯一的写入点。
pub fn format_workbook(
    file_path: &Path,
    config: &FormatConfig,
    palette: &Palette,
) -> FormatResult<FileOutcome> {
    let (plans, skipped) = usable_plans(plan_workbook(file_path, config)?, config);
    if plans.is_empty() {
        return Ok(FileOutcome::Untouched { skipped });
    }

    let mut book = umya_spreadsheet::reader::xlsx::read(file_path).map_err(|source| {
        FormatError::Load {
            path: file_path.to_path_buf(),
            source,
        }
    })?;

    for plan in &plans {
        info!("处理工作表: {}", plan.sheet_name);
        let sheet = book
            .get_sheet_by_name_mut(&plan.sheet_name)
            .ok_or_else(|| FormatError::MissingSheet(plan.sheet_name.clone()))?;
        format_sheet(sheet, plan, config, palette);
    }

    umya_spreadsheet::writer::xlsx::write(&book, file_path).map_err(|source| FormatError::Save {
        path: file_path.to_path_buf(),
        source,
    })?;

    Ok(FileOutcome::Formatted {
        sheets: plans.len(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roles_split_on_marker_column() {
        assert_eq!(CellRole::classify(1, 1, 3), CellRole::ReferenceHeader);
        assert_eq!(CellRole::classify(2, 2, 3), CellRole::ReferenceData);
        assert_eq!(CellRole::classify(1, 3, 3), CellRole::StatusHeader);
        assert_eq!(CellRole::classify(1, 5, 3), CellRole::StatusHeader);
        assert_eq!(CellRole::classify(4, 3, 3), CellRole::StatusData);
        assert_eq!(CellRole::classify(4, 7, 3), CellRole::StatusData);
    }

    #[test]
    fn only_status_data_is_unlocked() {
        assert!(CellRole::ReferenceHeader.is_locked());
        assert!(CellRole::ReferenceData.is_locked());
        assert!(CellRole::StatusHeader.is_locked());
        assert!(!CellRole::StatusData.is_locked());
    }

    #[test]
    fn validation_carries_options_and_prompts() {
        let config = FormatConfig::default();
        let validation = status_validation("C2:C9", &config);
        assert!(matches!(validation.get_type(), DataValidationValues::List));
        assert!(*validation.get_allow_blank());
        assert!(*validation.get_show_input_message());
        assert!(*validation.get_show_error_message());
        assert_eq!(validation.get_prompt_title(), "使用状态选择");
        assert_eq!(validation.get_error_title(), "输入错误");
        assert_eq!(validation.get_formula1(), "\"使用,禁用（注销）,已调离本单位\"");
        assert_eq!(validation.get_sequence_of_references().get_sqref(), "C2:C9");
    }

    #[test]
    fn palette_uses_lowercase_argb() {
        let palette = Palette::new(&FormatConfig::default());
        let argb = |fill: &Fill| {
            fill.get_pattern_fill()
                .and_then(|p| p.get_foreground_color())
                .map(|c| c.get_argb().to_string())
        };
        assert_eq!(argb(&palette.header_fill).as_deref(), Some("ffd9d9d9"));
        assert_eq!(argb(&palette.content_fill).as_deref(), Some("fff2f2f2"));
        assert_eq!(argb(&palette.marker_header_fill).as_deref(), Some("ffffeb9c"));
        assert!(*palette.locked.get_locked());
        assert!(!*palette.unlocked.get_locked());
    }
}
