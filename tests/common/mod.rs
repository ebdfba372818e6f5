#![allow(dead_code)]

use std::path::{Path, PathBuf};

use umya_spreadsheet::{Spreadsheet, Worksheet};

pub const MARKER: &str = "是否使用（必填）";

/// Writes `rows` (row 1 first) into Sheet1 of a fresh workbook at `dir/name`.
pub fn write_workbook(dir: &Path, name: &str, rows: &[&[&str]]) -> PathBuf {
    build_workbook(dir, name, |book| {
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        fill_rows(sheet, rows);
    })
}

pub fn build_workbook(dir: &Path, name: &str, f: impl FnOnce(&mut Spreadsheet)) -> PathBuf {
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    let path = dir.join(name);
    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
    path
}

pub fn fill_rows(sheet: &mut Worksheet, rows: &[&[&str]]) {
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet
                    .get_cell_mut((c as u32 + 1, r as u32 + 1))
                    .set_value(*value);
            }
        }
    }
}

pub fn read(path: &Path) -> Spreadsheet {
    umya_spreadsheet::reader::xlsx::read(path).unwrap()
}

pub fn fill_argb(sheet: &Worksheet, col: u32, row: u32) -> Option<String> {
    sheet
        .get_cell((col, row))
        .and_then(|cell| cell.get_style().get_background_color())
        .map(|color| color.get_argb().to_ascii_lowercase())
}

pub fn is_locked(sheet: &Worksheet, col: u32, row: u32) -> Option<bool> {
    sheet
        .get_cell((col, row))
        .and_then(|cell| cell.get_style().get_protection())
        .map(|p| *p.get_locked())
}

pub fn is_wrapped(sheet: &Worksheet, col: u32, row: u32) -> bool {
    sheet
        .get_cell((col, row))
        .and_then(|cell| cell.get_style().get_alignment())
        .is_some_and(|a| *a.get_wrap_text())
}

pub fn width(sheet: &Worksheet, column: &str) -> Option<f64> {
    sheet.get_column_dimension(column).map(|c| *c.get_width())
}
