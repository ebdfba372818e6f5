use std::fs;

use anyhow::Result;

fn main() -> Result<()> {
    fs::create_dir_all("按部门拆分")?;

    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_active_sheet_mut();

    // Header row: the third column carries the status marker.
    sheet.get_cell_mut("A1").set_value("序号");
    sheet.get_cell_mut("B1").set_value("姓名");
    sheet.get_cell_mut("C1").set_value("是否使用\n（必填）");

    sheet.get_cell_mut("A2").set_value_number(1);
    sheet.get_cell_mut("B2").set_value("张三");
    sheet.get_cell_mut("C2").set_value("使用");
    sheet.get_cell_mut("A3").set_value_number(2);
    sheet.get_cell_mut("B3").set_value("李四\n(借调)");

    umya_spreadsheet::writer::xlsx::write(&book, "按部门拆分/办公室.xlsx")?;

    // A workbook without the marker column is reported and left alone.
    let mut plain = umya_spreadsheet::new_file();
    plain
        .get_active_sheet_mut()
        .get_cell_mut("A1")
        .set_value("备注");
    umya_spreadsheet::writer::xlsx::write(&plain, "按部门拆分/说明.xlsx")?;

    println!("Wrote 按部门拆分/办公室.xlsx, 按部门拆分/说明.xlsx");
    Ok(())
}
