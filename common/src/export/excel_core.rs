//! Excel生成（共通ライブラリ）
//!
//! 連絡先一覧を1シートに、補助バケット（重複・空・失敗）を別シートに出力

use crate::types::{ContactRecord, ContactResult, CONTACT_COLUMNS};
use rust_xlsxwriter::*;

const FAILED_COLUMNS: [&str; 2] = ["File Name", "Error"];

/// 列幅（文字数）: Name, Address, Phone, Email
const CONTACT_COL_WIDTHS: [f64; 4] = [24.0, 40.0, 18.0, 32.0];

/// Excelをバッファに生成
///
/// # Arguments
/// * `result` - 正規化済みの結果
/// * `rows` - Contactsシートに出す行（検索で絞り込んだもの）
pub fn generate_contacts_buffer(
    result: &ContactResult,
    rows: &[&ContactRecord],
) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let bundle = &result.bundle;

    write_contact_sheet(&mut workbook, "Contacts", rows.iter().copied())?;

    if !bundle.duplicates.is_empty() {
        write_contact_sheet(&mut workbook, "Duplicates", bundle.duplicates.iter())?;
    }
    if !bundle.empty_records.is_empty() {
        write_contact_sheet(&mut workbook, "Empty Records", bundle.empty_records.iter())?;
    }
    if !bundle.failed_extractions.is_empty() {
        let rows: Vec<Vec<&str>> = bundle
            .failed_extractions
            .iter()
            .map(|f| vec![f.file_name.as_str(), f.error.as_str()])
            .collect();
        write_table(&mut workbook, "Failed Extractions", &FAILED_COLUMNS, &rows, &[30.0, 60.0])?;
    }

    // バッファに書き出し
    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

fn write_contact_sheet<'a>(
    workbook: &mut Workbook,
    name: &str,
    records: impl Iterator<Item = &'a ContactRecord>,
) -> Result<(), String> {
    let rows: Vec<Vec<&str>> = records.map(|r| r.cells().to_vec()).collect();
    write_table(workbook, name, &CONTACT_COLUMNS, &rows, &CONTACT_COL_WIDTHS)
}

fn write_table(
    workbook: &mut Workbook,
    name: &str,
    headers: &[&str],
    rows: &[Vec<&str>],
    widths: &[f64],
) -> Result<(), String> {
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xE5E7EB))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xD1D5DB));

    let cell_format = Format::new()
        .set_align(FormatAlign::Top)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xD1D5DB));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = row_idx as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            worksheet.write_string_with_format(row_num, col as u16, *value, &cell_format)
                .map_err(|e| format!("セル書き込みエラー: {}", e))?;
        }
    }

    worksheet.set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    Ok(())
}
