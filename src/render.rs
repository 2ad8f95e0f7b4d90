//! 端末への結果表示
//!
//! 表は列幅を揃えた罫線付きテキスト。住所などの改行はセル内で折り返す。

use contact_extract_common::types::{CONTACT_COLUMNS, MISSING_CELL};
use contact_extract_common::{ContactRecord, ContactResult, ViewState};

/// 連絡先の表を文字列にする
pub fn render_table(rows: &[&ContactRecord]) -> String {
    let header: Vec<Vec<&str>> = CONTACT_COLUMNS.iter().map(|h| vec![*h]).collect();
    let body: Vec<Vec<Vec<&str>>> = rows
        .iter()
        .map(|row| row.cells().into_iter().map(split_lines).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|lines| max_width(lines)).collect();
    for row in &body {
        for (col, lines) in row.iter().enumerate() {
            widths[col] = widths[col].max(max_width(lines));
        }
    }

    let separator = separator_line(&widths);
    let mut out = String::new();
    out.push_str(&separator);
    push_row(&mut out, &header, &widths);
    out.push_str(&separator);
    for row in &body {
        push_row(&mut out, row, &widths);
    }
    if !body.is_empty() {
        out.push_str(&separator);
    }
    out
}

/// 補助バケット（重複・空・失敗）の要約。無ければ空文字
pub fn render_summary(result: &ContactResult) -> String {
    let bundle = &result.bundle;
    if !bundle.has_side_buckets() {
        return String::new();
    }

    let mut out = format!(
        "重複: {}件 / 空レコード: {}件 / 抽出失敗: {}件\n",
        bundle.duplicates.len(),
        bundle.empty_records.len(),
        bundle.failed_extractions.len()
    );
    for failed in &bundle.failed_extractions {
        out.push_str(&format!("  - {}: {}\n", failed.file_name, failed.error));
    }
    out
}

/// 画面状態全体（表・件数・要約・エラー）
pub fn render_state(state: &ViewState) -> String {
    let mut out = String::new();

    if let Some(result) = &state.result {
        let rows = state.visible_rows();
        out.push_str(&render_table(&rows));
        if state.search_term.is_empty() {
            out.push_str(&format!("{}件\n", rows.len()));
        } else {
            out.push_str(&format!(
                "{} / {}件（検索: \"{}\"）\n",
                rows.len(),
                result.contacts().len(),
                state.search_term
            ));
        }
        out.push_str(&render_summary(result));
    }

    if let Some(error) = &state.error {
        out.push_str("Error\n");
        out.push_str(error);
        out.push('\n');
    }

    out
}

fn split_lines(cell: &str) -> Vec<&str> {
    let lines: Vec<&str> = cell.lines().collect();
    if lines.is_empty() {
        vec![MISSING_CELL]
    } else {
        lines
    }
}

fn max_width(lines: &[&str]) -> usize {
    lines.iter().map(|l| l.chars().count()).max().unwrap_or(0)
}

fn separator_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn push_row(out: &mut String, cells: &[Vec<&str>], widths: &[usize]) {
    let height = cells.iter().map(Vec::len).max().unwrap_or(1);
    for line_idx in 0..height {
        out.push('|');
        for (col, lines) in cells.iter().enumerate() {
            let text = lines.get(line_idx).copied().unwrap_or("");
            let pad = widths[col] - text.chars().count();
            out.push(' ');
            out.push_str(text);
            out.push_str(&" ".repeat(pad + 1));
            out.push('|');
        }
        out.push('\n');
    }
}
