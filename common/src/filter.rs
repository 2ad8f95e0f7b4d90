//! 表の検索フィルタ
//!
//! 表示専用。元のデータは変更しない。

use crate::types::ContactRecord;

/// いずれかのフィールドが検索語を含む行だけを返す
///
/// 大文字小文字は無視する。空の検索語は全行にマッチ。
pub fn filter<'a>(rows: &'a [ContactRecord], term: &str) -> Vec<&'a ContactRecord> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return rows.iter().collect();
    }

    rows.iter().filter(|row| matches(row, &needle)).collect()
}

/// 1行が小文字化済みの検索語にマッチするか
fn matches(row: &ContactRecord, needle: &str) -> bool {
    row.fields()
        .iter()
        .flatten()
        .any(|value| value.to_lowercase().contains(needle))
}
