//! 結果の書き出し（JSON / Excel）

use crate::cli::ExportFormat;
use crate::error::{ContactExtractError, Result};
use chrono::{DateTime, Utc};
use contact_extract_common::export::excel_core::generate_contacts_buffer;
use contact_extract_common::{ResultBundle, ResultSource, ViewState};
use serde::Serialize;
use std::path::{Path, PathBuf};

const DEFAULT_FILE_STEM: &str = "contacts";

/// JSON出力の形。バンドルのキーを最上位に置くので `show` でそのまま読み直せる
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    job_id: Option<&'a str>,
    exported_at: DateTime<Utc>,
    search_term: &'a str,
    source: ResultSource,
    #[serde(flatten)]
    bundle: &'a ResultBundle,
}

/// ディレクトリまたは拡張子なしなら `contacts.{ext}` を付ける
pub fn output_path_for_format(output: &Path, format: ExportFormat) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", DEFAULT_FILE_STEM, format.extension()))
    } else {
        output.to_path_buf()
    }
}

/// 画面状態の結果を書き出す
///
/// JSONは正規化済みの全件、Excelは検索で絞り込んだ行をContactsシートに出す。
pub fn export_state(state: &ViewState, format: ExportFormat, output: &Path) -> Result<PathBuf> {
    let result = state
        .result
        .as_ref()
        .ok_or_else(|| ContactExtractError::Export("出力する結果がありません".into()))?;

    let path = output_path_for_format(output, format);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        ExportFormat::Json => {
            let document = ExportDocument {
                job_id: state.job.as_ref().map(|j| j.id.as_str()),
                exported_at: Utc::now(),
                search_term: &state.search_term,
                source: result.source,
                bundle: &result.bundle,
            };
            let json = serde_json::to_string_pretty(&document)?;
            std::fs::write(&path, json)?;
        }
        ExportFormat::Excel => {
            let rows = state.visible_rows();
            let buffer = generate_contacts_buffer(result, &rows)
                .map_err(ContactExtractError::Export)?;
            std::fs::write(&path, buffer)?;
        }
    }

    Ok(path)
}
