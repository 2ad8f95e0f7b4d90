//! 結果ペイロードの正規化
//!
//! フラット配列 → クライアント側でemail重複除去してResultBundle形に揃える
//! ResultBundle → サーバーの仕分けをそのまま使う（重複除去はしない）

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{ContactRecord, ContactResult, ResultBundle, ResultSource};

/// フラット配列に対する重複除去方針
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupPolicy {
    #[default]
    ByEmail,
    Off,
}

impl DedupPolicy {
    pub fn from_flag(dedup_by_email: bool) -> Self {
        if dedup_by_email {
            DedupPolicy::ByEmail
        } else {
            DedupPolicy::Off
        }
    }
}

/// emailをキーに1パスで重複除去
///
/// 大文字小文字は区別し、先に出たものを残す。emailが欠損・空のレコードは
/// 互いに重複扱いせず全て残す。
///
/// # Returns
/// (残したレコード, 除去したレコード) 。どちらも入力順
pub fn dedup_by_email(records: Vec<ContactRecord>) -> (Vec<ContactRecord>, Vec<ContactRecord>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());
    let mut removed = Vec::new();

    for record in records {
        let is_new = match record.email_key() {
            Some(email) => seen.insert(email.to_string()),
            None => true,
        };
        if is_new {
            kept.push(record);
        } else {
            removed.push(record);
        }
    }

    (kept, removed)
}

/// 結果JSONを正規化
///
/// # Errors
/// 配列でもResultBundleでもない場合は `Error::Format`
pub fn normalize(value: Value, policy: DedupPolicy) -> Result<ContactResult> {
    match value {
        Value::Array(_) => {
            let records: Vec<ContactRecord> = serde_json::from_value(value)
                .map_err(|e| Error::Format(format!("contact array: {}", e)))?;
            Ok(normalize_flat(records, policy))
        }
        Value::Object(ref map)
            if map.contains_key("extractedContacts") || map.contains_key("extracted_contacts") =>
        {
            let bundle: ResultBundle = serde_json::from_value(value)
                .map_err(|e| Error::Format(format!("result bundle: {}", e)))?;
            Ok(ContactResult {
                source: ResultSource::Bundle,
                bundle,
            })
        }
        other => Err(Error::Format(format!(
            "expected contact array or result bundle, got {}",
            json_kind(&other)
        ))),
    }
}

/// テキスト本文を正規化（JSONとして読めなければ `Error::Format`）
pub fn normalize_text(text: &str, policy: DedupPolicy) -> Result<ContactResult> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| Error::Format(format!("text body is not JSON: {}", e)))?;
    normalize(value, policy)
}

fn normalize_flat(records: Vec<ContactRecord>, policy: DedupPolicy) -> ContactResult {
    let (extracted_contacts, duplicates) = match policy {
        DedupPolicy::ByEmail => dedup_by_email(records),
        DedupPolicy::Off => (records, Vec::new()),
    };

    ContactResult {
        source: ResultSource::Flat,
        bundle: ResultBundle {
            extracted_contacts,
            duplicates,
            ..Default::default()
        },
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object without extracted_contacts",
    }
}
