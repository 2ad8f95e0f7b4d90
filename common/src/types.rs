//! 抽出結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ContactRecord: 1件の連絡先（全フィールド任意）
//! - ResultBundle: サーバー側で仕分け済みの結果
//! - ContactResult: 正規化後の結果（表示はこれだけを見る）

use serde::{Deserialize, Serialize};

/// 表の列見出し
pub const CONTACT_COLUMNS: [&str; 4] = ["Name", "Address", "Phone", "Email"];

/// 欠損セルの表示
pub const MISSING_CELL: &str = "N/A";

/// 連絡先レコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactRecord {
    /// 列順（Name, Address, Phone, Email）でフィールドを返す
    pub fn fields(&self) -> [Option<&str>; 4] {
        [
            self.name.as_deref(),
            self.address.as_deref(),
            self.phone.as_deref(),
            self.email.as_deref(),
        ]
    }

    /// 表示用セル。空または欠損は "N/A"
    pub fn cells(&self) -> [&str; 4] {
        self.fields()
            .map(|f| f.filter(|v| !v.is_empty()).unwrap_or(MISSING_CELL))
    }

    /// 重複判定キー。空文字は重複判定の対象外
    pub fn email_key(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

/// 抽出に失敗したファイル
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FailedExtraction {
    #[serde(alias = "file_name")]
    pub file_name: String,
    pub error: String,
}

/// サーバーが仕分けた結果
///
/// `extractedContacts`（または `extracted_contacts`）キーが無いオブジェクトは
/// ResultBundleとして認めない。他のキーは省略時に空。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBundle {
    #[serde(alias = "extracted_contacts")]
    pub extracted_contacts: Vec<ContactRecord>,

    #[serde(default)]
    pub duplicates: Vec<ContactRecord>,

    #[serde(default, alias = "empty_records")]
    pub empty_records: Vec<ContactRecord>,

    #[serde(default, alias = "failed_extractions")]
    pub failed_extractions: Vec<FailedExtraction>,
}

impl ResultBundle {
    /// 補助バケット（重複・空・失敗）のいずれかに中身があるか
    pub fn has_side_buckets(&self) -> bool {
        !self.duplicates.is_empty()
            || !self.empty_records.is_empty()
            || !self.failed_extractions.is_empty()
    }
}

/// 結果の出所
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// フラット配列（クライアント側でemail重複除去）
    Flat,
    /// サーバー仕分け済み
    Bundle,
}

/// 正規化済みの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResult {
    pub source: ResultSource,
    pub bundle: ResultBundle,
}

impl ContactResult {
    /// 表に出す連絡先
    pub fn contacts(&self) -> &[ContactRecord] {
        &self.bundle.extracted_contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_record_deserialize_nulls_and_missing() {
        let json = r#"{"name": "A", "phone": null}"#;
        let record: ContactRecord = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(record.name.as_deref(), Some("A"));
        assert_eq!(record.phone, None);
        assert_eq!(record.email, None);
    }

    #[test]
    fn test_contact_record_cells() {
        let record = ContactRecord {
            name: Some("Alice".to_string()),
            address: Some(String::new()),
            phone: None,
            email: Some("a@x.com".to_string()),
        };
        assert_eq!(record.cells(), ["Alice", "N/A", "N/A", "a@x.com"]);
    }

    #[test]
    fn test_email_key_ignores_empty() {
        let mut record = ContactRecord::default();
        assert_eq!(record.email_key(), None);
        record.email = Some(String::new());
        assert_eq!(record.email_key(), None);
        record.email = Some("b@x.com".to_string());
        assert_eq!(record.email_key(), Some("b@x.com"));
    }

    #[test]
    fn test_bundle_accepts_snake_case() {
        let json = r#"{
            "extracted_contacts": [{"name": "A"}],
            "empty_records": [{}],
            "failed_extractions": [{"file_name": "scan.pdf", "error": "unreadable"}]
        }"#;
        let bundle: ResultBundle = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(bundle.extracted_contacts.len(), 1);
        assert!(bundle.duplicates.is_empty());
        assert_eq!(bundle.empty_records.len(), 1);
        assert_eq!(bundle.failed_extractions[0].file_name, "scan.pdf");
        assert!(bundle.has_side_buckets());
    }

    #[test]
    fn test_bundle_requires_extracted_contacts() {
        let json = r#"{"duplicates": []}"#;
        assert!(serde_json::from_str::<ResultBundle>(json).is_err());
    }

    #[test]
    fn test_bundle_serializes_camel_case() {
        let bundle = ResultBundle {
            failed_extractions: vec![FailedExtraction {
                file_name: "a.pdf".to_string(),
                error: "timeout".to_string(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&bundle).expect("シリアライズ失敗");
        assert!(json.contains("\"extractedContacts\":[]"));
        assert!(json.contains("\"fileName\":\"a.pdf\""));
    }
}
