//! GreenCloud API のエンドポイントとレスポンス解釈
//!
//! 通信そのものはCLI(reqwest)とWeb(fetch)がそれぞれ行い、
//! ここでは URL組み立て・投入ペイロード・レスポンス本文の解釈だけを扱う。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// 投入ペイロード（固定のプレースホルダ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub example_key: String,
}

impl Default for SubmitRequest {
    fn default() -> Self {
        Self {
            example_key: "exampleValue".to_string(),
        }
    }
}

/// ジョブ投入URL: `{base}/gc/{resource_id}`
pub fn submit_url(base_url: &str, resource_id: &str) -> String {
    format!("{}/gc/{}", base_url.trim_end_matches('/'), resource_id)
}

/// 結果取得URL: `{base}/gc/{job_id}/result`
pub fn result_url(base_url: &str, job_id: &str) -> String {
    format!("{}/gc/{}/result", base_url.trim_end_matches('/'), job_id)
}

/// 投入レスポンスからジョブIDを取り出す
///
/// # Arguments
/// * `status` - HTTPステータス
/// * `body` - レスポンス本文
///
/// # Returns
/// * `Ok(String)` - 2xx かつ JSON本文に真値の `id` がある
/// * `Err(Error::Submission)` - それ以外
pub fn parse_submit_response(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        return Err(Error::submission_status(status));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::Submission(format!("Initial response is not valid JSON: {}", e)))?;

    match value.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f != 0.0) => Ok(n.to_string()),
        _ => Err(Error::missing_job_id()),
    }
}

/// Content-Typeで振り分けたレスポンス本文
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// `application/json` を含むContent-TypeならJSONとして読む
    ///
    /// # Errors
    /// JSON宣言なのに本文が不正なら `Error::Json`
    pub fn from_parts(content_type: Option<&str>, text: String) -> Result<Self> {
        let is_json = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false);

        if is_json {
            Ok(ResponseBody::Json(serde_json::from_str(&text)?))
        } else {
            Ok(ResponseBody::Text(text))
        }
    }

    /// エラー表示用の文字列（テキストはそのまま、JSONは直列化）
    pub fn to_message(&self) -> String {
        match self {
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Text(text) => text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_urls() {
        assert_eq!(
            submit_url("https://api.greencloud.dev/", "res1"),
            "https://api.greencloud.dev/gc/res1"
        );
        assert_eq!(
            result_url("https://api.greencloud.dev", "abc"),
            "https://api.greencloud.dev/gc/abc/result"
        );
    }

    #[test]
    fn test_submit_payload() {
        let json = serde_json::to_string(&SubmitRequest::default()).unwrap();
        assert_eq!(json, r#"{"exampleKey":"exampleValue"}"#);
    }

    // =============================================
    // parse_submit_response テスト
    // =============================================

    #[test]
    fn test_parse_submit_ok() {
        assert_eq!(parse_submit_response(201, r#"{"id": "abc"}"#).unwrap(), "abc");
        assert_eq!(parse_submit_response(200, r#"{"id": 42}"#).unwrap(), "42");
    }

    #[test]
    fn test_parse_submit_bad_status() {
        let err = parse_submit_response(400, r#"{"id": "abc"}"#).unwrap_err();
        assert!(matches!(err, Error::Submission(_)));
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_parse_submit_non_json() {
        let err = parse_submit_response(200, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, Error::Submission(_)));
    }

    #[test]
    fn test_parse_submit_falsy_or_missing_id() {
        for body in [r#"{}"#, r#"{"id": ""}"#, r#"{"id": null}"#, r#"{"id": 0}"#, r#"{"id": false}"#, "[]"] {
            let err = parse_submit_response(200, body).unwrap_err();
            assert_eq!(err.to_string(), "Task ID not provided in the response", "body: {}", body);
        }
    }

    // =============================================
    // ResponseBody テスト
    // =============================================

    #[test]
    fn test_response_body_json() {
        let body = ResponseBody::from_parts(
            Some("application/json; charset=utf-8"),
            r#"[{"name": "A"}]"#.to_string(),
        )
        .unwrap();
        assert_eq!(body, ResponseBody::Json(json!([{"name": "A"}])));
    }

    #[test]
    fn test_response_body_text() {
        let body = ResponseBody::from_parts(Some("text/plain"), "internal failure".to_string()).unwrap();
        assert_eq!(body.to_message(), "internal failure");

        let body = ResponseBody::from_parts(None, "x".to_string()).unwrap();
        assert!(matches!(body, ResponseBody::Text(_)));
    }

    #[test]
    fn test_response_body_invalid_json() {
        let result = ResponseBody::from_parts(Some("application/json"), "{oops".to_string());
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_json_message_is_compact() {
        let body = ResponseBody::Json(json!({"error": "timeout"}));
        assert_eq!(body.to_message(), r#"{"error":"timeout"}"#);
    }
}
