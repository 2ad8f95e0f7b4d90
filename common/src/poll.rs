//! ポーリング応答の判定
//!
//! 1回のポーリング（tick）で得たHTTP応答を次の状態に振り分ける:
//! - 200 → 正規化して Succeeded（形が不明なら Format エラー）
//! - 404 → Pending のまま
//! - 500 / 408 → Server エラー
//! - その他 → UnexpectedStatus エラー

use crate::api::ResponseBody;
use crate::error::Error;
use crate::normalizer::{normalize, normalize_text, DedupPolicy};
use crate::types::ContactResult;

/// 1回のポーリング結果
#[derive(Debug)]
pub enum PollOutcome {
    Pending,
    Succeeded(ContactResult),
    Failed(Error),
}

impl PollOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollOutcome::Pending)
    }
}

/// HTTP応答を判定
///
/// # Arguments
/// * `status` - HTTPステータス
/// * `content_type` - Content-Typeヘッダ
/// * `text` - レスポンス本文
/// * `policy` - フラット配列の重複除去方針
pub fn classify_response(
    status: u16,
    content_type: Option<&str>,
    text: String,
    policy: DedupPolicy,
) -> PollOutcome {
    match status {
        200 => {
            let body = match ResponseBody::from_parts(content_type, text) {
                Ok(body) => body,
                Err(e) => return PollOutcome::Failed(Error::Polling(e.to_string())),
            };
            let normalized = match body {
                ResponseBody::Json(value) => normalize(value, policy),
                ResponseBody::Text(text) => normalize_text(&text, policy),
            };
            match normalized {
                Ok(result) => PollOutcome::Succeeded(result),
                Err(e) => PollOutcome::Failed(e),
            }
        }
        404 => PollOutcome::Pending,
        500 | 408 => {
            // JSON宣言でも壊れていれば生テキストを出す
            let body = match ResponseBody::from_parts(content_type, text.clone()) {
                Ok(body) => body.to_message(),
                Err(_) => text,
            };
            PollOutcome::Failed(Error::Server { status, body })
        }
        other => PollOutcome::Failed(Error::UnexpectedStatus(other)),
    }
}

/// 通信例外をポーリングエラーに変換
pub fn transport_failure(detail: impl std::fmt::Display) -> PollOutcome {
    PollOutcome::Failed(Error::Polling(detail.to_string()))
}

/// 上限回数に達したか（`max_polls` 未設定なら常に false）
pub fn limit_reached(polls: u32, max_polls: Option<u32>) -> bool {
    max_polls.is_some_and(|max| polls >= max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: Option<&str> = Some("application/json");
    const TEXT: Option<&str> = Some("text/plain; charset=utf-8");

    fn classify(status: u16, content_type: Option<&str>, text: &str) -> PollOutcome {
        classify_response(status, content_type, text.to_string(), DedupPolicy::ByEmail)
    }

    #[test]
    fn test_200_flat_array_succeeds_with_dedup() {
        let outcome = classify(
            200,
            JSON,
            r#"[{"name":"A","email":"a@x.com"},{"name":"B","email":"a@x.com"}]"#,
        );
        match outcome {
            PollOutcome::Succeeded(result) => {
                assert_eq!(result.contacts().len(), 1);
                assert_eq!(result.contacts()[0].name.as_deref(), Some("A"));
            }
            other => panic!("Expected Succeeded, got {:?}", other),
        }
    }

    #[test]
    fn test_200_text_body_parsed_leniently() {
        let outcome = classify(200, TEXT, r#"{"extracted_contacts": []}"#);
        assert!(matches!(outcome, PollOutcome::Succeeded(_)));
    }

    #[test]
    fn test_200_unrecognized_shape_is_format_error() {
        let outcome = classify(200, JSON, r#"{"status": "done"}"#);
        assert!(matches!(outcome, PollOutcome::Failed(Error::Format(_))));

        let outcome = classify(200, TEXT, "all done");
        assert!(matches!(outcome, PollOutcome::Failed(Error::Format(_))));
    }

    #[test]
    fn test_200_broken_json_is_polling_error() {
        let outcome = classify(200, JSON, "[{");
        assert!(matches!(outcome, PollOutcome::Failed(Error::Polling(_))));
    }

    #[test]
    fn test_404_is_pending() {
        let outcome = classify(404, TEXT, "not found");
        assert!(!outcome.is_terminal());
    }

    #[test]
    fn test_500_with_text_body() {
        match classify(500, TEXT, "internal failure") {
            PollOutcome::Failed(e) => assert_eq!(e.to_string(), "Error (500): internal failure"),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_408_with_json_body() {
        match classify(408, JSON, r#"{"error": "timeout"}"#) {
            PollOutcome::Failed(e) => assert_eq!(e.to_string(), r#"Error (408): {"error":"timeout"}"#),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_500_with_broken_json_keeps_raw_text() {
        match classify(500, JSON, "{broken") {
            PollOutcome::Failed(Error::Server { body, .. }) => assert_eq!(body, "{broken"),
            other => panic!("Expected Server error, got {:?}", other),
        }
    }

    #[test]
    fn test_other_status_is_unexpected() {
        for status in [201, 302, 400, 403, 502] {
            let outcome = classify(status, TEXT, "");
            assert!(
                matches!(outcome, PollOutcome::Failed(Error::UnexpectedStatus(s)) if s == status),
                "status {}",
                status
            );
        }
    }

    #[test]
    fn test_transport_failure() {
        let outcome = transport_failure("connection reset");
        match outcome {
            PollOutcome::Failed(Error::Polling(msg)) => assert_eq!(msg, "connection reset"),
            other => panic!("Expected Polling error, got {:?}", other),
        }
    }

    #[test]
    fn test_limit_reached() {
        assert!(!limit_reached(1000, None));
        assert!(!limit_reached(2, Some(3)));
        assert!(limit_reached(3, Some(3)));
    }
}
