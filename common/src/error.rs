//! エラー型定義
//!
//! どのエラーもジョブにとって終端扱い。表示文字列はそのままUIに出す。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// ジョブ投入の失敗（ステータス不正・ID欠落・JSON以外の本文）
    #[error("{0}")]
    Submission(String),

    /// 結果ペイロードがフラット配列にもResultBundleにも該当しない
    #[error("Unexpected response format received from API.")]
    Format(String),

    /// ポーリング中の 500 / 408
    #[error("Error ({status}): {body}")]
    Server { status: u16, body: String },

    /// ポーリング中の通信・パース例外
    #[error("An error occurred during polling: {0}")]
    Polling(String),

    #[error("Unexpected status during polling: {0}")]
    UnexpectedStatus(u16),

    #[error("Polling gave up after {0} attempts")]
    PollLimit(u32),

    #[error("Polling was cancelled")]
    Aborted,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// ステータス不正による投入失敗
    pub fn submission_status(status: u16) -> Self {
        Error::Submission(format!("Initial request failed with status: {}", status))
    }

    /// 投入レスポンスに `id` が無い
    pub fn missing_job_id() -> Self {
        Error::Submission("Task ID not provided in the response".into())
    }

    /// 表示文言には出ない診断用の詳細（ログ用）
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Format(detail) => Some(detail),
            _ => None,
        }
    }

    /// エラーパネルに表示するか（キャンセルは表示しない）
    pub fn is_displayable(&self) -> bool {
        !matches!(self, Error::Aborted)
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_server() {
        let error = Error::Server {
            status: 500,
            body: "internal failure".to_string(),
        };
        assert_eq!(error.to_string(), "Error (500): internal failure");
    }

    #[test]
    fn test_error_display_submission_status() {
        let error = Error::submission_status(400);
        assert_eq!(error.to_string(), "Initial request failed with status: 400");
    }

    #[test]
    fn test_error_display_missing_id() {
        let error = Error::missing_job_id();
        assert!(matches!(error, Error::Submission(_)));
        assert_eq!(error.to_string(), "Task ID not provided in the response");
    }

    #[test]
    fn test_error_display_format_hides_detail() {
        let error = Error::Format("object without extracted_contacts".to_string());
        assert_eq!(
            error.to_string(),
            "Unexpected response format received from API."
        );
    }

    #[test]
    fn test_error_display_unexpected_status() {
        let error = Error::UnexpectedStatus(302);
        assert_eq!(error.to_string(), "Unexpected status during polling: 302");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_aborted_is_not_displayable() {
        assert!(!Error::Aborted.is_displayable());
        assert!(Error::PollLimit(3).is_displayable());
    }

    #[test]
    fn test_format_detail_kept_for_logs() {
        let error = Error::Format("result bundle: missing field `extractedContacts`".into());
        assert_eq!(error.to_string(), "Unexpected response format received from API.");
        assert_eq!(error.detail(), Some("result bundle: missing field `extractedContacts`"));
        assert_eq!(Error::UnexpectedStatus(302).detail(), None);
    }
}
