use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContactExtractError {
    #[error("設定エラー: {0}")]
    Config(String),

    /// 投入・ポーリング・正規化のエラー（表示文字列はそのまま）
    #[error(transparent)]
    Job(#[from] contact_extract_common::Error),

    #[error("HTTPクライアントエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("エクスポートエラー: {0}")]
    Export(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, ContactExtractError>;
