//! Contact Extract Common Library
//!
//! CLIとWeb(WASM)で共有される型とロジック:
//! 投入レスポンスの解釈、ポーリング判定、正規化（email重複除去）、検索、画面状態

pub mod types;
pub mod error;
pub mod job;
pub mod api;
pub mod config;
pub mod normalizer;
pub mod filter;
pub mod poll;
pub mod state;
pub mod export;

pub use types::{ContactRecord, ContactResult, FailedExtraction, ResultBundle, ResultSource};
pub use error::{Error, Result};
pub use job::{Job, JobStatus, PollTicket};
pub use api::{parse_submit_response, ResponseBody, SubmitRequest};
pub use config::ClientConfig;
pub use normalizer::{dedup_by_email, normalize, normalize_text, DedupPolicy};
pub use filter::filter;
pub use poll::{classify_response, PollOutcome};
pub use state::{Phase, ViewState};
