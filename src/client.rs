//! GreenCloud API クライアント
//!
//! ポーリングループから通信を切り離すため `JobApi` トレイト越しに呼ぶ。
//! 本番は reqwest 実装、テストはフェイク実装を差し込む。

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use contact_extract_common::{parse_submit_response, ClientConfig, Error, SubmitRequest};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;

/// 結果取得の生レスポンス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }
}

pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = contact_extract_common::Result<T>> + Send + 'a>>;

/// リモートAPIの操作
pub trait JobApi: Send + Sync {
    /// ジョブを投入してIDを返す
    fn submit(&self) -> ApiFuture<'_, String>;

    /// 結果エンドポイントを1回叩く（ステータスの解釈は呼び出し側）
    fn fetch_result<'a>(&'a self, job_id: &'a str) -> ApiFuture<'a, RawResponse>;
}

/// reqwest による実装
pub struct HttpJobApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpJobApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config: config.client.clone(),
        })
    }

    async fn submit_inner(&self) -> contact_extract_common::Result<String> {
        let url = self.config.submit_url();
        debug!(%url, "submitting job");

        let response = self
            .client
            .post(&url)
            .json(&SubmitRequest::default())
            .send()
            .await
            .map_err(|e| Error::Submission(format!("Initial request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Submission(format!("Initial response could not be read: {}", e)))?;

        parse_submit_response(status, &body)
    }

    async fn fetch_result_inner(&self, job_id: &str) -> contact_extract_common::Result<RawResponse> {
        let url = self.config.result_url(job_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Polling(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| Error::Polling(e.to_string()))?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

impl JobApi for HttpJobApi {
    fn submit(&self) -> ApiFuture<'_, String> {
        Box::pin(self.submit_inner())
    }

    fn fetch_result<'a>(&'a self, job_id: &'a str) -> ApiFuture<'a, RawResponse> {
        Box::pin(self.fetch_result_inner(job_id))
    }
}
