//! ジョブ投入とポーリングループ
//!
//! ポーリングは一定間隔（既定1.5秒、最初のリクエストは1間隔後）で結果
//! エンドポイントを叩き、終端状態になるまで続ける。ループはキャンセル
//! トークンを持ち、リクエスト前と応答反映前に必ず確認する。

use std::sync::Arc;
use std::time::Duration;

use contact_extract_common::poll::limit_reached;
use contact_extract_common::{classify_response, ClientConfig, ContactResult, Error, PollOutcome};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::JobApi;

pub struct JobClient<A> {
    api: Arc<A>,
    config: ClientConfig,
}

impl<A: JobApi> JobClient<A> {
    pub fn new(api: A, config: ClientConfig) -> Self {
        Self {
            api: Arc::new(api),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// ジョブを投入してIDを返す
    pub async fn submit(&self) -> contact_extract_common::Result<String> {
        let job_id = self.api.submit().await?;
        info!(job_id = %job_id, "job submitted");
        Ok(job_id)
    }

    /// 終端状態までポーリング
    ///
    /// # Arguments
    /// * `job_id` - 対象ジョブ
    /// * `cancel` - このジョブ専用のキャンセルトークン
    /// * `on_pending` - 404（未完了）を受けるたびに累計回数で呼ばれる
    ///
    /// # Returns
    /// * `Ok(ContactResult)` - 200で結果を正規化できた
    /// * `Err(Error::Aborted)` - キャンセルされた
    /// * `Err(_)` - それ以外の終端エラー
    pub async fn poll<F>(
        &self,
        job_id: &str,
        cancel: &CancellationToken,
        mut on_pending: F,
    ) -> contact_extract_common::Result<ContactResult>
    where
        F: FnMut(u32),
    {
        let period = Duration::from_millis(self.config.poll_interval_ms);
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let policy = self.config.dedup_policy();
        let mut polls: u32 = 0;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(job_id, polls, "polling cancelled");
                    return Err(Error::Aborted);
                }
                _ = interval.tick() => {}
            }

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(job_id, polls, "polling cancelled during request");
                    return Err(Error::Aborted);
                }
                response = self.api.fetch_result(job_id) => response,
            };

            // 応答待ちの間に切り替わったジョブの結果は反映しない
            if cancel.is_cancelled() {
                return Err(Error::Aborted);
            }

            polls += 1;
            let outcome = match response {
                Ok(raw) => classify_response(raw.status, raw.content_type.as_deref(), raw.body, policy),
                Err(e) => PollOutcome::Failed(e),
            };

            match outcome {
                PollOutcome::Pending => {
                    debug!(job_id, poll = polls, "result not ready yet");
                    on_pending(polls);
                    if limit_reached(polls, self.config.max_polls) {
                        warn!(job_id, polls, "poll limit reached");
                        return Err(Error::PollLimit(polls));
                    }
                }
                PollOutcome::Succeeded(result) => {
                    info!(
                        job_id,
                        poll = polls,
                        contacts = result.contacts().len(),
                        duplicates = result.bundle.duplicates.len(),
                        "job succeeded"
                    );
                    return Ok(result);
                }
                PollOutcome::Failed(e) => {
                    warn!(job_id, poll = polls, error = %e, detail = e.detail(), "job failed");
                    return Err(e);
                }
            }
        }
    }
}

/// ライブなポーリングを高々1つに保つ
///
/// `begin` は前のトークンをキャンセルしてから新しいトークンを返す。
/// 破棄時（画面終了相当）も現在のトークンをキャンセルする。
pub struct PollSession {
    root: CancellationToken,
    current: Option<CancellationToken>,
}

impl PollSession {
    /// `root` をキャンセルすると全ポーリングが止まる（Ctrl-C用）
    pub fn new(root: CancellationToken) -> Self {
        Self { root, current: None }
    }

    pub fn begin(&mut self) -> CancellationToken {
        self.finish();
        let token = self.root.child_token();
        self.current = Some(token.clone());
        token
    }

    pub fn finish(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    pub fn is_live(&self) -> bool {
        self.current.as_ref().is_some_and(|t| !t.is_cancelled())
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.finish();
    }
}
