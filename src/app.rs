//! CLIの画面状態ドライバ
//!
//! `ViewState` の遷移をジョブ投入・ポーリングの結果に結びつける。

use std::time::Duration;

use chrono::Utc;
use contact_extract_common::ViewState;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use crate::client::JobApi;
use crate::poller::{JobClient, PollSession};

pub struct App<A> {
    client: JobClient<A>,
    session: PollSession,
    state: ViewState,
    spinner: ProgressBar,
}

impl<A: JobApi> App<A> {
    pub fn new(client: JobClient<A>, cancel: CancellationToken) -> Self {
        Self {
            client,
            session: PollSession::new(cancel),
            state: ViewState::new(),
            spinner: ProgressBar::hidden(),
        }
    }

    /// 端末にスピナーを出す
    pub fn with_spinner(mut self) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        self.spinner = spinner;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn into_state(self) -> ViewState {
        self.state
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.transition(|s| s.set_search_term(term));
    }

    /// 投入 → ポーリング → 結果/エラー確定
    pub async fn submit_and_poll(&mut self) -> &ViewState {
        // 前のジョブのポーリングは投入前に止める
        self.session.finish();
        let generation = self.begin_submit();

        self.show_spinner(self.state.button_label());
        match self.client.submit().await {
            Ok(job_id) => {
                self.transition(|s| s.submit_succeeded(generation, job_id, Utc::now()));
            }
            Err(e) => {
                self.transition(|s| s.submit_failed(generation, &e));
                self.spinner.finish_and_clear();
                return &self.state;
            }
        }

        self.poll_current().await;
        &self.state
    }

    /// 既存ジョブIDを引き継いでポーリング
    pub async fn poll_existing(&mut self, job_id: &str) -> &ViewState {
        self.session.finish();
        let generation = self.begin_submit();
        self.transition(|s| s.submit_succeeded(generation, job_id, Utc::now()));

        self.poll_current().await;
        &self.state
    }

    async fn poll_current(&mut self) {
        let Some(ticket) = self.state.ticket() else {
            return;
        };
        let token = self.session.begin();
        self.show_spinner(self.state.button_label());

        let spinner = &self.spinner;
        let state = &mut self.state;
        let outcome = self
            .client
            .poll(&ticket.job_id, &token, |polls| {
                *state = std::mem::take(state).poll_tick(&ticket);
                spinner.set_message(format!("Processing... ({} polls)", polls));
            })
            .await;

        self.transition(|s| match outcome {
            Ok(result) => s.poll_succeeded(&ticket, result),
            Err(e) if !e.is_displayable() => s.abort(&ticket),
            Err(e) => s.poll_failed(&ticket, &e),
        });
        self.session.finish();
        self.spinner.finish_and_clear();
    }

    fn begin_submit(&mut self) -> u64 {
        let (state, generation) = std::mem::take(&mut self.state).begin_submit();
        self.state = state;
        generation
    }

    fn transition(&mut self, f: impl FnOnce(ViewState) -> ViewState) {
        self.state = f(std::mem::take(&mut self.state));
    }

    fn show_spinner(&self, message: &'static str) {
        self.spinner.set_message(message);
        self.spinner.enable_steady_tick(Duration::from_millis(120));
    }
}
