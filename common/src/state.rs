//! 画面状態のスナップショット
//!
//! 状態は `ViewState` 1つにまとめ、遷移関数（submit / poll_tick /
//! poll_succeeded / poll_failed / set_search_term など）を通してのみ更新する。
//! 遷移は古いスナップショットを消費して新しいものを返す。
//!
//! 古いジョブ宛ての遷移（世代またはIDが現在のジョブと一致しない）は無視する。

use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::filter::filter;
use crate::job::{Job, JobStatus, PollTicket};
use crate::types::{ContactRecord, ContactResult};

/// 画面フェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
            Phase::Polling => "polling",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub phase: Phase,
    pub job: Option<Job>,
    pub result: Option<ContactResult>,
    pub error: Option<String>,
    pub search_term: String,
    generation: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みの結果を表示するだけの状態
    pub fn with_result(result: ContactResult) -> Self {
        Self {
            phase: Phase::Succeeded,
            result: Some(result),
            ..Self::default()
        }
    }

    /// 現在の投入世代
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 投入開始。前回のジョブ・結果・エラーを破棄し、新しい世代番号を返す
    pub fn begin_submit(self) -> (Self, u64) {
        let generation = self.generation + 1;
        let next = Self {
            phase: Phase::Submitting,
            job: None,
            result: None,
            error: None,
            search_term: self.search_term,
            generation,
        };
        (next, generation)
    }

    /// 投入成功 → ポーリング開始
    pub fn submit_succeeded(self, generation: u64, job_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        if generation != self.generation || self.phase != Phase::Submitting {
            return self;
        }
        Self {
            phase: Phase::Polling,
            job: Some(Job::new(job_id, generation, now)),
            ..self
        }
    }

    /// 投入失敗 → エラー表示、ボタン再有効化
    pub fn submit_failed(self, generation: u64, error: &Error) -> Self {
        if generation != self.generation || self.phase != Phase::Submitting {
            return self;
        }
        Self {
            phase: Phase::Failed,
            error: Some(error.to_string()),
            ..self
        }
    }

    /// 1回分のポーリングが Pending で終わった
    pub fn poll_tick(mut self, ticket: &PollTicket) -> Self {
        if let Some(job) = self.live_job_mut(ticket) {
            job.polls += 1;
        }
        self
    }

    /// ポーリング成功。結果を確定する
    pub fn poll_succeeded(mut self, ticket: &PollTicket, result: ContactResult) -> Self {
        let Some(job) = self.live_job_mut(ticket) else {
            return self;
        };
        job.status = JobStatus::Succeeded;
        job.polls += 1;
        self.phase = Phase::Succeeded;
        self.result = Some(result);
        self.error = None;
        self
    }

    /// ポーリング失敗。エラーを確定する
    pub fn poll_failed(mut self, ticket: &PollTicket, error: &Error) -> Self {
        let message = error.to_string();
        let Some(job) = self.live_job_mut(ticket) else {
            return self;
        };
        job.status = JobStatus::Failed(message.clone());
        job.polls += 1;
        self.phase = Phase::Failed;
        self.result = None;
        self.error = Some(message);
        self
    }

    /// ポーリング中止（画面破棄・Ctrl-C）
    pub fn abort(mut self, ticket: &PollTicket) -> Self {
        let Some(job) = self.live_job_mut(ticket) else {
            return self;
        };
        job.status = JobStatus::Aborted;
        self.phase = Phase::Idle;
        self
    }

    pub fn set_search_term(self, term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..self
        }
    }

    /// 現在ポーリング中のジョブのチケット
    pub fn ticket(&self) -> Option<PollTicket> {
        self.job
            .as_ref()
            .filter(|job| !job.status.is_terminal())
            .map(Job::ticket)
    }

    /// チケットが現在のジョブを指しているか
    pub fn is_current(&self, ticket: &PollTicket) -> bool {
        self.job.as_ref().is_some_and(|job| job.matches(ticket))
    }

    /// 処理中（ボタン無効）か
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Submitting | Phase::Polling)
    }

    pub fn button_label(&self) -> &'static str {
        match self.phase {
            Phase::Submitting => "Initializing...",
            Phase::Polling => "Processing...",
            _ => "Click to start processing",
        }
    }

    /// 検索語で絞り込んだ表示行（結果が無ければ空）
    pub fn visible_rows(&self) -> Vec<&ContactRecord> {
        self.result
            .as_ref()
            .map(|result| filter(result.contacts(), &self.search_term))
            .unwrap_or_default()
    }

    fn live_job_mut(&mut self, ticket: &PollTicket) -> Option<&mut Job> {
        self.job
            .as_mut()
            .filter(|job| job.matches(ticket) && !job.status.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::{normalize, DedupPolicy};
    use serde_json::json;

    fn sample_result() -> ContactResult {
        normalize(
            json!([
                {"name": "A", "email": "a@x.com"},
                {"name": "B", "email": "a@x.com"},
                {"name": "Carol", "email": "carol@x.com"}
            ]),
            DedupPolicy::ByEmail,
        )
        .unwrap()
    }

    fn polling_state(job_id: &str) -> (ViewState, PollTicket) {
        let (state, generation) = ViewState::new().begin_submit();
        let state = state.submit_succeeded(generation, job_id, Utc::now());
        let ticket = state.ticket().expect("ポーリング中のはず");
        (state, ticket)
    }

    #[test]
    fn test_submit_flow() {
        let (state, generation) = ViewState::new().begin_submit();
        assert_eq!(state.phase, Phase::Submitting);
        assert!(state.is_busy());
        assert_eq!(state.button_label(), "Initializing...");

        let state = state.submit_succeeded(generation, "abc", Utc::now());
        assert_eq!(state.phase, Phase::Polling);
        assert_eq!(state.job.as_ref().map(|j| j.id.as_str()), Some("abc"));
        assert_eq!(state.button_label(), "Processing...");
    }

    #[test]
    fn test_submit_failure_reenables_button() {
        let (state, generation) = ViewState::new().begin_submit();
        let state = state.submit_failed(generation, &Error::submission_status(400));
        assert_eq!(state.phase, Phase::Failed);
        assert!(!state.is_busy());
        assert!(state.job.is_none());
        assert!(state.ticket().is_none());
        assert_eq!(
            state.error.as_deref(),
            Some("Initial request failed with status: 400")
        );
    }

    #[test]
    fn test_begin_submit_clears_previous_result_and_error() {
        let (state, ticket) = polling_state("abc");
        let state = state.poll_succeeded(&ticket, sample_result());
        let state = state.set_search_term("carol");
        let (state, _) = state.begin_submit();
        assert!(state.result.is_none());
        assert!(state.error.is_none());
        assert!(state.job.is_none());
        assert_eq!(state.search_term, "carol");
    }

    #[test]
    fn test_pending_ticks_then_success() {
        let (state, ticket) = polling_state("abc");
        let state = state.poll_tick(&ticket).poll_tick(&ticket);
        assert_eq!(state.job.as_ref().map(|j| j.polls), Some(2));

        let state = state.poll_succeeded(&ticket, sample_result());
        assert_eq!(state.phase, Phase::Succeeded);
        assert!(!state.is_busy());
        assert_eq!(state.visible_rows().len(), 2);
        assert!(state.ticket().is_none());
    }

    #[test]
    fn test_stale_poll_is_ignored() {
        let (state, old_ticket) = polling_state("abc");
        let (state, generation) = state.begin_submit();
        let state = state.submit_succeeded(generation, "def", Utc::now());

        let state = state.poll_succeeded(&old_ticket, sample_result());
        assert!(state.result.is_none());
        assert_eq!(state.phase, Phase::Polling);
        assert!(!state.is_current(&old_ticket));
    }

    #[test]
    fn test_same_job_id_from_older_generation_is_stale() {
        let (state, old_ticket) = polling_state("abc");
        let (state, generation) = state.begin_submit();
        let state = state.submit_succeeded(generation, "abc", Utc::now());

        let state = state.poll_failed(&old_ticket, &Error::UnexpectedStatus(302));
        assert!(state.error.is_none());
        assert_eq!(state.phase, Phase::Polling);
    }

    #[test]
    fn test_late_submit_response_is_ignored() {
        let (state, first) = ViewState::new().begin_submit();
        let (state, _second) = state.begin_submit();
        let state = state.submit_succeeded(first, "abc", Utc::now());
        assert!(state.job.is_none());
        assert_eq!(state.phase, Phase::Submitting);
    }

    #[test]
    fn test_no_error_after_result() {
        let (state, ticket) = polling_state("abc");
        let state = state.poll_succeeded(&ticket, sample_result());
        let state = state.poll_failed(&ticket, &Error::Polling("late".into()));
        assert!(state.error.is_none());
        assert!(state.result.is_some());
    }

    #[test]
    fn test_no_result_after_error() {
        let (state, ticket) = polling_state("abc");
        let state = state.poll_failed(
            &ticket,
            &Error::Server { status: 500, body: "internal failure".into() },
        );
        let state = state.poll_succeeded(&ticket, sample_result());
        assert!(state.result.is_none());
        assert_eq!(state.error.as_deref(), Some("Error (500): internal failure"));
        assert_eq!(
            state.job.map(|j| j.status),
            Some(JobStatus::Failed("Error (500): internal failure".into()))
        );
    }

    #[test]
    fn test_abort_stops_polling() {
        let (state, ticket) = polling_state("abc");
        let state = state.abort(&ticket);
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.ticket().is_none());
        assert_eq!(state.job.map(|j| j.status), Some(JobStatus::Aborted));
    }

    #[test]
    fn test_search_term_filters_view_only() {
        let (state, ticket) = polling_state("abc");
        let state = state.poll_succeeded(&ticket, sample_result());
        let state = state.set_search_term("CAROL");
        assert_eq!(state.visible_rows().len(), 1);
        assert_eq!(state.result.as_ref().map(|r| r.contacts().len()), Some(2));

        let state = state.set_search_term("");
        assert_eq!(state.visible_rows().len(), 2);
    }

    #[test]
    fn test_visible_rows_empty_without_result() {
        assert!(ViewState::new().visible_rows().is_empty());
    }
}
