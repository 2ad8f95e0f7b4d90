//! ジョブとポーリングチケット

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ジョブ状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed(String),
    Aborted,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed(_) => "failed",
            JobStatus::Aborted => "aborted",
        }
    }
}

/// 投入済みジョブ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    /// 何回目の投入で作られたか（古いポーリング結果の判定に使う）
    pub generation: u64,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    /// 完了したポーリング回数
    pub polls: u32,
}

impl Job {
    pub fn new(id: impl Into<String>, generation: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            generation,
            status: JobStatus::Pending,
            created_at,
            polls: 0,
        }
    }

    pub fn ticket(&self) -> PollTicket {
        PollTicket {
            generation: self.generation,
            job_id: self.id.clone(),
        }
    }

    /// このジョブ宛てのチケットか
    pub fn matches(&self, ticket: &PollTicket) -> bool {
        self.generation == ticket.generation && self.id == ticket.job_id
    }
}

/// ポーリング開始時に取得する識別子
///
/// 応答を反映する前に現在のジョブと照合し、後続の投入で置き換えられた
/// ジョブの結果を捨てる。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PollTicket {
    pub generation: u64,
    pub job_id: String,
}
