//! クライアント設定（CLI / Web 共通）

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::normalizer::DedupPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.greencloud.dev";
pub const DEFAULT_RESOURCE_ID: &str = "678c008b428b9003e155c812";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub resource_id: String,
    pub poll_interval_ms: u64,
    /// 未設定なら完了まで無制限にポーリング
    pub max_polls: Option<u32>,
    pub dedup_by_email: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resource_id: DEFAULT_RESOURCE_ID.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_polls: None,
            dedup_by_email: true,
        }
    }
}

impl ClientConfig {
    pub fn dedup_policy(&self) -> DedupPolicy {
        DedupPolicy::from_flag(self.dedup_by_email)
    }

    pub fn submit_url(&self) -> String {
        crate::api::submit_url(&self.base_url, &self.resource_id)
    }

    pub fn result_url(&self, job_id: &str) -> String {
        crate::api::result_url(&self.base_url, job_id)
    }

    /// 値の整合性チェック
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://: {}",
                self.base_url
            )));
        }
        if self.resource_id.trim().is_empty() {
            return Err(Error::Config("resource_id is empty".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be greater than 0".into()));
        }
        if self.max_polls == Some(0) {
            return Err(Error::Config("max_polls must be greater than 0".into()));
        }
        Ok(())
    }
}
